use std::io::Read;
use std::path::Path;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::error::DataError;
use super::model::{Column, UnicornDataset, UnicornRecord};
use crate::config::{DashboardConfig, DataSource};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the unicorn dataset from the configured source.
///
/// Performs exactly one fetch (or file read). Call it once at startup and
/// share the result; the dataset never changes afterwards.
pub fn load(config: &DashboardConfig) -> Result<UnicornDataset, DataError> {
    log::info!("Loading unicorn dataset from {}", config.source);
    let dataset = match &config.source {
        DataSource::Remote(url) => {
            let body = fetch_remote(url, config.fetch_timeout)?;
            parse_csv(body.as_bytes(), url)?
        }
        DataSource::File(path) => load_file(path)?,
    };
    log::info!("Loaded {} unicorn records", dataset.len());
    Ok(dataset)
}

/// Read a local CSV export. Gets the same payload checks as a download.
pub fn load_file(path: &Path) -> Result<UnicornDataset, DataError> {
    let body = std::fs::read_to_string(path)?;
    ensure_tabular(&body)?;
    parse_csv(body.as_bytes(), &path.display().to_string())
}

// ---------------------------------------------------------------------------
// HTTP fetch
// ---------------------------------------------------------------------------

fn fetch_remote(url: &str, timeout: Duration) -> Result<String, DataError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::limited(5))
        .user_agent(concat!("unicorn-dashboard/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| DataError::DataSource(format!("GET {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DataError::DataSource(format!("GET {url} returned {status}")));
    }

    let body = response.text()?;
    ensure_tabular(&body)?;
    Ok(body)
}

/// Reject payloads that are obviously not CSV (empty bodies, HTML sign-in
/// or error pages served with a 200).
fn ensure_tabular(body: &str) -> Result<(), DataError> {
    let trimmed = body.trim_start_matches('\u{feff}').trim_start();
    if trimmed.is_empty() {
        return Err(DataError::DataSource("empty response body".into()));
    }
    if trimmed.starts_with('<') {
        return Err(DataError::DataSource(
            "response is HTML, not a CSV export".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// One CSV row as it appears on the wire. Columns are matched by name.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Company")]
    company: Option<String>,
    #[serde(rename = "Valuation ($B)")]
    valuation: Option<String>,
    #[serde(rename = "Industry")]
    industry: Option<String>,
    #[serde(rename = "City")]
    city: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Date Joined")]
    date_joined: Option<String>,
    #[serde(rename = "Select Investors")]
    select_investors: Option<String>,
}

/// Parse CSV text into a dataset. `source` only labels log lines and errors.
///
/// Header layout: `Company, Valuation ($B), Industry, City, Country,
/// Date Joined, Select Investors` in any order; extra columns are ignored.
pub fn parse_csv<R: Read>(reader: R, source: &str) -> Result<UnicornDataset, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataError::DataSource(format!("{source}: no header row")));
    }
    reader.set_headers(csv::StringRecord::from(headers.clone()));

    let missing: Vec<String> = Column::SOURCE
        .iter()
        .map(|c| c.header())
        .filter(|name| !headers.iter().any(|h| h == name))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(DataError::Schema(missing));
    }

    let mut records = Vec::new();
    let mut undated = 0usize;

    for (row_no, result) in reader.deserialize::<RawRow>().enumerate() {
        // Row numbers in messages count the header as line 1.
        let line = row_no + 2;
        let raw = result?;

        let company = non_empty(raw.company).ok_or_else(|| {
            DataError::Parse(format!("{source} line {line}: missing company name"))
        })?;
        let valuation = parse_valuation(raw.valuation.as_deref().unwrap_or(""))
            .map_err(|msg| DataError::Parse(format!("{source} line {line}: {msg}")))?;

        let date_text = non_empty(raw.date_joined);
        let date_joined = date_text.as_deref().and_then(parse_date);
        if date_joined.is_none() {
            log::debug!("{source} line {line}: unparsed date {date_text:?}");
            undated += 1;
        }

        let mut record = UnicornRecord::new(company, valuation, date_joined)
            .map_err(|e| DataError::Parse(format!("{source} line {line}: {e}")))?;
        record.industry = non_empty(raw.industry);
        record.city = non_empty(raw.city);
        record.country = non_empty(raw.country);
        record.select_investors = non_empty(raw.select_investors);
        records.push(record);
    }

    if undated > 0 {
        log::warn!("{source}: {undated} record(s) have no parseable join date");
    }

    Ok(UnicornDataset::new(records, source))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a valuation in billions. Accepts `12`, `12.5`, `$12.5` and
/// `$1,200`; rejects anything else and negative numbers.
fn parse_valuation(text: &str) -> Result<f64, String> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let value: f64 = cleaned
        .trim()
        .parse()
        .map_err(|_| format!("valuation {text:?} is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("valuation {text:?} must be a non-negative number"));
    }
    Ok(value)
}

const DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M:%S"];

/// Best-effort date parsing; `None` when no known format matches.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}
