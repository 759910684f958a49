use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Public CSV export of the unicorn spreadsheet.
pub const DEFAULT_SOURCE_URL: &str =
    "https://docs.google.com/spreadsheets/d/1gt5SevuvTRyS4qMW9_kntBODaNIolP-Ok_oIQwF9cEs/export?format=csv";

/// Overrides the data source with a URL or a local file path.
pub const SOURCE_ENV: &str = "UNICORN_DATA_SOURCE";
/// Overrides the HTTP timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "UNICORN_FETCH_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the dataset CSV is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(String),
    File(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` values are URLs, anything else is a path.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Remote(value.to_string())
        } else {
            DataSource::File(PathBuf::from(value))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Startup configuration of the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    /// Upper bound for the single CSV fetch.
    pub fetch_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Remote(DEFAULT_SOURCE_URL.to_string()),
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl DashboardConfig {
    /// Defaults with the process environment applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(source) = lookup(SOURCE_ENV).filter(|s| !s.trim().is_empty()) {
            config.source = DataSource::parse(&source);
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.fetch_timeout = Duration::from_secs(secs),
                _ => log::warn!("Ignoring invalid {TIMEOUT_ENV}={raw:?}"),
            }
        }

        config
    }
}
