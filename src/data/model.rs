use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::error::DataError;

// ---------------------------------------------------------------------------
// Column – the fixed set of dataset columns
// ---------------------------------------------------------------------------

/// A column of the unicorn dataset.
///
/// `Year` is not present in the source CSV; it is derived from `DateJoined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Company,
    Valuation,
    Industry,
    City,
    Country,
    DateJoined,
    Year,
    SelectInvestors,
}

impl Column {
    /// Columns the source CSV must provide, in display order.
    pub const SOURCE: [Column; 7] = [
        Column::Company,
        Column::Valuation,
        Column::Industry,
        Column::City,
        Column::Country,
        Column::DateJoined,
        Column::SelectInvestors,
    ];

    /// Header name as it appears in the CSV export.
    pub fn header(self) -> &'static str {
        match self {
            Column::Company => "Company",
            Column::Valuation => "Valuation ($B)",
            Column::Industry => "Industry",
            Column::City => "City",
            Column::Country => "Country",
            Column::DateJoined => "Date Joined",
            Column::Year => "Year",
            Column::SelectInvestors => "Select Investors",
        }
    }

    /// Whether the column holds a number that can be correlated directly.
    pub fn is_numeric(self) -> bool {
        matches!(self, Column::Valuation | Column::Year)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single non-null cell
// ---------------------------------------------------------------------------

/// A typed, totally ordered cell value usable as a group key.
///
/// Nulls are not a variant: accessors return `Option<CellValue>` and null
/// cells never become distinct values or group keys.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
}

// -- Manual Eq/Ord so we can put CellValue in BTreeMap keys --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Integer(_) => 0,
                Float(_) => 1,
                Date(_) => 2,
                Text(_) => 3,
            }
        }
        match (self, other) {
            (Text(a), Text(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Date(d) => d.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for numeric aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// UnicornRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// One unicorn company.
///
/// `year` is private and always derived from `date_joined`, so the two can
/// never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct UnicornRecord {
    pub company: String,
    valuation: f64,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    date_joined: Option<NaiveDate>,
    year: Option<i32>,
    pub select_investors: Option<String>,
}

impl UnicornRecord {
    /// Build a record, rejecting negative or non-finite valuations.
    pub fn new(
        company: impl Into<String>,
        valuation: f64,
        date_joined: Option<NaiveDate>,
    ) -> Result<Self, DataError> {
        if !valuation.is_finite() || valuation < 0.0 {
            return Err(DataError::Parse(format!(
                "valuation must be a non-negative number, got {valuation}"
            )));
        }
        Ok(Self {
            company: company.into(),
            valuation,
            industry: None,
            city: None,
            country: None,
            date_joined,
            year: date_joined.map(|d| d.year()),
            select_investors: None,
        })
    }

    /// Valuation in billions of dollars.
    pub fn valuation(&self) -> f64 {
        self.valuation
    }

    pub fn date_joined(&self) -> Option<NaiveDate> {
        self.date_joined
    }

    /// Year component of `date_joined`.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Value of a column for this record; `None` for null cells.
    pub fn get(&self, column: Column) -> Option<CellValue> {
        match column {
            Column::Company => Some(CellValue::Text(self.company.clone())),
            Column::Valuation => Some(CellValue::Float(self.valuation)),
            Column::Industry => self.industry.as_deref().map(CellValue::from),
            Column::City => self.city.as_deref().map(CellValue::from),
            Column::Country => self.country.as_deref().map(CellValue::from),
            Column::DateJoined => self.date_joined.map(CellValue::Date),
            Column::Year => self.year.map(|y| CellValue::Integer(i64::from(y))),
            Column::SelectInvestors => self.select_investors.as_deref().map(CellValue::from),
        }
    }

    /// Borrowed text of a categorical column without allocating.
    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::Company => Some(&self.company),
            Column::Industry => self.industry.as_deref(),
            Column::City => self.city.as_deref(),
            Column::Country => self.country.as_deref(),
            Column::SelectInvestors => self.select_investors.as_deref(),
            _ => None,
        }
    }

    /// Cell formatted for the explorer table; nulls render as an empty cell.
    pub fn display(&self, column: Column) -> String {
        match column {
            Column::Valuation => format!("{:.2}", self.valuation),
            other => self.get(other).map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// UnicornDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct UnicornDataset {
    records: Vec<UnicornRecord>,
    /// Human-readable description of where the data came from.
    source: String,
}

impl UnicornDataset {
    pub fn new(records: Vec<UnicornRecord>, source: impl Into<String>) -> Self {
        Self {
            records,
            source: source.into(),
        }
    }

    pub fn records(&self) -> &[UnicornRecord] {
        &self.records
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest and largest `Year` in the dataset, if any record is dated.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let mut years = self.records.iter().filter_map(UnicornRecord::year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}
