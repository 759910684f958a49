use super::aggregate::distinct_sorted;
use super::model::{Column, UnicornDataset, UnicornRecord};

// ---------------------------------------------------------------------------
// Selection: which country / city / year range is active
// ---------------------------------------------------------------------------

/// Current explorer selection. `None` for a criterion means "match all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub country: Option<String>,
    pub city: Option<String>,
    /// Inclusive `(min_year, max_year)`.
    pub year_range: Option<(i32, i32)>,
}

impl Selection {
    /// Whether a single record passes every active criterion.
    ///
    /// Records without a join year never match a set year range.
    pub fn matches(&self, rec: &UnicornRecord) -> bool {
        if let Some(country) = &self.country {
            if rec.country.as_deref() != Some(country.as_str()) {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if rec.city.as_deref() != Some(city.as_str()) {
                return false;
            }
        }
        if let Some((lo, hi)) = self.year_range {
            match rec.year() {
                Some(year) if (lo..=hi).contains(&year) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Cities to offer for the given country (all cities when `None`), ascending.
pub fn available_cities<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    country: Option<&str>,
) -> Vec<String> {
    let matching = records
        .into_iter()
        .filter(|r| country.is_none() || r.country.as_deref() == country);
    distinct_sorted(matching, Column::City)
        .into_iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Records passing the selection, in dataset order.
pub fn apply_filters<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    selection: &Selection,
) -> Vec<&'a UnicornRecord> {
    records
        .into_iter()
        .filter(|r| selection.matches(r))
        .collect()
}

/// Return indices of records that pass the selection.
pub fn filtered_indices(dataset: &UnicornDataset, selection: &Selection) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}
