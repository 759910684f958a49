use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::NaiveDate;

use super::model::{CellValue, Column, UnicornRecord};

/// Label used for null values in hierarchical breakdowns.
pub const UNKNOWN_LABEL: &str = "(unknown)";

// ---------------------------------------------------------------------------
// Distinct values and frequency tables
// ---------------------------------------------------------------------------

/// Distinct non-null values of `column`, ascending.
pub fn distinct_sorted<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    column: Column,
) -> Vec<CellValue> {
    let mut values: Vec<CellValue> = records.into_iter().filter_map(|r| r.get(column)).collect();
    values.sort();
    values.dedup();
    values
}

/// Count keys, keeping the order in which each key was first seen.
fn count_first_seen<K: Eq + Hash + Clone>(keys: impl IntoIterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    let mut slot: HashMap<K, usize> = HashMap::new();
    for key in keys {
        match slot.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slot.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts
}

/// Most frequent first; the sort is stable so ties keep first-seen order.
fn rank_descending<K>(mut counts: Vec<(K, usize)>, n: usize) -> Vec<(K, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// The `n` most frequent non-null values of `column` with their counts.
pub fn top_n<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    column: Column,
    n: usize,
) -> Vec<(CellValue, usize)> {
    let counts = count_first_seen(records.into_iter().filter_map(|r| r.get(column)));
    rank_descending(counts, n)
}

// ---------------------------------------------------------------------------
// Group-by aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Mean,
    Sum,
    Count,
}

/// Aggregate `value` per distinct `group`.
///
/// Rows with a null group are skipped. For `Mean` and `Sum`, rows whose
/// value is null or non-numeric are skipped too; `Count` counts rows.
pub fn group_aggregate<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    group: Column,
    value: Column,
    op: AggregateOp,
) -> BTreeMap<CellValue, f64> {
    let mut acc: BTreeMap<CellValue, (f64, usize)> = BTreeMap::new();
    for rec in records {
        let Some(key) = rec.get(group) else {
            continue;
        };
        let x = match op {
            AggregateOp::Count => 0.0,
            _ => match rec.get(value).and_then(|v| v.as_f64()) {
                Some(x) => x,
                None => continue,
            },
        };
        let entry = acc.entry(key).or_insert((0.0, 0));
        entry.0 += x;
        entry.1 += 1;
    }

    acc.into_iter()
        .map(|(key, (sum, n))| {
            let out = match op {
                AggregateOp::Mean => sum / n as f64,
                AggregateOp::Sum => sum,
                AggregateOp::Count => n as f64,
            };
            (key, out)
        })
        .collect()
}

/// Group aggregate as a list sorted by descending aggregate (ties by key).
pub fn ranked_aggregate<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    group: Column,
    value: Column,
    op: AggregateOp,
) -> Vec<(CellValue, f64)> {
    let mut out: Vec<(CellValue, f64)> = group_aggregate(records, group, value, op)
        .into_iter()
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1));
    out
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Pearson correlation between dataset columns.
///
/// Categorical columns are label-encoded: distinct values sorted ascending
/// get codes `0..k` and nulls get `k`. This treats nominal categories as
/// ordinal numbers, so the magnitude and sign of a categorical correlation
/// depend on the alphabetical order of the labels. Read it as a rough hint,
/// not a statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<Column>,
    /// Row-major, `columns.len()` × `columns.len()`. Off-diagonal entries
    /// are NaN when either column has no variance.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Numeric view of a column: raw numbers, or label codes for categories.
fn encode_column(records: &[&UnicornRecord], column: Column) -> Vec<Option<f64>> {
    if column.is_numeric() {
        return records
            .iter()
            .map(|r| r.get(column).and_then(|v| v.as_f64()))
            .collect();
    }

    let labels = distinct_sorted(records.iter().copied(), column);
    let null_code = labels.len() as f64;
    records
        .iter()
        .map(|r| {
            let code = match r.get(column) {
                Some(v) => labels.binary_search(&v).map(|i| i as f64).unwrap_or(null_code),
                None => null_code,
            };
            Some(code)
        })
        .collect()
}

/// Pearson coefficient over rows where both sides are present.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    let n = pairs.len() as f64;
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Correlation matrix over `columns`, label-encoding the categorical ones.
pub fn correlation_matrix<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    columns: &[Column],
) -> CorrelationMatrix {
    let rows: Vec<&UnicornRecord> = records.into_iter().collect();
    let encoded: Vec<Vec<Option<f64>>> = columns.iter().map(|&c| encode_column(&rows, c)).collect();

    let k = columns.len();
    let mut values = vec![vec![0.0; k]; k];
    for i in 0..k {
        values[i][i] = 1.0;
        for j in (i + 1)..k {
            let r = pearson(&encoded[i], &encoded[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Running count of unicorns by join date, earliest first.
///
/// Undated records sort after every dated one with a `None` date, so the
/// final count is the number of records.
pub fn cumulative_growth<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
) -> Vec<(Option<NaiveDate>, usize)> {
    let mut dates: Vec<Option<NaiveDate>> =
        records.into_iter().map(UnicornRecord::date_joined).collect();
    dates.sort_by_key(|d| (d.is_none(), *d));
    dates
        .into_iter()
        .enumerate()
        .map(|(i, d)| (d, i + 1))
        .collect()
}

/// Per category of `column`, the number of records joining each year.
pub fn yearly_counts_by<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    column: Column,
) -> BTreeMap<CellValue, BTreeMap<i32, usize>> {
    let mut out: BTreeMap<CellValue, BTreeMap<i32, usize>> = BTreeMap::new();
    for rec in records {
        if let (Some(key), Some(year)) = (rec.get(column), rec.year()) {
            *out.entry(key).or_default().entry(year).or_default() += 1;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Investors
// ---------------------------------------------------------------------------

/// One row per listed investor per record, in record order.
pub fn explode_investors<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
) -> Vec<(&'a str, &'a UnicornRecord)> {
    records
        .into_iter()
        .flat_map(|rec| {
            rec.select_investors
                .as_deref()
                .unwrap_or("")
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(move |name| (name, rec))
        })
        .collect()
}

/// The `n` investors backing the most unicorns.
pub fn investor_counts<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    n: usize,
) -> Vec<(String, usize)> {
    let counts = count_first_seen(explode_investors(records).into_iter().map(|(name, _)| name));
    rank_descending(counts, n)
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}

// ---------------------------------------------------------------------------
// Valuation distributions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width valuation histogram over `[min, max]`.
///
/// The maximum falls into the last bin. When every valuation is equal a
/// single bin holds all records.
pub fn valuation_histogram<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    bins: usize,
) -> Vec<HistogramBin> {
    let values: Vec<f64> = records.into_iter().map(UnicornRecord::valuation).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let width = range / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// The `n` most valuable records, highest first.
pub fn top_valued<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    n: usize,
) -> Vec<&'a UnicornRecord> {
    let mut rows: Vec<&UnicornRecord> = records.into_iter().collect();
    rows.sort_by(|a, b| b.valuation().total_cmp(&a.valuation()));
    rows.truncate(n);
    rows
}

/// Count and mean valuation of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: CellValue,
    pub count: usize,
    pub mean_valuation: f64,
}

/// Per category of `column`: how many unicorns and their mean valuation.
pub fn group_summary<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord> + Clone,
    column: Column,
) -> Vec<GroupSummary> {
    let counts = group_aggregate(records.clone(), column, Column::Valuation, AggregateOp::Count);
    let means = group_aggregate(records, column, Column::Valuation, AggregateOp::Mean);
    counts
        .into_iter()
        .map(|(key, count)| {
            let mean_valuation = means.get(&key).copied().unwrap_or(0.0);
            GroupSummary {
                key,
                count: count as usize,
                mean_valuation,
            }
        })
        .collect()
}

/// Five-number summary of valuations within one category.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationSpread {
    pub key: CellValue,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Valuation spread per category of `column`, ordered by key.
pub fn valuation_spread<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    column: Column,
) -> Vec<ValuationSpread> {
    let mut groups: BTreeMap<CellValue, Vec<f64>> = BTreeMap::new();
    for rec in records {
        if let Some(key) = rec.get(column) {
            groups.entry(key).or_default().push(rec.valuation());
        }
    }
    groups
        .into_iter()
        .map(|(key, mut vals)| {
            vals.sort_by(f64::total_cmp);
            ValuationSpread {
                key,
                count: vals.len(),
                min: vals[0],
                q1: quantile(&vals, 0.25),
                median: quantile(&vals, 0.5),
                q3: quantile(&vals, 0.75),
                max: vals[vals.len() - 1],
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hierarchical breakdown
// ---------------------------------------------------------------------------

/// One node of a nested valuation breakdown (e.g. country → city → industry).
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub label: String,
    pub total: f64,
    pub count: usize,
    pub children: Vec<HierarchyNode>,
}

/// Nested valuation sums along `levels`. Nulls are grouped under
/// [`UNKNOWN_LABEL`]; siblings are ordered by descending total.
pub fn valuation_hierarchy<'a>(
    records: impl IntoIterator<Item = &'a UnicornRecord>,
    levels: &[Column],
) -> Vec<HierarchyNode> {
    let rows: Vec<&UnicornRecord> = records.into_iter().collect();
    build_level(&rows, levels)
}

fn build_level(rows: &[&UnicornRecord], levels: &[Column]) -> Vec<HierarchyNode> {
    let Some((&level, rest)) = levels.split_first() else {
        return Vec::new();
    };

    let mut groups: BTreeMap<String, Vec<&UnicornRecord>> = BTreeMap::new();
    for &rec in rows {
        let label = rec.text(level).unwrap_or(UNKNOWN_LABEL).to_string();
        groups.entry(label).or_default().push(rec);
    }

    let mut nodes: Vec<HierarchyNode> = groups
        .into_iter()
        .map(|(label, members)| HierarchyNode {
            total: members.iter().map(|r| r.valuation()).sum(),
            count: members.len(),
            children: build_level(&members, rest),
            label,
        })
        .collect();
    nodes.sort_by(|a, b| b.total.total_cmp(&a.total));
    nodes
}

// ---------------------------------------------------------------------------
// Headline statistics
// ---------------------------------------------------------------------------

/// Year after which a join counts as part of the recent boom.
pub const BOOM_AFTER_YEAR: i32 = 2015;

/// Headline numbers shown on the home and insights pages.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub total: usize,
    pub top_country: Option<(String, usize)>,
    pub mean_valuation: Option<f64>,
    /// Fraction of dated records that joined after [`BOOM_AFTER_YEAR`].
    pub joined_after_boom_share: Option<f64>,
    pub top_industries: Vec<(String, usize)>,
}

impl DatasetSummary {
    pub fn compute(records: &[UnicornRecord]) -> Self {
        let top_country = top_n(records, Column::Country, 1)
            .into_iter()
            .next()
            .map(|(v, n)| (v.to_string(), n));

        let mean_valuation = (!records.is_empty()).then(|| {
            records.iter().map(UnicornRecord::valuation).sum::<f64>() / records.len() as f64
        });

        let years: Vec<i32> = records.iter().filter_map(UnicornRecord::year).collect();
        let joined_after_boom_share = (!years.is_empty()).then(|| {
            years.iter().filter(|&&y| y > BOOM_AFTER_YEAR).count() as f64 / years.len() as f64
        });

        let top_industries = top_n(records, Column::Industry, 3)
            .into_iter()
            .map(|(v, n)| (v.to_string(), n))
            .collect();

        Self {
            total: records.len(),
            top_country,
            mean_valuation,
            joined_after_boom_share,
            top_industries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{arb_records, backed_by, dated, record};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn countries(list: &[&str]) -> Vec<UnicornRecord> {
        list.iter()
            .map(|&c| record("Co", 1.0, Some(c), None, None))
            .collect()
    }

    #[test]
    fn distinct_and_top_n_on_small_example() {
        let records = countries(&["US", "US", "DE"]);
        assert_eq!(
            distinct_sorted(&records, Column::Country),
            vec![CellValue::from("DE"), CellValue::from("US")]
        );
        assert_eq!(
            top_n(&records, Column::Country, 1),
            vec![(CellValue::from("US"), 2)]
        );
    }

    #[test]
    fn top_n_breaks_ties_by_first_appearance() {
        let records = countries(&["FR", "DE", "DE", "FR", "IN"]);
        assert_eq!(
            top_n(&records, Column::Country, 3),
            vec![
                (CellValue::from("FR"), 2),
                (CellValue::from("DE"), 2),
                (CellValue::from("IN"), 1),
            ]
        );
    }

    #[test]
    fn distinct_skips_nulls() {
        let mut records = countries(&["US"]);
        records.push(record("Co", 1.0, None, None, None));
        assert_eq!(distinct_sorted(&records, Column::Country).len(), 1);
    }

    #[test]
    fn group_aggregate_mean_sum_count() {
        let records = vec![
            record("A", 2.0, Some("US"), None, None),
            record("B", 4.0, Some("US"), None, None),
            record("C", 10.0, Some("DE"), None, None),
            record("D", 99.0, None, None, None),
        ];
        let us = CellValue::from("US");
        let de = CellValue::from("DE");

        let mean = group_aggregate(&records, Column::Country, Column::Valuation, AggregateOp::Mean);
        assert_eq!(mean.get(&us), Some(&3.0));
        assert_eq!(mean.get(&de), Some(&10.0));
        assert_eq!(mean.len(), 2);

        let sum = group_aggregate(&records, Column::Country, Column::Valuation, AggregateOp::Sum);
        assert_eq!(sum.get(&us), Some(&6.0));

        let count = group_aggregate(&records, Column::Country, Column::Valuation, AggregateOp::Count);
        assert_eq!(count.get(&us), Some(&2.0));

        let ranked =
            ranked_aggregate(&records, Column::Country, Column::Valuation, AggregateOp::Sum);
        assert_eq!(ranked[0], (de, 10.0));
    }

    #[test]
    fn group_mean_skips_null_values() {
        let records = vec![
            record("A", 1.0, Some("US"), None, Some(2010)),
            record("B", 1.0, Some("US"), None, None),
            record("C", 1.0, Some("US"), None, Some(2020)),
        ];
        let mean = group_aggregate(&records, Column::Country, Column::Year, AggregateOp::Mean);
        assert_eq!(mean.get(&CellValue::from("US")), Some(&2015.0));
    }

    #[test]
    fn correlation_of_perfectly_related_columns() {
        // Countries sort A < B < C, so codes rise with valuation.
        let records = vec![
            record("x", 1.0, Some("A"), Some("Z"), Some(2010)),
            record("y", 2.0, Some("B"), Some("Y"), Some(2011)),
            record("z", 3.0, Some("C"), Some("X"), Some(2012)),
        ];
        let m = correlation_matrix(
            &records,
            &[Column::Valuation, Column::Country, Column::City, Column::Year],
        );
        assert!((m.get(0, 1) - 1.0).abs() < 1e-9);
        assert!((m.get(0, 2) + 1.0).abs() < 1e-9);
        assert!((m.get(0, 3) - 1.0).abs() < 1e-9);
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn correlation_with_constant_column_is_nan_off_diagonal() {
        let records = vec![
            record("x", 1.0, Some("US"), None, None),
            record("y", 5.0, Some("US"), None, None),
        ];
        let m = correlation_matrix(&records, &[Column::Valuation, Column::Country]);
        assert!(m.get(0, 1).is_nan());
        assert_eq!(m.get(1, 1), 1.0);
    }

    #[test]
    fn cumulative_growth_sorts_by_date() {
        let records = vec![
            dated("late", 2021, 5, 1),
            dated("early", 2012, 1, 1),
            UnicornRecord::new("undated", 1.0, None).unwrap(),
            dated("mid", 2018, 3, 3),
        ];
        let series = cumulative_growth(&records);
        let counts: Vec<usize> = series.iter().map(|p| p.1).collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
        assert_eq!(series[0].0, NaiveDate::from_ymd_opt(2012, 1, 1));
        assert_eq!(series[2].0, NaiveDate::from_ymd_opt(2021, 5, 1));
        assert_eq!(series[3].0, None);
    }

    #[test]
    fn cumulative_growth_counts_undated_records_last() {
        let records = vec![
            dated("a", 2015, 1, 1),
            UnicornRecord::new("b", 1.0, None).unwrap(),
            dated("c", 2019, 1, 1),
        ];
        let series = cumulative_growth(&records);
        assert_eq!(
            series,
            vec![
                (NaiveDate::from_ymd_opt(2015, 1, 1), 1),
                (NaiveDate::from_ymd_opt(2019, 1, 1), 2),
                (None, 3),
            ]
        );
        assert_eq!(series.last().map(|p| p.1), Some(records.len()));
    }

    #[test]
    fn explode_investors_one_row_per_name() {
        let records = vec![
            backed_by("Acme", "A, B, C"),
            backed_by("Empty", " "),
            UnicornRecord::new("None", 1.0, None).unwrap(),
        ];
        let rows = explode_investors(&records);
        assert_eq!(rows.len(), 3);
        let names: Vec<&str> = rows.iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(rows.iter().all(|r| std::ptr::eq(r.1, &records[0])));
    }

    #[test]
    fn investor_counts_ranks_most_active() {
        let records = vec![
            backed_by("a", "Sequoia, Accel"),
            backed_by("b", "Accel,Tiger Global"),
            backed_by("c", "Accel"),
        ];
        assert_eq!(
            investor_counts(&records, 2),
            vec![("Accel".to_string(), 3), ("Sequoia".to_string(), 1)]
        );
    }

    #[test]
    fn histogram_puts_max_in_last_bin() {
        let records: Vec<UnicornRecord> = [1.0, 2.0, 3.0, 5.0]
            .iter()
            .map(|&v| record("Co", v, None, None, None))
            .collect();
        let bins = valuation_histogram(&records, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 1, 1, 1]);
        assert_eq!(bins[3].end, 5.0);

        let flat = valuation_histogram(&records[..1], 30);
        assert_eq!(flat.len(), 1);
        assert!(valuation_histogram(&[], 30).is_empty());
    }

    #[test]
    fn top_valued_descending() {
        let records = vec![
            record("small", 1.0, None, None, None),
            record("big", 140.0, None, None, None),
            record("mid", 12.0, None, None, None),
        ];
        let top: Vec<&str> = top_valued(&records, 2).into_iter().map(|r| r.company.as_str()).collect();
        assert_eq!(top, vec!["big", "mid"]);
    }

    #[test]
    fn spread_uses_linear_quantiles() {
        let records: Vec<UnicornRecord> = [1.0, 2.0, 3.0, 4.0]
            .iter()
            .map(|&v| record("Co", v, Some("US"), None, None))
            .collect();
        let spread = &valuation_spread(&records, Column::Country)[0];
        assert_eq!(spread.count, 4);
        assert_eq!(spread.min, 1.0);
        assert_eq!(spread.q1, 1.75);
        assert_eq!(spread.median, 2.5);
        assert_eq!(spread.q3, 3.25);
        assert_eq!(spread.max, 4.0);
    }

    #[test]
    fn group_summary_counts_and_means() {
        let records = vec![
            record("a", 2.0, Some("US"), None, None),
            record("b", 4.0, Some("US"), None, None),
        ];
        let summary = group_summary(&records, Column::Country);
        assert_eq!(
            summary,
            vec![GroupSummary {
                key: CellValue::from("US"),
                count: 2,
                mean_valuation: 3.0,
            }]
        );
    }

    #[test]
    fn hierarchy_nests_and_sums() {
        let records = vec![
            record("a", 5.0, Some("US"), Some("SF"), None),
            record("b", 3.0, Some("US"), Some("NY"), None),
            record("c", 20.0, Some("CN"), Some("Beijing"), None),
            record("d", 1.0, Some("US"), None, None),
        ];
        let tree = valuation_hierarchy(&records, &[Column::Country, Column::City]);
        assert_eq!(tree[0].label, "CN");
        assert_eq!(tree[1].label, "US");
        assert_eq!(tree[1].total, 9.0);
        assert_eq!(tree[1].count, 3);
        let cities: Vec<&str> = tree[1].children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(cities, vec!["SF", "NY", UNKNOWN_LABEL]);
        assert!(tree[1].children.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn yearly_counts_group_by_category_and_year() {
        let mut a = record("a", 1.0, None, None, Some(2019));
        a.industry = Some("Fintech".into());
        let mut b = record("b", 1.0, None, None, Some(2019));
        b.industry = Some("Fintech".into());
        let mut c = record("c", 1.0, None, None, None);
        c.industry = Some("Fintech".into());
        let counts = yearly_counts_by(&[a, b, c], Column::Industry);
        assert_eq!(counts[&CellValue::from("Fintech")][&2019], 2);
        assert_eq!(counts[&CellValue::from("Fintech")].len(), 1);
    }

    #[test]
    fn summary_headlines() {
        let mut records = vec![
            record("a", 1.0, Some("US"), None, Some(2014)),
            record("b", 2.0, Some("US"), None, Some(2019)),
            record("c", 6.0, Some("DE"), None, Some(2021)),
            record("d", 3.0, None, None, None),
        ];
        records[0].industry = Some("Fintech".into());
        let summary = DatasetSummary::compute(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.top_country, Some(("US".to_string(), 2)));
        assert_eq!(summary.mean_valuation, Some(3.0));
        assert!((summary.joined_after_boom_share.unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.top_industries, vec![("Fintech".to_string(), 1)]);

        let empty = DatasetSummary::compute(&[]);
        assert_eq!(empty.mean_valuation, None);
        assert_eq!(empty.top_country, None);
    }

    proptest! {
        #[test]
        fn top_n_is_bounded_and_non_increasing(records in arb_records(), n in 0usize..6) {
            let top = top_n(&records, Column::City, n);
            prop_assert!(top.len() <= n);
            prop_assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
        }

        #[test]
        fn cumulative_growth_ends_at_record_count(records in arb_records()) {
            let series = cumulative_growth(&records);
            prop_assert!(series.windows(2).all(|w| w[0].1 < w[1].1));
            let dated: Vec<NaiveDate> = series.iter().filter_map(|p| p.0).collect();
            prop_assert!(dated.windows(2).all(|w| w[0] <= w[1]));
            let first_undated = series.iter().position(|p| p.0.is_none()).unwrap_or(series.len());
            prop_assert!(series[first_undated..].iter().all(|p| p.0.is_none()));
            prop_assert_eq!(series.last().map(|p| p.1).unwrap_or(0), records.len());
        }

        #[test]
        fn correlation_matrix_is_symmetric_with_unit_diagonal(records in arb_records()) {
            let cols = [Column::Valuation, Column::Country, Column::City, Column::Industry];
            let m = correlation_matrix(&records, &cols);
            for i in 0..cols.len() {
                prop_assert!((m.get(i, i) - 1.0).abs() < 1e-12);
                for j in 0..cols.len() {
                    let (a, b) = (m.get(i, j), m.get(j, i));
                    prop_assert!((a.is_nan() && b.is_nan()) || (a - b).abs() < 1e-12);
                    prop_assert!(a.is_nan() || (-1.0..=1.0).contains(&a));
                }
            }
        }

        #[test]
        fn histogram_counts_every_record(records in arb_records(), bins in 1usize..40) {
            let total: usize = valuation_histogram(&records, bins).iter().map(|b| b.count).sum();
            prop_assert_eq!(total, records.len());
        }
    }
}
