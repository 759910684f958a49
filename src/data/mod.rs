/// Data layer: core types, loading, aggregation and filtering.
///
/// Architecture:
/// ```text
///  remote CSV export / local .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch once → parse rows → UnicornDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ UnicornDataset  │  Vec<UnicornRecord>, immutable, shared via Arc
///   └────────────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter   │      │ aggregate │  counts, group-bys, correlation,
///   └──────────┘      └───────────┘  growth, investors, hierarchy
///  selection → rows         │
///                           ▼
///                     ┌──────────┐
///                     │ treemap   │  squarified tile layout
///                     └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod treemap;

#[cfg(test)]
pub(crate) mod fixtures;
