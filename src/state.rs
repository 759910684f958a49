use std::sync::Arc;

use crate::bindings::{affected_bindings, Input, Output};
use crate::data::aggregate::{distinct_sorted, DatasetSummary};
use crate::data::filter::{available_cities, filtered_indices, Selection};
use crate::data::model::{Column, UnicornDataset};
use crate::ui::visuals::Gallery;

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// The navigable pages of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Explorer,
    Insights,
    Visuals,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Home, Route::Explorer, Route::Insights, Route::Visuals];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Explorer => "/explorer",
            Route::Insights => "/insights",
            Route::Visuals => "/visuals",
        }
    }

    /// Label shown in the navigation bar.
    pub fn name(self) -> &'static str {
        match self {
            Route::Home => "🏠 Home",
            Route::Explorer => "🔍 Data Explorer",
            Route::Insights => "📈 Insights",
            Route::Visuals => "📊 Visuals",
        }
    }
}

// ---------------------------------------------------------------------------
// Explorer state
// ---------------------------------------------------------------------------

/// Selection widgets and the outputs bound to them.
pub struct ExplorerState {
    pub selection: Selection,
    /// All countries, for the country combo box.
    pub country_options: Vec<String>,
    /// Cities of the selected country (output `CityOptions`).
    pub city_options: Vec<String>,
    /// Full year span of the dataset; the slider bounds.
    pub year_bounds: Option<(i32, i32)>,
    /// Current slider positions; start at `year_bounds`.
    pub year_slider: (i32, i32),
    /// Indices of records passing the selection (output `TableRows`).
    pub visible_indices: Vec<usize>,
    /// Bumped whenever `visible_indices` is rebuilt.
    pub rows_revision: u64,
}

impl ExplorerState {
    /// Initial state: no country or city, sliders at the full year span.
    /// The year range always applies, so undated companies are not listed.
    pub fn new(dataset: &UnicornDataset) -> Self {
        let country_options = distinct_sorted(dataset.records(), Column::Country)
            .into_iter()
            .map(|v| v.to_string())
            .collect();
        let year_bounds = dataset.year_span();
        let selection = Selection {
            year_range: year_bounds,
            ..Selection::default()
        };
        Self {
            visible_indices: filtered_indices(dataset, &selection),
            selection,
            country_options,
            city_options: available_cities(dataset.records(), None),
            year_bounds,
            year_slider: year_bounds.unwrap_or((0, 0)),
            rows_revision: 0,
        }
    }

    /// Whether any control differs from its initial position.
    pub fn is_filtered(&self) -> bool {
        self.selection.country.is_some()
            || self.selection.city.is_some()
            || self.year_bounds.is_some_and(|b| b != self.year_slider)
    }

    /// Change the country. A selected city outside the new country is
    /// cleared first, since the filter engine itself does not enforce that.
    pub fn select_country(&mut self, dataset: &UnicornDataset, country: Option<String>) {
        if self.selection.country == country {
            return;
        }
        if let (Some(country), Some(city)) = (&country, &self.selection.city) {
            let belongs = dataset.records().iter().any(|r| {
                r.country.as_deref() == Some(country.as_str())
                    && r.city.as_deref() == Some(city.as_str())
            });
            if !belongs {
                log::debug!("Clearing city {city:?}: not in {country:?}");
                self.selection.city = None;
            }
        }
        self.selection.country = country;
        self.propagate(dataset, Input::CountrySelected);
    }

    pub fn select_city(&mut self, dataset: &UnicornDataset, city: Option<String>) {
        if self.selection.city == city {
            return;
        }
        self.selection.city = city;
        self.propagate(dataset, Input::CitySelected);
    }

    /// Move the year sliders. The range is inclusive and always applied.
    pub fn set_year_range(&mut self, dataset: &UnicornDataset, lo: i32, hi: i32) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.year_slider = (lo, hi);
        let range = self.year_bounds.map(|_| (lo, hi));
        if self.selection.year_range != range {
            self.selection.year_range = range;
            self.propagate(dataset, Input::YearRangeChanged);
        }
    }

    /// Return every control to its initial position.
    pub fn reset(&mut self, dataset: &UnicornDataset) {
        let revision = self.rows_revision + 1;
        *self = ExplorerState::new(dataset);
        self.rows_revision = revision;
    }

    /// Re-evaluate only the outputs bound to `input`.
    fn propagate(&mut self, dataset: &UnicornDataset, input: Input) {
        for binding in affected_bindings(input) {
            log::trace!("{input:?} -> {}", binding.name);
            match binding.output {
                Output::CityOptions => {
                    self.city_options =
                        available_cities(dataset.records(), self.selection.country.as_deref());
                }
                Output::TableRows => {
                    self.visible_indices = filtered_indices(dataset, &self.selection);
                    self.rows_revision += 1;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Visuals state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualsTab {
    Basic,
    Advanced,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup; never mutated.
    pub dataset: Arc<UnicornDataset>,
    pub summary: DatasetSummary,
    /// Chart data derived from the full dataset.
    pub gallery: Gallery,
    pub route: Route,
    pub explorer: ExplorerState,
    pub visuals_tab: VisualsTab,
    /// Year shown in the valuation-by-industry scatter.
    pub scatter_year: Option<i32>,
}

impl AppState {
    pub fn new(dataset: Arc<UnicornDataset>) -> Self {
        let summary = DatasetSummary::compute(dataset.records());
        let gallery = Gallery::compute(&dataset);
        let explorer = ExplorerState::new(&dataset);
        let scatter_year = dataset.year_span().map(|(lo, _)| lo);
        Self {
            dataset,
            summary,
            gallery,
            route: Route::Home,
            explorer,
            visuals_tab: VisualsTab::Basic,
            scatter_year,
        }
    }

    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            log::debug!("Navigating to {}", route.path());
            self.route = route;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::record;
    use pretty_assertions::assert_eq;

    fn dataset() -> UnicornDataset {
        UnicornDataset::new(
            vec![
                record("a", 1.0, Some("US"), Some("San Francisco"), Some(2015)),
                record("b", 2.0, Some("US"), Some("New York"), Some(2019)),
                record("c", 3.0, Some("DE"), Some("Berlin"), Some(2021)),
                record("d", 4.0, Some("DE"), Some("Munich"), None),
            ],
            "test",
        )
    }

    #[test]
    fn starts_at_full_year_span_without_undated() {
        let ds = dataset();
        let explorer = ExplorerState::new(&ds);
        assert_eq!(explorer.visible_indices, vec![0, 1, 2]);
        assert_eq!(explorer.selection.year_range, Some((2015, 2021)));
        assert!(!explorer.is_filtered());
        assert_eq!(explorer.country_options, vec!["DE", "US"]);
        assert_eq!(explorer.city_options.len(), 4);
        assert_eq!(explorer.year_slider, (2015, 2021));
    }

    #[test]
    fn country_change_updates_cities_and_rows() {
        let ds = dataset();
        let mut explorer = ExplorerState::new(&ds);
        explorer.select_country(&ds, Some("US".into()));
        assert_eq!(explorer.city_options, vec!["New York", "San Francisco"]);
        assert_eq!(explorer.visible_indices, vec![0, 1]);
    }

    #[test]
    fn switching_country_clears_foreign_city() {
        let ds = dataset();
        let mut explorer = ExplorerState::new(&ds);
        explorer.select_country(&ds, Some("US".into()));
        explorer.select_city(&ds, Some("New York".into()));
        assert_eq!(explorer.visible_indices, vec![1]);

        let before = explorer.rows_revision;
        explorer.select_country(&ds, Some("DE".into()));
        assert_eq!(explorer.selection.city, None);
        assert_eq!(explorer.visible_indices, vec![2]);
        assert_eq!(explorer.rows_revision, before + 1);
    }

    #[test]
    fn switching_country_keeps_a_city_that_still_belongs() {
        let ds = dataset();
        let mut explorer = ExplorerState::new(&ds);
        explorer.select_city(&ds, Some("Berlin".into()));
        explorer.select_country(&ds, Some("DE".into()));
        assert_eq!(explorer.selection.city.as_deref(), Some("Berlin"));
        assert_eq!(explorer.visible_indices, vec![2]);
    }

    #[test]
    fn city_change_leaves_options_alone() {
        let ds = dataset();
        let mut explorer = ExplorerState::new(&ds);
        explorer.select_city(&ds, Some("Berlin".into()));
        assert_eq!(explorer.city_options.len(), 4);
        assert_eq!(explorer.visible_indices, vec![2]);
    }

    #[test]
    fn year_range_always_applies() {
        let ds = dataset();
        let mut explorer = ExplorerState::new(&ds);
        explorer.set_year_range(&ds, 2019, 2015);
        assert_eq!(explorer.selection.year_range, Some((2015, 2019)));
        assert_eq!(explorer.visible_indices, vec![0, 1]);

        explorer.set_year_range(&ds, 2015, 2021);
        assert_eq!(explorer.selection.year_range, Some((2015, 2021)));
        assert_eq!(explorer.visible_indices, vec![0, 1, 2]);
        assert!(!explorer.is_filtered());
    }

    #[test]
    fn reset_restores_everything() {
        let ds = dataset();
        let mut explorer = ExplorerState::new(&ds);
        explorer.select_country(&ds, Some("DE".into()));
        explorer.set_year_range(&ds, 2020, 2021);
        assert!(explorer.is_filtered());
        explorer.reset(&ds);
        assert!(!explorer.is_filtered());
        assert_eq!(explorer.selection.country, None);
        assert_eq!(explorer.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn route_paths_are_unique() {
        let mut paths: Vec<&str> = Route::ALL.iter().map(|r| r.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths, vec!["/", "/explorer", "/insights", "/visuals"]);
    }

    #[test]
    fn app_state_starts_home_with_headlines() {
        let state = AppState::new(Arc::new(dataset()));
        assert_eq!(state.route, Route::Home);
        assert_eq!(state.summary.total, 4);
        assert_eq!(state.scatter_year, Some(2015));
    }
}
