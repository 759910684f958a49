use chrono::NaiveDate;
use eframe::egui::{self, CollapsingHeader, ProgressBar, RichText, ScrollArea, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Points};

use super::charts;
use crate::color::ColorMap;
use crate::data::aggregate::{
    correlation_matrix, cumulative_growth, distinct_sorted, group_summary, investor_counts,
    ranked_aggregate, top_n, top_valued, valuation_histogram, valuation_hierarchy,
    valuation_spread, yearly_counts_by, AggregateOp, CorrelationMatrix, GroupSummary,
    HierarchyNode, HistogramBin, ValuationSpread,
};
use crate::data::filter::{apply_filters, Selection};
use crate::data::model::{CellValue, Column, UnicornDataset};
use crate::state::{AppState, VisualsTab};

const HISTOGRAM_BINS: usize = 30;
const TOP_CATEGORIES: usize = 10;
const TOP_INVESTORS: usize = 20;

/// Columns compared in the correlation heatmap.
pub const CORRELATION_COLUMNS: [Column; 4] =
    [Column::Valuation, Column::Country, Column::City, Column::Industry];

// ---------------------------------------------------------------------------
// Gallery – chart data derived once from the immutable dataset
// ---------------------------------------------------------------------------

pub struct Gallery {
    pub histogram: Vec<HistogramBin>,
    pub top_countries: Vec<(String, f64)>,
    pub top_cities: Vec<(String, f64)>,
    pub top_industries: Vec<(String, f64)>,
    pub correlation: CorrelationMatrix,
    pub top_companies: Vec<(String, f64)>,
    pub valuation_by_country: Vec<(String, f64)>,
    pub valuation_by_industry: Vec<(String, f64)>,
    pub growth: Vec<(Option<NaiveDate>, usize)>,
    pub investors: Vec<(String, f64)>,
    pub industry_trend: Vec<(CellValue, Vec<[f64; 2]>)>,
    pub spread: Vec<ValuationSpread>,
    pub hierarchy: Vec<HierarchyNode>,
    pub bubbles: Vec<GroupSummary>,
    pub industries: Vec<CellValue>,
    pub industry_colors: ColorMap,
}

fn labelled<T: ToString>(rows: Vec<(T, usize)>) -> Vec<(String, f64)> {
    rows.into_iter()
        .map(|(k, n)| (k.to_string(), n as f64))
        .collect()
}

fn labelled_f64(rows: Vec<(CellValue, f64)>) -> Vec<(String, f64)> {
    rows.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

impl Gallery {
    pub fn compute(dataset: &UnicornDataset) -> Self {
        let records = dataset.records();
        let industries = distinct_sorted(records, Column::Industry);

        let industry_trend = yearly_counts_by(records, Column::Industry)
            .into_iter()
            .map(|(industry, per_year)| {
                let points: Vec<[f64; 2]> = per_year
                    .into_iter()
                    .map(|(year, n)| [f64::from(year), n as f64])
                    .collect();
                (industry, points)
            })
            .collect();

        Self {
            histogram: valuation_histogram(records, HISTOGRAM_BINS),
            top_countries: labelled(top_n(records, Column::Country, TOP_CATEGORIES)),
            top_cities: labelled(top_n(records, Column::City, TOP_CATEGORIES)),
            top_industries: labelled(top_n(records, Column::Industry, TOP_CATEGORIES)),
            correlation: correlation_matrix(records, &CORRELATION_COLUMNS),
            top_companies: top_valued(records, TOP_CATEGORIES)
                .into_iter()
                .map(|r| (r.company.clone(), r.valuation()))
                .collect(),
            valuation_by_country: labelled_f64(ranked_aggregate(
                records,
                Column::Country,
                Column::Valuation,
                AggregateOp::Sum,
            )),
            valuation_by_industry: labelled_f64(ranked_aggregate(
                records,
                Column::Industry,
                Column::Valuation,
                AggregateOp::Sum,
            )),
            growth: cumulative_growth(records),
            investors: labelled(investor_counts(records, TOP_INVESTORS)),
            industry_trend,
            spread: valuation_spread(records, Column::Industry),
            hierarchy: valuation_hierarchy(
                records,
                &[Column::Country, Column::City, Column::Industry],
            ),
            bubbles: group_summary(records, Column::Industry),
            industry_colors: ColorMap::new(&industries),
            industries,
        }
    }
}

// ---------------------------------------------------------------------------
// /visuals page
// ---------------------------------------------------------------------------

pub fn visuals_page(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Unicorn Visualizations");
    });
    ui.add_space(8.0);

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.visuals_tab, VisualsTab::Basic, "📊 Simple Visuals");
        ui.selectable_value(&mut state.visuals_tab, VisualsTab::Advanced, "📈 Advanced Visuals");
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.visuals_tab {
            VisualsTab::Basic => basic_tab(ui, &state.gallery),
            VisualsTab::Advanced => advanced_tab(ui, state),
        });
}

fn basic_tab(ui: &mut Ui, gallery: &Gallery) {
    charts::histogram(ui, "valuation_hist", "Distribution of Unicorn Valuations", &gallery.histogram);
    charts::ranked_bars(
        ui,
        "top_countries",
        "Top 10 Countries with Most Unicorns",
        "Count",
        &gallery.top_countries,
    );
    charts::ranked_bars(
        ui,
        "top_cities",
        "Top 10 Cities with Most Unicorns",
        "Count",
        &gallery.top_cities,
    );
    charts::ranked_bars(
        ui,
        "top_industries",
        "Top 10 Unicorn Industries",
        "Count",
        &gallery.top_industries,
    );
    charts::heatmap(
        ui,
        "Correlation Between Valuation and Categorical Features",
        &gallery.correlation,
    );
    ui.add_space(6.0);
    ui.label(
        "🔎 This heatmap shows the correlation between valuation and categorical features. \
         Categories are label-encoded in alphabetical order, which treats them as if they were \
         ordered, so the numbers are only a rough hint. Little to no correlation between \
         valuation and country, city or industry suggests high-valuation startups emerge across \
         many locations and sectors without a strong geographic or sector bias.",
    );
}

fn advanced_tab(ui: &mut Ui, state: &mut AppState) {
    let gallery = &state.gallery;

    charts::ranked_bars(
        ui,
        "top_companies",
        "Top 10 Most Valuable Unicorn Companies",
        "Valuation in Billions ($)",
        &gallery.top_companies,
    );
    charts::ranked_bars(
        ui,
        "valuation_by_country",
        "Total Unicorn Valuation by Country",
        "Valuation in Billions ($)",
        &gallery.valuation_by_country,
    );
    charts::treemap(
        ui,
        "Unicorn Valuation Distribution by Industry",
        &gallery.valuation_by_industry,
    );
    charts::growth_line(
        ui,
        "cumulative_growth",
        "Cumulative Growth of Unicorn Companies Over Time",
        &gallery.growth,
    );

    yearly_scatter(ui, state);
    let gallery = &state.gallery;

    charts::ranked_bars(
        ui,
        "top_investors",
        "Top 20 Most Active Unicorn Investors",
        "Number of Unicorns Backed",
        &gallery.investors,
    );

    let trend = gallery
        .industry_trend
        .iter()
        .map(|(industry, points)| {
            (
                industry.to_string(),
                gallery.industry_colors.color_for(industry),
                points.clone(),
            )
        })
        .collect();
    charts::multi_line(
        ui,
        "industry_trend",
        "Unicorns Founded per Industry Over Time",
        ("Year", "Unicorn Count"),
        trend,
    );

    spread_plot(ui, gallery);
    hierarchy_view(ui, &gallery.hierarchy);
    bubble_plot(ui, gallery);
}

/// Valuation by industry for one join year; the slider picks the year.
fn yearly_scatter(ui: &mut Ui, state: &mut AppState) {
    charts::chart_title(ui, "Unicorns Over Time: Valuation Growth by Industry");
    let Some((lo, hi)) = state.dataset.year_span() else {
        ui.label("No dated records.");
        return;
    };
    let mut year = state.scatter_year.unwrap_or(lo);
    ui.add(egui::Slider::new(&mut year, lo..=hi).text("Year joined"));
    state.scatter_year = Some(year);

    let selection = Selection {
        year_range: Some((year, year)),
        ..Selection::default()
    };
    let rows = apply_filters(state.dataset.records(), &selection);
    let gallery = &state.gallery;

    charts::base_plot("yearly_scatter")
        .legend(Legend::default())
        .x_axis_label("log10 Valuation ($B)")
        .show(ui, |plot_ui| {
            for (i, industry) in gallery.industries.iter().enumerate() {
                let points: Vec<[f64; 2]> = rows
                    .iter()
                    .filter(|r| r.industry.as_deref() == industry.as_str())
                    .filter(|r| r.valuation() > 0.0)
                    .map(|r| [r.valuation().log10(), i as f64])
                    .collect();
                if points.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(points)
                        .name(industry.to_string())
                        .color(gallery.industry_colors.color_for(industry))
                        .radius(5.0),
                );
            }
        });
}

/// Box plots standing in for the per-industry valuation distribution.
fn spread_plot(ui: &mut Ui, gallery: &Gallery) {
    charts::chart_title(ui, "Valuation Distribution by Industry");
    let boxes: Vec<BoxElem> = gallery
        .spread
        .iter()
        .enumerate()
        .map(|(i, s)| {
            BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                .name(format!("{} ({} companies)", s.key, s.count))
                .fill(gallery.industry_colors.color_for(&s.key))
                .box_width(0.6)
        })
        .collect();

    charts::base_plot("valuation_spread")
        .y_axis_label("Valuation ($B)")
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes));
        });
}

/// Country → city → industry breakdown of total valuation.
fn hierarchy_view(ui: &mut Ui, nodes: &[HierarchyNode]) {
    charts::chart_title(ui, "Geographic and Industry Breakdown of Valuation");
    let grand_total: f64 = nodes.iter().map(|n| n.total).sum();
    hierarchy_level(ui, nodes, grand_total, 0);
}

fn hierarchy_level(ui: &mut Ui, nodes: &[HierarchyNode], parent_total: f64, depth: usize) {
    for (i, node) in nodes.iter().enumerate() {
        let share = if parent_total > 0.0 { node.total / parent_total } else { 0.0 };
        let text = format!(
            "{}  ${:.1}B  ·  {:.1}%  ·  {} companies",
            node.label,
            node.total,
            share * 100.0,
            node.count
        );

        if node.children.is_empty() {
            ui.horizontal(|ui: &mut Ui| {
                ui.add(ProgressBar::new(share as f32).desired_width(160.0));
                ui.label(text);
            });
            continue;
        }

        CollapsingHeader::new(RichText::new(text).strong())
            .id_salt((depth, i, &node.label))
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                hierarchy_level(ui, &node.children, node.total, depth + 1);
            });
    }
}

/// Average valuation against number of unicorns, one bubble per industry.
fn bubble_plot(ui: &mut Ui, gallery: &Gallery) {
    charts::chart_title(ui, "Industry Analysis: Avg Valuation vs. Number of Unicorns");
    let max_count = gallery.bubbles.iter().map(|b| b.count).max().unwrap_or(1).max(1);

    charts::base_plot("industry_bubbles")
        .legend(Legend::default())
        .x_axis_label("Number of Unicorns")
        .y_axis_label("Average Valuation ($B)")
        .show(ui, |plot_ui| {
            for bubble in &gallery.bubbles {
                let radius = 4.0 + 20.0 * (bubble.count as f32 / max_count as f32).sqrt();
                plot_ui.points(
                    Points::new(vec![[bubble.count as f64, bubble.mean_valuation]])
                        .name(bubble.key.to_string())
                        .color(gallery.industry_colors.color_for(&bubble.key))
                        .radius(radius),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::record;

    #[test]
    fn gallery_covers_every_chart() {
        let mut records = vec![
            record("a", 10.0, Some("US"), Some("SF"), Some(2015)),
            record("b", 20.0, Some("US"), Some("NY"), Some(2019)),
            record("c", 25.0, Some("DE"), Some("Berlin"), Some(2021)),
        ];
        records[0].industry = Some("Fintech".into());
        records[1].industry = Some("Fintech".into());
        records[2].industry = Some("Health".into());
        records[0].select_investors = Some("Accel, Sequoia".into());
        records[2].select_investors = Some("Accel".into());
        let gallery = Gallery::compute(&UnicornDataset::new(records, "test"));

        assert_eq!(gallery.histogram.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(gallery.top_countries[0], ("US".to_string(), 2.0));
        assert_eq!(gallery.top_companies[0], ("c".to_string(), 25.0));
        assert_eq!(gallery.valuation_by_country[0], ("US".to_string(), 30.0));
        assert_eq!(gallery.valuation_by_industry[0], ("Fintech".to_string(), 30.0));
        assert_eq!(gallery.investors[0], ("Accel".to_string(), 2.0));
        assert_eq!(gallery.growth.len(), 3);
        assert_eq!(gallery.correlation.len(), CORRELATION_COLUMNS.len());
        assert_eq!(gallery.industries.len(), 2);
        assert_eq!(gallery.industry_trend.len(), 2);
        assert_eq!(gallery.spread.len(), 2);
        assert_eq!(gallery.bubbles.len(), 2);
        assert_eq!(gallery.hierarchy.len(), 2);
    }
}
