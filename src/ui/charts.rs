use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::color;
use crate::data::aggregate::{CorrelationMatrix, HistogramBin};
use crate::data::treemap::{treemap_layout, Tile};

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Plot scaffolding
// ---------------------------------------------------------------------------

/// A plot that lets the surrounding page scroll instead of zooming.
pub fn base_plot(id: &str) -> Plot {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_boxed_zoom(true)
}

pub fn chart_title(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.strong(title);
}

/// Axis formatter that prints the category label at integer positions.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Horizontal bars for a ranked list, largest on top. Bars are coloured on
/// the sequential scale by value.
pub fn ranked_bars(ui: &mut Ui, id: &str, title: &str, value_axis: &str, rows: &[(String, f64)]) {
    chart_title(ui, title);
    if rows.is_empty() {
        ui.label("No data.");
        return;
    }

    let max = rows.iter().map(|r| r.1).fold(0.0, f64::max);
    let n = rows.len();
    // Position 0 is the bottom of the plot, so the first row goes last.
    let labels: Vec<String> = rows.iter().rev().map(|r| r.0.clone()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(rank, (label, value))| {
            let t = if max > 0.0 { (value / max) as f32 } else { 0.0 };
            Bar::new((n - 1 - rank) as f64, *value)
                .name(label)
                .fill(color::sequential(t))
                .width(0.7)
        })
        .collect();

    base_plot(id)
        .x_axis_label(value_axis)
        .y_axis_formatter(category_formatter(labels))
        .y_axis_min_width(140.0)
        .include_x(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// Valuation histogram.
pub fn histogram(ui: &mut Ui, id: &str, title: &str, bins: &[HistogramBin]) {
    chart_title(ui, title);
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width((b.end - b.start).max(f64::EPSILON))
                .name(format!("{:.1}–{:.1}", b.start, b.end))
        })
        .collect();

    base_plot(id)
        .x_axis_label("Valuation ($B)")
        .y_axis_label("Companies")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(99, 110, 250)));
        });
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Fractional year, so dates can share an axis with plain years.
pub fn decimal_year(date: NaiveDate) -> f64 {
    let days_in_year = if NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some() {
        366.0
    } else {
        365.0
    };
    date.year() as f64 + f64::from(date.ordinal0()) / days_in_year
}

/// Cumulative count over time. Undated entries have no x position and are
/// not drawn.
pub fn growth_line(ui: &mut Ui, id: &str, title: &str, series: &[(Option<NaiveDate>, usize)]) {
    chart_title(ui, title);
    let points: PlotPoints = series
        .iter()
        .filter_map(|(d, n)| d.map(|d| [decimal_year(d), *n as f64]))
        .collect();

    base_plot(id)
        .x_axis_label("Date")
        .y_axis_label("Number of Unicorns")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Cumulative Unicorns")
                    .color(Color32::from_rgb(65, 105, 225))
                    .width(3.0),
            );
        });
}

/// One line per named series of `(x, y)` points.
pub fn multi_line(
    ui: &mut Ui,
    id: &str,
    title: &str,
    (x_label, y_label): (&str, &str),
    series: Vec<(String, Color32, Vec<[f64; 2]>)>,
) {
    chart_title(ui, title);
    base_plot(id)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            for (name, color, points) in series {
                plot_ui.line(Line::new(PlotPoints::from(points)).name(name).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Painter-based charts
// ---------------------------------------------------------------------------

/// Correlation heatmap with the coefficient printed in each cell.
pub fn heatmap(ui: &mut Ui, title: &str, matrix: &CorrelationMatrix) {
    chart_title(ui, title);
    if matrix.is_empty() {
        ui.label("No data.");
        return;
    }

    let n = matrix.len();
    let label_w = 120.0;
    let cell = ((ui.available_width() - label_w) / n as f32).clamp(40.0, 110.0);
    let size = Vec2::new(label_w + cell * n as f32, 24.0 + cell * n as f32);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();

    let origin = Pos2::new(rect.left() + label_w, rect.top() + 24.0);
    for (j, col) in matrix.columns.iter().enumerate() {
        let pos = Pos2::new(origin.x + (j as f32 + 0.5) * cell, rect.top() + 12.0);
        painter.text(pos, Align2::CENTER_CENTER, col.header(), font.clone(), text_color);
    }

    let mut hovered = None;
    for i in 0..n {
        let y = origin.y + i as f32 * cell;
        painter.text(
            Pos2::new(origin.x - 6.0, y + cell / 2.0),
            Align2::RIGHT_CENTER,
            matrix.columns[i].header(),
            font.clone(),
            text_color,
        );
        for j in 0..n {
            let r = matrix.get(i, j);
            let cell_rect = Rect::from_min_size(
                Pos2::new(origin.x + j as f32 * cell, y),
                Vec2::splat(cell),
            )
            .shrink(1.0);
            painter.rect_filled(cell_rect, 0.0, color::diverging(r));
            let label = if r.is_nan() { "n/a".to_string() } else { format!("{r:.2}") };
            painter.text(cell_rect.center(), Align2::CENTER_CENTER, label, font.clone(), Color32::BLACK);

            if response.hover_pos().is_some_and(|p| cell_rect.contains(p)) {
                hovered = Some((i, j, r));
            }
        }
    }

    if let Some((i, j, r)) = hovered {
        response.on_hover_text(format!(
            "{} × {}\nCorrelation: {r:.3}",
            matrix.columns[i], matrix.columns[j]
        ));
    }
}

/// Squarified treemap of `(label, value)` tiles, coloured by value.
pub fn treemap(ui: &mut Ui, title: &str, rows: &[(String, f64)]) {
    chart_title(ui, title);
    if rows.is_empty() {
        ui.label("No data.");
        return;
    }

    let size = Vec2::new(ui.available_width(), CHART_HEIGHT + 80.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);

    let weights: Vec<f64> = rows.iter().map(|r| r.1).collect();
    let bounds = Tile::new(
        f64::from(rect.left()),
        f64::from(rect.top()),
        f64::from(rect.width()),
        f64::from(rect.height()),
    );
    let max = weights.iter().copied().fold(0.0, f64::max);

    let mut hovered = None;
    for ((label, value), tile) in rows.iter().zip(treemap_layout(&weights, bounds)) {
        if tile.area() <= 0.0 {
            continue;
        }
        let tile_rect = Rect::from_min_size(
            Pos2::new(tile.x as f32, tile.y as f32),
            Vec2::new(tile.w as f32, tile.h as f32),
        )
        .shrink(1.0);
        let t = if max > 0.0 { (value / max) as f32 } else { 0.0 };
        painter.rect_filled(tile_rect, 2.0, color::sequential(t));

        if tile_rect.width() > 60.0 && tile_rect.height() > 30.0 {
            painter.with_clip_rect(tile_rect).text(
                tile_rect.left_top() + Vec2::new(4.0, 4.0),
                Align2::LEFT_TOP,
                format!("{label}\n${value:.1}B"),
                FontId::proportional(12.0),
                if t > 0.6 { Color32::BLACK } else { Color32::WHITE },
            );
        }
        if response.hover_pos().is_some_and(|p| tile_rect.contains(p)) {
            hovered = Some(format!("{label}: ${value:.2}B"));
        }
    }

    if let Some(text) = hovered {
        response.on_hover_text(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_year_starts_at_the_year() {
        assert_eq!(decimal_year(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()), 2020.0);
        let mid = decimal_year(NaiveDate::from_ymd_opt(2021, 7, 2).unwrap());
        assert!(mid > 2021.49 && mid < 2021.51);
    }

    #[test]
    fn category_labels_only_at_integer_marks() {
        let fmt = category_formatter(vec!["DE".into(), "US".into()]);
        let range = 0.0..=1.0;
        let mark = |value| GridMark {
            value,
            step_size: 0.5,
        };
        assert_eq!(fmt(mark(1.0), &range), "US");
        assert_eq!(fmt(mark(0.5), &range), "");
        assert_eq!(fmt(mark(5.0), &range), "");
    }
}
