use eframe::egui::{self, Align, Layout, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Column;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// /explorer – selection widgets
// ---------------------------------------------------------------------------

/// Combo box over `options` with an "all" entry. Returns the new choice
/// when the user picked something different.
fn optional_combo(
    ui: &mut Ui,
    id: &str,
    placeholder: &str,
    current: Option<&str>,
    options: &[String],
) -> Option<Option<String>> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .width(260.0)
        .selected_text(current.unwrap_or(placeholder))
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), placeholder).clicked() && current.is_some() {
                picked = Some(None);
            }
            for option in options {
                let is_selected = current == Some(option.as_str());
                if ui.selectable_label(is_selected, option).clicked() && !is_selected {
                    picked = Some(Some(option.clone()));
                }
            }
        });
    picked
}

/// Render the selection controls; every change goes through the explorer
/// state so only the bound outputs are recomputed.
fn controls(ui: &mut Ui, state: &mut AppState) {
    let dataset = state.dataset.clone();
    let explorer = &mut state.explorer;

    egui::Grid::new("explorer_controls")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Select Country:");
            if let Some(country) = optional_combo(
                ui,
                "country-selector",
                "All countries",
                explorer.selection.country.as_deref(),
                &explorer.country_options,
            ) {
                explorer.select_country(&dataset, country);
            }
            ui.end_row();

            ui.label("Select City:");
            if let Some(city) = optional_combo(
                ui,
                "city-selector",
                "All cities",
                explorer.selection.city.as_deref(),
                &explorer.city_options,
            ) {
                explorer.select_city(&dataset, city);
            }
            ui.end_row();

            ui.label("Select Year Range:");
            match explorer.year_bounds {
                Some((min, max)) => {
                    let (mut lo, mut hi) = explorer.year_slider;
                    ui.horizontal(|ui: &mut Ui| {
                        ui.add(egui::Slider::new(&mut lo, min..=max).text("from"));
                        ui.add(egui::Slider::new(&mut hi, min..=max).text("to"));
                    });
                    if (lo, hi) != explorer.year_slider {
                        explorer.set_year_range(&dataset, lo, hi);
                    }
                }
                None => {
                    ui.label("no dated records");
                }
            }
            ui.end_row();
        });

    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "{} of {} companies",
            explorer.visible_indices.len(),
            dataset.len()
        ));
        let has_filter = explorer.is_filtered();
        if ui
            .add_enabled(has_filter, egui::Button::new("Reset filters"))
            .clicked()
        {
            explorer.reset(&dataset);
        }
    });
}

// ---------------------------------------------------------------------------
// /explorer – table
// ---------------------------------------------------------------------------

fn table(ui: &mut Ui, state: &AppState) {
    let records = state.dataset.records();
    let rows = &state.explorer.visible_indices;

    // A new id per rebuild scrolls the table back to the top.
    TableBuilder::new(ui)
        .id_salt(("explorer_table", state.explorer.rows_revision))
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(TableColumn::auto().at_least(140.0))
        .column(TableColumn::auto().at_least(90.0))
        .columns(TableColumn::auto().at_least(110.0), 3)
        .column(TableColumn::auto().at_least(90.0))
        .column(TableColumn::remainder().at_least(200.0))
        .header(24.0, |mut header| {
            for column in Column::SOURCE {
                header.col(|ui: &mut Ui| {
                    ui.strong(column.header());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let rec = &records[rows[row.index()]];
                for column in Column::SOURCE {
                    row.col(|ui: &mut Ui| {
                        ui.label(rec.display(column));
                    });
                }
            });
        });
}

pub fn explorer_page(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("Explore Unicorn Companies").size(24.0));
    });
    ui.add_space(12.0);

    controls(ui, state);
    ui.separator();

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        table(ui, state);
    });
}
