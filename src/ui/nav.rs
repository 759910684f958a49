use eframe::egui::{self, RichText, Ui};

use crate::state::{AppState, Route};

// ---------------------------------------------------------------------------
// Top navigation bar
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(RichText::new("🦄 Unicorn Dashboard").strong().size(16.0));

        ui.separator();

        for route in Route::ALL {
            if ui
                .selectable_label(state.route == route, route.name())
                .on_hover_text(route.path())
                .clicked()
            {
                state.navigate(route);
            }
        }

        ui.separator();

        ui.label(format!("{} companies loaded", state.dataset.len()))
            .on_hover_text(state.dataset.source());
    });
}
