use std::sync::Arc;

use eframe::egui;

use crate::data::model::UnicornDataset;
use crate::state::{AppState, Route};
use crate::ui::{explorer, home, insights, nav, visuals};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct UnicornDashboardApp {
    pub state: AppState,
}

impl UnicornDashboardApp {
    pub fn new(dataset: Arc<UnicornDataset>) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

impl eframe::App for UnicornDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: navigation ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            nav::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: current page ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.route {
            Route::Home => home::home_page(ui, &self.state),
            Route::Explorer => explorer::explorer_page(ui, &mut self.state),
            Route::Insights => insights::insights_page(ui, &self.state.summary),
            Route::Visuals => visuals::visuals_page(ui, &mut self.state),
        });
    }
}
