mod app;
mod bindings;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use app::UnicornDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::from_env();
    let dataset = match data::loader::load(&config) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load unicorn data: {e}");
            if e.is_source_failure() {
                log::error!(
                    "Check the network connection or point {} at a local CSV file",
                    config::SOURCE_ENV
                );
            }
            return Err(e).with_context(|| format!("loading data from {}", config.source));
        }
    };
    log::info!("Loaded {} unicorn companies", dataset.len());
    let dataset = Arc::new(dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Unicorn Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(UnicornDashboardApp::new(dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the dashboard window: {e}"))
}
