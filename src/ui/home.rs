use eframe::egui::{RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// / – landing page
// ---------------------------------------------------------------------------

pub fn home_page(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("Welcome to the Unicorn Dashboard").size(28.0));
            ui.add_space(12.0);

            section(ui, "🦄 What is a Unicorn Company?");
            ui.label(
                "A unicorn company is a privately held startup valued at over $1 billion. \
                 The term was coined to emphasize how rare these ventures used to be, like \
                 spotting a unicorn in the wild. Today, hundreds of such companies exist \
                 globally, particularly in the technology, fintech, and e-commerce sectors.",
            );

            section(ui, "📊 About This Dashboard");
            if state.dataset.is_empty() {
                ui.colored_label(
                    ui.visuals().warn_fg_color,
                    "The data source returned no companies.",
                );
            } else {
                ui.label(format!(
                    "This dashboard includes a total of {} unicorn companies sourced from a \
                     public dataset. You can explore trends by country, city, industry, and \
                     company valuation.",
                    state.summary.total
                ));
            }
            ui.small(format!("Source: {}", state.dataset.source()));

            section(ui, "🇦🇲 Note on Armenian Unicorns");
            ui.label(
                "The original dataset did not include Armenia's two well-known unicorns: \
                 Picsart and ServiceTitan. These companies were manually added to ensure \
                 representation. While Picsart remains private, ServiceTitan has already \
                 gone public.",
            );

            section(ui, "🔍 Use this dashboard to:");
            for item in [
                "Explore the distribution of unicorns by geography and industry",
                "Understand average company valuations and growth trends",
                "Gain insights into the global startup landscape",
            ] {
                ui.label(format!("  •  {item}"));
            }
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(16.0);
    ui.label(RichText::new(title).heading().strong());
    ui.add_space(4.0);
}
