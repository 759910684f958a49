use eframe::egui::{RichText, Ui};

use crate::data::aggregate::{DatasetSummary, BOOM_AFTER_YEAR};

// ---------------------------------------------------------------------------
// /insights – headline numbers in prose
// ---------------------------------------------------------------------------

/// Sentences for the insights page. Missing data yields fewer lines rather
/// than placeholder numbers.
pub fn insight_lines(summary: &DatasetSummary) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some((country, count)) = &summary.top_country {
        lines.push(format!(
            "🌍 The country with the most unicorns is {country} ({count} companies)."
        ));
    }
    if let Some(mean) = summary.mean_valuation {
        lines.push(format!("💰 The average unicorn valuation is ${mean:.2} billion."));
    }
    if let Some(share) = summary.joined_after_boom_share {
        let pct = share * 100.0;
        lines.push(if share > 0.5 {
            format!(
                "📈 {pct:.0}% of unicorns joined after {BOOM_AFTER_YEAR}, indicating rapid startup growth."
            )
        } else {
            format!("📈 Only {pct:.0}% of unicorns joined after {BOOM_AFTER_YEAR}.")
        });
    }
    if !summary.top_industries.is_empty() {
        let names: Vec<&str> = summary
            .top_industries
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        lines.push(format!("💡 Dominant industries include {}.", names.join(", ")));
    }
    lines
}

pub fn insights_page(ui: &mut Ui, summary: &DatasetSummary) {
    ui.heading("Key Insights");
    ui.add_space(12.0);
    for line in insight_lines(summary) {
        ui.label(RichText::new(line).size(16.0));
        ui.add_space(6.0);
    }
}
