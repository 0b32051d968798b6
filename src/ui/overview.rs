use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::{AppState, Page};

const COLUMN_DOCS: [(&str, &str); 11] = [
    ("date", "Date when the market news was reported"),
    ("headline", "News headline describing the event"),
    ("source", "News source (e.g., Bloomberg, Reuters)"),
    ("market_event", "Type of event (Interest Rate Change, Earnings, Policy Update, ...)"),
    ("market_index", "Affected market index (e.g., NIFTY, SENSEX, NASDAQ)"),
    ("index_change_percent", "Percentage change in the index due to the event"),
    ("trading_volume", "Trading volume recorded after the news"),
    ("sentiment", "Market sentiment derived from the news (Positive, Negative, Neutral)"),
    ("sector", "Industry sector impacted (IT, Banking, Retail, ...)"),
    ("impact_level", "Severity of impact (Low, Medium, High)"),
    ("related_company", "Major company associated with the news"),
];

const VISUALS: [&str; 13] = [
    "KPI cards: total news count, average index change %, total trading volume",
    "Bar chart: index change % by market index",
    "Line chart: market index change trend over time",
    "Bar chart: trading volume by sector",
    "Scatter plot: trading volume vs index change %, coloured by sentiment",
    "Pie chart: market sentiment distribution",
    "Box plot: trading volume distribution by sector",
    "Histogram: distribution of index change %",
    "Heatmap: market events across sectors",
    "Treemap: impact level by related company, sized by trading volume",
    "Hierarchy: news source → market event → sentiment",
    "Area chart: trading volume by sector over time",
    "Scatter plot: index change % vs trading volume by market index",
];

/// Landing page describing the dataset and the dashboard.
pub fn overview(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .id_salt("overview_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(RichText::new("Global Finance Market Analysis").size(28.0));
                match &state.dataset {
                    Some(ds) => ui.label(format!(
                        "{} records of financial market news events and their impact on market \
                         indices, trading activity, and sentiment.",
                        ds.len()
                    )),
                    None => ui.label("No dataset loaded yet. Use File → Open… to pick a CSV, JSON or Parquet file."),
                };
            });
            ui.add_space(12.0);

            ui.heading("Dataset Overview");
            egui::Grid::new("column_docs")
                .striped(true)
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Column");
                    ui.strong("Description");
                    ui.end_row();
                    for (column, doc) in COLUMN_DOCS {
                        ui.monospace(column);
                        ui.label(doc);
                        ui.end_row();
                    }
                });
            ui.add_space(12.0);

            ui.heading("Dashboard Visualizations");
            for item in VISUALS {
                ui.label(format!("• {item}"));
            }
            ui.add_space(12.0);

            if state.dataset.is_some() && ui.button("Open dashboard →").clicked() {
                state.page = Page::Dashboard;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::COLUMNS;

    #[test]
    fn every_column_is_documented_in_schema_order() {
        let documented: Vec<&str> = COLUMN_DOCS.iter().map(|(c, _)| *c).collect();
        assert_eq!(documented, COLUMNS);
    }
}
