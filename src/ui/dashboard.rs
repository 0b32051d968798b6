use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Record, COLUMNS};
use crate::state::AppState;
use crate::ui::charts;

// ---------------------------------------------------------------------------
// Dashboard page (central panel)
// ---------------------------------------------------------------------------

/// Render KPIs, the filtered table and every chart for the current selection.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore it  (File → Open…)");
        });
        return;
    };
    // Palettes are only built for datasets with rows.
    let Some(palettes) = &state.palettes else {
        ui.heading("Global Finance Market Dashboard");
        ui.add_space(6.0);
        kpis(ui, state);
        ui.separator();
        ui.label(RichText::new("The loaded dataset has no rows, so there is nothing to chart.").weak());
        return;
    };

    let rows: Vec<&Record> = state.result.rows(dataset).collect();
    let cfg = &state.config;
    let h = cfg.chart_height;

    ScrollArea::vertical()
        .id_salt("dashboard_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Global Finance Market Dashboard");
            ui.add_space(6.0);
            kpis(ui, state);
            ui.separator();

            data_table(ui, &rows, cfg.table_row_limit);
            ui.separator();

            section(
                ui,
                "Index Change % by Market Index",
                "Which index gained or lost the most over the filtered period.",
                |ui| charts::index_change_by_market_index(ui, &rows, &palettes.market_index, h),
            );
            section(
                ui,
                "Index Change Trend Over Time",
                "Trends, volatility and sudden spikes per index.",
                |ui| charts::index_trend(ui, &rows, &palettes.market_index, h),
            );
            section(
                ui,
                "Trading Volume by Sector",
                "High volume marks strong interest or major news impact.",
                |ui| charts::trading_volume_by_sector(ui, &rows, &palettes.sector, h),
            );
            section(
                ui,
                "Volume vs Index Change",
                "High volume with a large move signals conviction; with a small move, indecision.",
                |ui| charts::volume_vs_index_by_sentiment(ui, &rows, &palettes.sentiment, h),
            );
            section(
                ui,
                "Market Sentiment Distribution",
                "The dominant sentiment reflects investor confidence.",
                |ui| charts::sentiment_pie(ui, &rows, &palettes.sentiment, h),
            );
            section(
                ui,
                "Trading Volume Distribution by Sector",
                "Spread, median and extremes of sector trading volumes.",
                |ui| charts::volume_box_by_sector(ui, &rows, &palettes.sector, h),
            );
            section(
                ui,
                "Distribution of Index Change Percent",
                "Whether most moves are small or extreme.",
                |ui| charts::index_change_histogram(ui, &rows, cfg.histogram_bins, h),
            );
            section(
                ui,
                "Market Events Impact Across Sectors",
                "Brighter cells mean more events of that type hit the sector.",
                |ui| charts::event_sector_heatmap(ui, &rows),
            );
            section(
                ui,
                "Impact Level by Company",
                "Larger blocks carry more trading volume.",
                |ui| charts::impact_company_treemap(ui, &rows, h),
            );
            section(
                ui,
                "News Source to Sentiment Flow",
                "Which sources and events produce which sentiment.",
                |ui| charts::source_event_sentiment_tree(ui, &rows, &palettes.sentiment),
            );
            section(
                ui,
                "Trading Volume Trend by Sector Over Time",
                "Rising area means growing participation.",
                |ui| charts::volume_trend_by_sector(ui, &rows, &palettes.sector, h),
            );
            section(
                ui,
                "Index Change Percent vs Trading Volume by Market Index",
                "Performance against liquidity across indices.",
                |ui| charts::index_vs_volume_by_market_index(ui, &rows, &palettes.market_index, h),
            );
        });
}

fn section(ui: &mut Ui, title: &str, insight: &str, body: impl FnOnce(&mut Ui)) {
    ui.add_space(10.0);
    ui.heading(title);
    ui.label(RichText::new(insight).weak().italics());
    ui.add_space(4.0);
    body(ui);
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

/// Total news, average index change and total volume, formatted for display.
fn kpi_values(state: &AppState) -> [String; 3] {
    let decimals = state.config.kpi_decimals;
    let result = &state.result;

    let avg = match result.avg_index_change {
        Some(v) => format!("{v:.decimals$}"),
        None => "no data".to_string(),
    };
    [
        result.count.to_string(),
        avg,
        format!("{:.decimals$}", result.total_trading_volume),
    ]
}

fn kpis(ui: &mut Ui, state: &AppState) {
    let [count, avg, volume] = kpi_values(state);
    ui.columns(3, |cols| {
        kpi(&mut cols[0], "Total News", &count);
        kpi(&mut cols[1], "Avg Index Change %", &avg);
        kpi(&mut cols[2], "Total Trading Volume", &volume);
    });
}

fn kpi(ui: &mut Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Filtered rows table
// ---------------------------------------------------------------------------

fn data_table(ui: &mut Ui, rows: &[&Record], limit: usize) {
    let shown = rows.len().min(limit);
    if shown < rows.len() {
        ui.label(RichText::new(format!("Showing first {shown} of {} rows", rows.len())).weak());
    }

    ui.push_id("data_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(280.0)
            .columns(Column::auto().at_least(60.0).clip(true), COLUMNS.len())
            .header(20.0, |mut header| {
                for name in COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, shown, |mut row| {
                    let r = rows[row.index()];
                    let cells = [
                        r.date.format("%Y-%m-%d").to_string(),
                        r.headline.clone(),
                        r.source.clone(),
                        r.market_event.clone(),
                        r.market_index.clone(),
                        format!("{:.2}", r.index_change_percent),
                        format!("{:.0}", r.trading_volume),
                        r.sentiment.clone(),
                        r.sector.clone(),
                        r.impact_level.clone(),
                        r.related_company.clone(),
                    ];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::DashboardConfig;
    use crate::data::Dataset;

    #[test]
    fn empty_dataset_kpis() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(Arc::new(Dataset::default()));
        assert_eq!(kpi_values(&state), ["0", "no data", "0.00"]);
    }

    #[test]
    fn empty_dataset_renders_without_charts() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(Arc::new(Dataset::default()));

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| dashboard(ui, &state));
        });
    }
}
