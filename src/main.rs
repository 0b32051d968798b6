use std::path::PathBuf;

use anyhow::Context;
use eframe::egui;
use market_news_dashboard::app::DashboardApp;
use market_news_dashboard::config::DashboardConfig;
use market_news_dashboard::state::{AppState, Page};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env();
    let mut state = AppState::new(config.clone());

    // Optional dataset path as the first argument. A bad file aborts startup.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state
            .open(&path)
            .with_context(|| format!("cannot start with dataset {}", path.display()))?;
        state.page = Page::Dashboard;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Global Finance Market Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window closed with an error: {e}"))
}
