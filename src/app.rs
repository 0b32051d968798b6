use eframe::egui;

use crate::state::{AppState, Page};
use crate::ui::{dashboard, overview, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Load failure: modal until dismissed ----
        if let Some(message) = self.state.load_error.clone() {
            let modal = egui::Modal::new(egui::Id::new("load_error")).show(ctx, |ui| {
                ui.heading("Could not load dataset");
                ui.label(egui::RichText::new(message).color(egui::Color32::RED));
                ui.add_space(8.0);
                ui.button("OK").clicked()
            });
            if modal.inner || modal.should_close() {
                self.state.dismiss_load_error();
            }
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        if self.state.page == Page::Dashboard {
            egui::SidePanel::left("filter_panel")
                .default_width(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: overview or dashboard ----
        let page = self.state.page;
        egui::CentralPanel::default().show(ctx, |ui| match page {
            Page::Overview => overview::overview(ui, &mut self.state),
            Page::Dashboard => dashboard::dashboard(ui, &self.state),
        });
    }
}
