use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }
    // Clone the option lists so we can mutate state inside the loops.
    let Some(defaults) = state.defaults.clone() else {
        ui.label("The dataset has no rows; filters are disabled.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
            ui.add_space(4.0);

            // ---- Sector checklist ----
            match checklist(
                ui,
                "Select Sector",
                &defaults.sectors,
                &mut state.selection.sectors,
            ) {
                Some(Shortcut::All) => state.select_all_sectors(),
                Some(Shortcut::None) => state.select_no_sectors(),
                None => {}
            }

            // ---- Market event checklist ----
            match checklist(
                ui,
                "Select Market Event",
                &defaults.market_events,
                &mut state.selection.market_events,
            ) {
                Some(Shortcut::All) => state.select_all_events(),
                Some(Shortcut::None) => state.select_no_events(),
                None => {}
            }

            // ---- Index change range ----
            ui.separator();
            ui.strong("Index Change Percent Range");
            let bounds = defaults.index_change_range;
            let range = &mut state.selection.index_change_range;
            ui.add(egui::Slider::new(&mut range.min, bounds.min..=bounds.max).text("min"));
            ui.add(egui::Slider::new(&mut range.max, bounds.min..=bounds.max).text("max"));
            if range.min > range.max {
                range.max = range.min;
            }
        });

    // Recompute the filtered rows after any widget changes.
    state.refilter();
}

/// All / None buttons of a checklist.
enum Shortcut {
    All,
    None,
}

/// Collapsible checkbox list. Individual toggles edit `selected` directly;
/// the All / None shortcuts are returned for the caller to apply.
fn checklist(
    ui: &mut Ui,
    title: &str,
    options: &BTreeSet<String>,
    selected: &mut BTreeSet<String>,
) -> Option<Shortcut> {
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let shortcut = ui
                .horizontal(|ui: &mut Ui| {
                    let all = ui.small_button("All").clicked();
                    let none = ui.small_button("None").clicked();
                    match (all, none) {
                        (true, _) => Some(Shortcut::All),
                        (_, true) => Some(Shortcut::None),
                        _ => None,
                    }
                })
                .inner;

            for value in options {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                }
            }
            shortcut
        })
        .body_returned
        .flatten()
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                // A failure lands in `load_error` and is shown by the app.
                let _ = state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.selectable_value(&mut state.page, Page::Overview, "Overview");
        ui.selectable_value(&mut state.page, Page::Dashboard, "Dashboard");
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} matching",
                ds.len(),
                state.result.count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open market news dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if state.open(&path).is_ok() {
            state.page = Page::Dashboard;
        }
    }
}
