use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{apply, distinct_values, FilterSelection, FilteredResult};
use crate::data::model::{Dataset, KeyField};
use crate::data::{DatasetCache, LoadError};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Overview,
    Dashboard,
}

/// Per-column colour maps, rebuilt on every dataset load.
#[derive(Debug, Clone)]
pub struct Palettes {
    pub sentiment: ColorMap,
    pub market_index: ColorMap,
    pub sector: ColorMap,
}

impl Palettes {
    fn for_dataset(dataset: &Dataset) -> Option<Self> {
        Some(Palettes {
            sentiment: ColorMap::for_sentiment(&distinct_values(dataset, KeyField::Sentiment).ok()?),
            market_index: ColorMap::new(&distinct_values(dataset, KeyField::MarketIndex).ok()?),
            sector: ColorMap::new(&distinct_values(dataset, KeyField::Sector).ok()?),
        })
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    pub page: Page,

    /// Loaded datasets keyed by path.
    pub cache: DatasetCache,

    /// Path of the current dataset, used by File → Reload.
    pub source: Option<PathBuf>,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Arc<Dataset>>,

    /// Full-extent selection: the option lists and slider bounds.
    /// `None` when the dataset has no rows, which disables the filters.
    pub defaults: Option<FilterSelection>,

    /// Current filter selection.
    pub selection: FilterSelection,

    /// Rows passing `selection`.
    pub result: FilteredResult,

    /// Selection `result` was computed for.
    computed_for: Option<FilterSelection>,

    pub palettes: Option<Palettes>,

    /// Non-blocking notice shown in the menu bar.
    pub status_message: Option<String>,

    /// Last load failure. Blocks the UI until dismissed.
    pub load_error: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            page: Page::default(),
            cache: DatasetCache::new(),
            source: None,
            dataset: None,
            defaults: None,
            selection: FilterSelection::none(),
            result: FilteredResult::default(),
            computed_for: None,
            palettes: None,
            status_message: None,
            load_error: None,
        }
    }

    /// Load `path` (through the cache) and make it the current dataset.
    ///
    /// On failure the previous dataset stays in place and the error is kept
    /// in `load_error` for the blocking dialog.
    pub fn open(&mut self, path: &Path) -> Result<(), LoadError> {
        match self.cache.get_or_load(path) {
            Ok(dataset) => {
                self.source = Some(path.to_path_buf());
                self.load_error = None;
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.load_error = Some(format!("Error loading {}: {e}", path.display()));
                Err(e)
            }
        }
    }

    /// Re-open the current source; unchanged files come from the cache.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        match self.source.clone() {
            Some(path) => self.open(&path),
            None => Ok(()),
        }
    }

    pub fn dismiss_load_error(&mut self) {
        self.load_error = None;
    }

    /// Ingest a newly loaded dataset and reset filters to its full extent.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        match FilterSelection::full(&dataset) {
            Ok(full) => {
                self.selection = full.clone();
                self.defaults = Some(full);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Loaded dataset is empty: {e}");
                self.selection = FilterSelection::none();
                self.defaults = None;
                self.status_message = Some("The dataset has no rows.".to_string());
            }
        }
        self.palettes = Palettes::for_dataset(&dataset);
        self.dataset = Some(dataset);
        self.computed_for = None;
        self.refilter();
    }

    /// Recompute `result` if the selection changed since the last call.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        if self.computed_for.as_ref() == Some(&self.selection) {
            return;
        }
        self.result = apply(ds, &self.selection);
        self.computed_for = Some(self.selection.clone());
        log::debug!("Filter matched {} of {} rows", self.result.count, ds.len());
    }

    /// Restore the full-extent selection.
    pub fn reset_filters(&mut self) {
        if let Some(full) = &self.defaults {
            self.selection = full.clone();
            self.refilter();
        }
    }

    pub fn select_all_sectors(&mut self) {
        if let Some(full) = &self.defaults {
            self.selection.sectors = full.sectors.clone();
            self.refilter();
        }
    }

    pub fn select_no_sectors(&mut self) {
        self.selection.sectors.clear();
        self.refilter();
    }

    pub fn select_all_events(&mut self) {
        if let Some(full) = &self.defaults {
            self.selection.market_events = full.market_events.clone();
            self.refilter();
        }
    }

    pub fn select_no_events(&mut self) {
        self.selection.market_events.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use chrono::NaiveDate;

    fn dataset() -> Arc<Dataset> {
        let row = |sector: &str, event: &str, idx: f64| Record {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            headline: "h".into(),
            source: "Reuters".into(),
            market_event: event.into(),
            market_index: "NASDAQ".into(),
            index_change_percent: idx,
            trading_volume: 1.0,
            sentiment: "Positive".into(),
            sector: sector.into(),
            impact_level: "Low".into(),
            related_company: "Acme".into(),
        };
        Arc::new(Dataset::from_records(vec![
            row("IT", "Earnings", 1.0),
            row("Banking", "Policy Update", -2.0),
        ]))
    }

    #[test]
    fn new_dataset_shows_everything() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(dataset());
        assert_eq!(state.result.count, 2);
        assert!(state.defaults.is_some());
        assert!(state.palettes.is_some());
    }

    #[test]
    fn clearing_sectors_hides_all_rows_and_select_all_restores() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(dataset());

        state.select_no_sectors();
        assert_eq!(state.result.count, 0);

        state.select_all_sectors();
        assert_eq!(state.result.count, 2);
    }

    #[test]
    fn range_edit_then_refilter() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(dataset());

        state.selection.index_change_range.min = 0.0;
        state.refilter();
        assert_eq!(state.result.indices, vec![0]);

        state.reset_filters();
        assert_eq!(state.result.count, 2);
    }

    #[test]
    fn empty_dataset_disables_filters() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(Arc::new(Dataset::default()));
        assert!(state.defaults.is_none());
        assert!(state.palettes.is_none());
        assert_eq!(state.result.count, 0);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn clearing_events_hides_all_rows_and_select_all_restores() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(dataset());

        state.select_no_events();
        assert!(state.selection.market_events.is_empty());
        assert_eq!(state.result.count, 0);

        state.select_all_events();
        assert_eq!(state.selection.market_events.len(), 2);
        assert_eq!(state.result.count, 2);
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(dataset());
        let err = state.open(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(state.dataset.is_some());
        assert!(state.load_error.as_deref().unwrap().starts_with("Error"));

        state.dismiss_load_error();
        assert!(state.load_error.is_none());
    }

    #[test]
    fn failed_startup_load_leaves_nothing_to_show() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        std::fs::write(&path, "Date,Headline\n2025-01-01,h\n").unwrap();

        let mut state = AppState::new(DashboardConfig::default());
        assert!(matches!(state.open(&path), Err(LoadError::MisCasedColumn { .. })));
        assert!(state.dataset.is_none());
        assert!(state.source.is_none());
        assert!(state.load_error.is_some());
    }

    #[test]
    fn successful_open_clears_a_previous_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        std::fs::write(
            &path,
            "date,headline,source,market_event,market_index,index_change_percent,trading_volume,sentiment,sector,impact_level,related_company\n\
             2025-01-01,h,Reuters,Earnings,NASDAQ,0.5,10,Positive,IT,Low,Acme\n",
        )
        .unwrap();

        let mut state = AppState::new(DashboardConfig::default());
        assert!(state.open(&dir.path().join("missing.csv")).is_err());
        state.open(&path).unwrap();
        assert!(state.load_error.is_none());
        assert_eq!(state.source.as_deref(), Some(path.as_path()));
        assert_eq!(state.result.count, 1);
    }
}
