//! Display settings for the desktop shell.
//!
//! The data layer takes no configuration; these values only shape how the
//! dashboard renders.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional JSON settings file.
pub const CONFIG_ENV: &str = "DASHBOARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Bars in the index-change histogram.
    pub histogram_bins: usize,
    /// Decimal places for the KPI cards.
    pub kpi_decimals: usize,
    /// Rows shown in the data table before truncating.
    pub table_row_limit: usize,
    /// Height of each chart in points.
    pub chart_height: f32,
    /// Initial window size `[width, height]`.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 10,
            kpi_decimals: 2,
            table_row_limit: 500,
            chart_height: 260.0,
            window_size: [1400.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Read settings from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Settings from `$DASHBOARD_CONFIG`, or defaults when unset or unusable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(cfg) => {
                log::info!("Using dashboard config {}", Path::new(&path).display());
                cfg
            }
            Err(e) => {
                log::warn!("Ignoring dashboard config: {e:#}");
                Self::default()
            }
        }
    }
}
