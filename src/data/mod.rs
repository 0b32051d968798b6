//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + validate file → Dataset   (cache: load once per path)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  immutable Vec<Record>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSelection → FilteredResult (indices + KPIs)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  group by 1..n key fields → sum / mean / count / values
//!   └───────────┘
//! ```
//!
//! Everything here is a pure function of its arguments; the UI re-runs it
//! whenever the selection changes.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;

pub use aggregate::{aggregate_by, collect_by, GroupKey, Reducer};
pub use cache::DatasetCache;
pub use error::{EmptyDatasetError, LoadError};
pub use filter::{apply, distinct_values, numeric_bounds, ClosedRange, FilterSelection, FilteredResult};
pub use model::{Dataset, KeyField, NumericField, Record};
