use std::collections::BTreeSet;

use super::error::EmptyDatasetError;
use super::model::{Dataset, KeyField, NumericField, Record};

// ---------------------------------------------------------------------------
// Column queries used to build selector options and defaults
// ---------------------------------------------------------------------------

/// Sorted distinct values of a key field.
pub fn distinct_values(
    dataset: &Dataset,
    field: KeyField,
) -> Result<BTreeSet<String>, EmptyDatasetError> {
    if dataset.is_empty() {
        return Err(EmptyDatasetError);
    }
    Ok(dataset
        .records()
        .iter()
        .map(|r| r.key(field).into_owned())
        .collect())
}

/// Observed `(min, max)` of a numeric field.
pub fn numeric_bounds(
    dataset: &Dataset,
    field: NumericField,
) -> Result<(f64, f64), EmptyDatasetError> {
    let mut values = dataset.records().iter().map(|r| r.value(field));
    let first = values.next().ok_or(EmptyDatasetError)?;
    Ok(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Closed interval `[min, max]`. An inverted interval contains nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedRange {
    pub min: f64,
    pub max: f64,
}

impl ClosedRange {
    pub fn new(min: f64, max: f64) -> Self {
        ClosedRange { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The inclusion criteria chosen by the user.
///
/// An empty `sectors` or `market_events` set selects nothing; it is not a
/// wildcard.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub sectors: BTreeSet<String>,
    pub market_events: BTreeSet<String>,
    pub index_change_range: ClosedRange,
}

impl FilterSelection {
    /// Every sector, every event and the observed index-change bounds.
    pub fn full(dataset: &Dataset) -> Result<Self, EmptyDatasetError> {
        let (min, max) = numeric_bounds(dataset, NumericField::IndexChangePercent)?;
        Ok(FilterSelection {
            sectors: distinct_values(dataset, KeyField::Sector)?,
            market_events: distinct_values(dataset, KeyField::MarketEvent)?,
            index_change_range: ClosedRange::new(min, max),
        })
    }

    /// Selects nothing. Used when there is no data to derive defaults from.
    pub fn none() -> Self {
        FilterSelection {
            sectors: BTreeSet::new(),
            market_events: BTreeSet::new(),
            index_change_range: ClosedRange::new(0.0, 0.0),
        }
    }

    /// Whether `record` passes all three clauses.
    pub fn matches(&self, record: &Record) -> bool {
        self.sectors.contains(&record.sector)
            && self.market_events.contains(&record.market_event)
            && self.index_change_range.contains(record.index_change_percent)
    }
}

// ---------------------------------------------------------------------------
// Filtered subset + KPIs
// ---------------------------------------------------------------------------

/// Rows passing a [`FilterSelection`] and the summary values shown as KPIs.
///
/// Rows are kept as indices into the dataset they were computed from, in
/// dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredResult {
    pub indices: Vec<usize>,
    pub count: usize,
    /// Mean index change, `None` when no row matched.
    pub avg_index_change: Option<f64>,
    /// Sum of trading volume, `0.0` when no row matched.
    pub total_trading_volume: f64,
}

impl FilteredResult {
    /// The matching records. `dataset` must be the one passed to [`apply`].
    pub fn rows<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a Record> + 'a {
        self.indices.iter().map(move |&i| &dataset.records()[i])
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Filter `dataset` by `selection` and summarise the result.
pub fn apply(dataset: &Dataset, selection: &FilterSelection) -> FilteredResult {
    let mut indices = Vec::new();
    let mut index_sum = 0.0;
    let mut total_trading_volume = 0.0;

    for (i, record) in dataset.records().iter().enumerate() {
        if selection.matches(record) {
            indices.push(i);
            index_sum += record.index_change_percent;
            total_trading_volume += record.trading_volume;
        }
    }

    let count = indices.len();
    let avg_index_change = (count > 0).then(|| index_sum / count as f64);

    FilteredResult {
        indices,
        count,
        avg_index_change,
        total_trading_volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(sector: &str, event: &str, idx: f64, vol: f64) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            headline: format!("{sector} {event}"),
            source: "Reuters".into(),
            market_event: event.into(),
            market_index: "NASDAQ".into(),
            index_change_percent: idx,
            trading_volume: vol,
            sentiment: "Neutral".into(),
            sector: sector.into(),
            impact_level: "Low".into(),
            related_company: "Acme".into(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            row("IT", "Earnings", 2.0, 100.0),
            row("IT", "PolicyUpdate", -1.0, 50.0),
            row("Banking", "Earnings", 5.0, 200.0),
            row("Banking", "Earnings", -3.0, 10.0),
        ])
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn narrow_selection_keeps_one_row() {
        let ds = dataset();
        let sel = FilterSelection {
            sectors: set(&["IT"]),
            market_events: set(&["Earnings"]),
            index_change_range: ClosedRange::new(0.0, 10.0),
        };
        let res = apply(&ds, &sel);
        assert_eq!(res.indices, vec![0]);
        assert_eq!(res.count, 1);
        assert_eq!(res.avg_index_change, Some(2.0));
        assert_eq!(res.total_trading_volume, 100.0);
    }

    #[test]
    fn wide_selection_keeps_everything() {
        let ds = dataset();
        let sel = FilterSelection {
            index_change_range: ClosedRange::new(-10.0, 10.0),
            ..FilterSelection::full(&ds).unwrap()
        };
        let res = apply(&ds, &sel);
        assert_eq!(res.count, 4);
        assert_eq!(res.total_trading_volume, 360.0);
        assert_eq!(res.avg_index_change, Some(0.75));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = dataset();
        let sel = FilterSelection {
            index_change_range: ClosedRange::new(-1.0, 2.0),
            ..FilterSelection::full(&ds).unwrap()
        };
        assert_eq!(apply(&ds, &sel).indices, vec![0, 1]);
    }

    #[test]
    fn empty_sector_set_selects_nothing() {
        let ds = dataset();
        let sel = FilterSelection {
            sectors: BTreeSet::new(),
            ..FilterSelection::full(&ds).unwrap()
        };
        let res = apply(&ds, &sel);
        assert!(res.is_empty());
        assert_eq!(res.avg_index_change, None);
        assert_eq!(res.total_trading_volume, 0.0);
    }

    #[test]
    fn inverted_range_selects_nothing() {
        let ds = dataset();
        let sel = FilterSelection {
            index_change_range: ClosedRange::new(3.0, -3.0),
            ..FilterSelection::full(&ds).unwrap()
        };
        assert_eq!(apply(&ds, &sel).count, 0);
    }

    #[test]
    fn unknown_categories_just_match_nothing() {
        let ds = dataset();
        let sel = FilterSelection {
            sectors: set(&["Energy"]),
            ..FilterSelection::full(&ds).unwrap()
        };
        assert_eq!(apply(&ds, &sel).count, 0);
    }

    #[test]
    fn full_selection_defaults() {
        let ds = dataset();
        let sel = FilterSelection::full(&ds).unwrap();
        assert_eq!(sel.sectors, set(&["Banking", "IT"]));
        assert_eq!(sel.market_events, set(&["Earnings", "PolicyUpdate"]));
        assert_eq!(sel.index_change_range, ClosedRange::new(-3.0, 5.0));
    }

    #[test]
    fn bounds_and_distinct_fail_on_empty_dataset() {
        let ds = Dataset::default();
        assert_eq!(
            numeric_bounds(&ds, NumericField::TradingVolume),
            Err(EmptyDatasetError)
        );
        assert_eq!(distinct_values(&ds, KeyField::Sector), Err(EmptyDatasetError));
        assert_eq!(FilterSelection::full(&ds), Err(EmptyDatasetError));
    }

    #[test]
    fn apply_on_empty_dataset_is_total() {
        let res = apply(&Dataset::default(), &FilterSelection::none());
        assert_eq!(res, FilteredResult::default());
    }

    #[test]
    fn rows_follow_indices() {
        let ds = dataset();
        let sel = FilterSelection {
            sectors: set(&["Banking"]),
            ..FilterSelection::full(&ds).unwrap()
        };
        let res = apply(&ds, &sel);
        let vols: Vec<f64> = res.rows(&ds).map(|r| r.trading_volume).collect();
        assert_eq!(vols, vec![200.0, 10.0]);
    }
}
