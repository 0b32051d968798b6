use std::collections::BTreeMap;

use super::model::{KeyField, NumericField, Record};

/// A grouping key: the values of the grouped fields, in the order requested.
pub type GroupKey = Vec<String>;

/// How the values of one group are folded into a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    Mean,
    /// Number of rows in the group; the value field is ignored.
    Count,
}

fn group_key(record: &Record, group_by: &[KeyField]) -> GroupKey {
    group_by.iter().map(|&f| record.key(f).into_owned()).collect()
}

/// Group `rows` by the tuple of `group_by` fields and reduce `value` per group.
///
/// Works on a whole dataset (`dataset.records()`) or on a filtered subset
/// (`result.rows(&dataset)`). Only groups with at least one row appear, so
/// `Mean` is always defined. Grouping by an empty field list yields a single
/// group keyed by the empty tuple.
pub fn aggregate_by<'a, I>(
    rows: I,
    group_by: &[KeyField],
    value: NumericField,
    reducer: Reducer,
) -> BTreeMap<GroupKey, f64>
where
    I: IntoIterator<Item = &'a Record>,
{
    // (sum, count) per group
    let mut acc: BTreeMap<GroupKey, (f64, usize)> = BTreeMap::new();
    for record in rows {
        let slot = acc.entry(group_key(record, group_by)).or_insert((0.0, 0));
        slot.0 += record.value(value);
        slot.1 += 1;
    }

    acc.into_iter()
        .map(|(key, (sum, n))| {
            let v = match reducer {
                Reducer::Sum => sum,
                Reducer::Mean => sum / n as f64,
                Reducer::Count => n as f64,
            };
            (key, v)
        })
        .collect()
}

/// Group `rows` like [`aggregate_by`] but keep every value, in row order.
/// Feeds box plots, histograms and other distribution views.
pub fn collect_by<'a, I>(
    rows: I,
    group_by: &[KeyField],
    value: NumericField,
) -> BTreeMap<GroupKey, Vec<f64>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for record in rows {
        groups
            .entry(group_key(record, group_by))
            .or_default()
            .push(record.value(value));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Dataset;
    use chrono::NaiveDate;

    fn row(sector: &str, event: &str, sentiment: &str, idx: f64, vol: f64) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            headline: "h".into(),
            source: "Bloomberg".into(),
            market_event: event.into(),
            market_index: "NIFTY".into(),
            index_change_percent: idx,
            trading_volume: vol,
            sentiment: sentiment.into(),
            sector: sector.into(),
            impact_level: "Medium".into(),
            related_company: "Acme".into(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            row("IT", "Earnings", "Positive", 2.0, 100.0),
            row("IT", "PolicyUpdate", "Negative", -1.0, 50.0),
            row("Banking", "Earnings", "Positive", 5.0, 200.0),
            row("Banking", "Earnings", "Sideways", -3.0, 10.0),
        ])
    }

    fn key(parts: &[&str]) -> GroupKey {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn sum_by_sector() {
        let ds = dataset();
        let out = aggregate_by(
            ds.records(),
            &[KeyField::Sector],
            NumericField::TradingVolume,
            Reducer::Sum,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[&key(&["IT"])], 150.0);
        assert_eq!(out[&key(&["Banking"])], 210.0);
    }

    #[test]
    fn mean_by_sector() {
        let ds = dataset();
        let out = aggregate_by(
            ds.records(),
            &[KeyField::Sector],
            NumericField::IndexChangePercent,
            Reducer::Mean,
        );
        assert_eq!(out[&key(&["IT"])], 0.5);
        assert_eq!(out[&key(&["Banking"])], 1.0);
    }

    #[test]
    fn count_keeps_unseen_sentiments() {
        let ds = dataset();
        let out = aggregate_by(
            ds.records(),
            &[KeyField::Sentiment],
            NumericField::TradingVolume,
            Reducer::Count,
        );
        assert_eq!(out[&key(&["Positive"])], 2.0);
        assert_eq!(out[&key(&["Negative"])], 1.0);
        assert_eq!(out[&key(&["Sideways"])], 1.0);
        assert_eq!(out.values().sum::<f64>(), ds.len() as f64);
    }

    #[test]
    fn cross_tab_by_event_and_sector() {
        let ds = dataset();
        let out = aggregate_by(
            ds.records(),
            &[KeyField::MarketEvent, KeyField::Sector],
            NumericField::TradingVolume,
            Reducer::Count,
        );
        assert_eq!(out[&key(&["Earnings", "Banking"])], 2.0);
        assert_eq!(out[&key(&["Earnings", "IT"])], 1.0);
        assert_eq!(out[&key(&["PolicyUpdate", "IT"])], 1.0);
        assert!(!out.contains_key(&key(&["PolicyUpdate", "Banking"])));
    }

    #[test]
    fn empty_rows_give_no_groups() {
        let out = aggregate_by(
            std::iter::empty::<&Record>(),
            &[KeyField::Sector],
            NumericField::TradingVolume,
            Reducer::Mean,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn no_group_fields_is_a_grand_total() {
        let ds = dataset();
        let out = aggregate_by(ds.records(), &[], NumericField::TradingVolume, Reducer::Sum);
        assert_eq!(out[&GroupKey::new()], 360.0);
    }

    #[test]
    fn collect_keeps_row_order() {
        let ds = dataset();
        let out = collect_by(ds.records(), &[KeyField::Sector], NumericField::TradingVolume);
        assert_eq!(out[&key(&["Banking"])], vec![200.0, 10.0]);
        assert_eq!(out[&key(&["IT"])], vec![100.0, 50.0]);
    }
}
