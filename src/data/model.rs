use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Column schema
// ---------------------------------------------------------------------------

/// Canonical column names, in the order the sample generator writes them.
///
/// Matching is case-sensitive: `Sector` is not `sector`.
pub const COLUMNS: [&str; 11] = [
    "date",
    "headline",
    "source",
    "market_event",
    "market_index",
    "index_change_percent",
    "trading_volume",
    "sentiment",
    "sector",
    "impact_level",
    "related_company",
];

/// Sentiment labels seen in practice. Other labels are still accepted.
pub const KNOWN_SENTIMENTS: [&str; 3] = ["Positive", "Negative", "Neutral"];

/// Impact levels seen in practice. Other labels are still accepted.
pub const KNOWN_IMPACT_LEVELS: [&str; 3] = ["Low", "Medium", "High"];

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// One financial news event and its measured market impact.
///
/// Categorical attributes are open strings: unseen sentiment or impact labels
/// load fine and simply form their own groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub date: NaiveDate,
    pub headline: String,
    pub source: String,
    pub market_event: String,
    pub market_index: String,
    pub index_change_percent: f64,
    pub trading_volume: f64,
    pub sentiment: String,
    pub sector: String,
    pub impact_level: String,
    pub related_company: String,
}

impl Record {
    /// The textual value of a key field. Dates render as ISO `YYYY-MM-DD`,
    /// which also sorts chronologically.
    pub fn key(&self, field: KeyField) -> Cow<'_, str> {
        match field {
            KeyField::Date => Cow::Owned(self.date.format("%Y-%m-%d").to_string()),
            KeyField::Headline => Cow::Borrowed(&self.headline),
            KeyField::Source => Cow::Borrowed(&self.source),
            KeyField::MarketEvent => Cow::Borrowed(&self.market_event),
            KeyField::MarketIndex => Cow::Borrowed(&self.market_index),
            KeyField::Sentiment => Cow::Borrowed(&self.sentiment),
            KeyField::Sector => Cow::Borrowed(&self.sector),
            KeyField::ImpactLevel => Cow::Borrowed(&self.impact_level),
            KeyField::RelatedCompany => Cow::Borrowed(&self.related_company),
        }
    }

    /// The value of a numeric field.
    pub fn value(&self, field: NumericField) -> f64 {
        match field {
            NumericField::IndexChangePercent => self.index_change_percent,
            NumericField::TradingVolume => self.trading_volume,
        }
    }
}

// ---------------------------------------------------------------------------
// Field selectors
// ---------------------------------------------------------------------------

/// Fields that can be listed as distinct values or used as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyField {
    Date,
    Headline,
    Source,
    MarketEvent,
    MarketIndex,
    Sentiment,
    Sector,
    ImpactLevel,
    RelatedCompany,
}

impl KeyField {
    pub fn column(self) -> &'static str {
        match self {
            KeyField::Date => "date",
            KeyField::Headline => "headline",
            KeyField::Source => "source",
            KeyField::MarketEvent => "market_event",
            KeyField::MarketIndex => "market_index",
            KeyField::Sentiment => "sentiment",
            KeyField::Sector => "sector",
            KeyField::ImpactLevel => "impact_level",
            KeyField::RelatedCompany => "related_company",
        }
    }
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Fields holding floating-point measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericField {
    IndexChangePercent,
    TradingVolume,
}

impl NumericField {
    pub fn column(self) -> &'static str {
        match self {
            NumericField::IndexChangePercent => "index_change_percent",
            NumericField::TradingVolume => "trading_volume",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full, immutable set of records loaded for a session.
///
/// Wrap it in an `Arc` to share between views; nothing mutates it after load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    /// All records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            headline: "Rates held steady".into(),
            source: "Reuters".into(),
            market_event: "Interest Rate Change".into(),
            market_index: "NASDAQ".into(),
            index_change_percent: -1.25,
            trading_volume: 42.0,
            sentiment: "Neutral".into(),
            sector: "Banking".into(),
            impact_level: "High".into(),
            related_company: "JPMorgan Chase".into(),
        }
    }

    #[test]
    fn serialized_csv_uses_canonical_header() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(record()).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
        assert!(out.contains("2025-03-07,Rates held steady,"));
    }

    #[test]
    fn date_key_is_iso() {
        assert_eq!(record().key(KeyField::Date), "2025-03-07");
    }

    #[test]
    fn key_and_value_read_the_named_field() {
        let r = record();
        assert_eq!(r.key(KeyField::MarketEvent), "Interest Rate Change");
        assert_eq!(r.key(KeyField::RelatedCompany), "JPMorgan Chase");
        assert_eq!(r.value(NumericField::IndexChangePercent), -1.25);
        assert_eq!(r.value(NumericField::TradingVolume), 42.0);
    }

    #[test]
    fn field_columns_are_part_of_the_schema() {
        for f in [KeyField::Date, KeyField::Sector, KeyField::ImpactLevel] {
            assert!(COLUMNS.contains(&f.column()));
        }
        for f in [NumericField::IndexChangePercent, NumericField::TradingVolume] {
            assert!(COLUMNS.contains(&f.column()));
        }
    }
}
