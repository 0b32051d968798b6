use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate};
use market_news_dashboard::data::model::{Record, COLUMNS, KNOWN_IMPACT_LEVELS, KNOWN_SENTIMENTS};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const SOURCES: [&str; 6] = ["Bloomberg", "Reuters", "CNBC", "Financial Times", "Economic Times", "Moneycontrol"];
const EVENTS: [&str; 6] = [
    "Interest Rate Change",
    "Earnings Report",
    "Policy Update",
    "Merger & Acquisition",
    "Inflation Data",
    "Trade Tariffs",
];
const INDICES: [&str; 5] = ["NIFTY", "SENSEX", "NASDAQ", "S&P 500", "Dow Jones"];
const SECTORS: [&str; 6] = ["IT", "Banking", "Retail", "Energy", "Pharma", "Automobile"];
const COMPANIES: [&str; 10] = [
    "Infosys", "TCS", "HDFC Bank", "Reliance", "Apple", "Microsoft", "JPMorgan Chase", "Tesla",
    "Sun Pharma", "Walmart",
];

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Record> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid start date");

    (0..rows)
        .map(|i| {
            let [positive, negative, neutral] = KNOWN_SENTIMENTS;
            let (sentiment, drift) = match rng.next_f64() {
                p if p < 0.4 => (positive, 0.8),
                p if p < 0.75 => (negative, -0.8),
                _ => (neutral, 0.0),
            };
            let event = rng.pick(&EVENTS);
            let sector = rng.pick(&SECTORS);
            let index_change = (rng.gauss(drift, 1.2) * 100.0).round() / 100.0;
            let volume = (rng.gauss(13.0, 0.6).exp()).round();

            Record {
                date: start + Duration::days((i / 12) as i64),
                headline: format!("{sector} stocks react to {}", event.to_lowercase()),
                source: rng.pick(&SOURCES).to_string(),
                market_event: event.to_string(),
                market_index: rng.pick(&INDICES).to_string(),
                index_change_percent: index_change,
                trading_volume: volume,
                sentiment: sentiment.to_string(),
                sector: sector.to_string(),
                impact_level: rng.pick(&KNOWN_IMPACT_LEVELS).to_string(),
                related_company: rng.pick(&COMPANIES).to_string(),
            }
        })
        .collect()
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, records: &[Record]) -> Result<()> {
    let text = |f: fn(&Record) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };
    // Date32 counts days since 1970-01-01
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch").num_days_from_ce();
    let dates: ArrayRef = Arc::new(Date32Array::from(
        records
            .iter()
            .map(|r| r.date.num_days_from_ce() - epoch)
            .collect::<Vec<_>>(),
    ));
    let number = |f: fn(&Record) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let fields = COLUMNS
        .iter()
        .map(|&name| {
            let ty = match name {
                "date" => DataType::Date32,
                "index_change_percent" | "trading_volume" => DataType::Float64,
                _ => DataType::Utf8,
            };
            Field::new(name, ty, false)
        })
        .collect::<Vec<_>>();
    let schema = Arc::new(Schema::new(fields));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            dates,
            text(|r| &r.headline),
            text(|r| &r.source),
            text(|r| &r.market_event),
            text(|r| &r.market_index),
            number(|r| r.index_change_percent),
            number(|r| r.trading_volume),
            text(|r| &r.sentiment),
            text(|r| &r.sector),
            text(|r| &r.impact_level),
            text(|r| &r.related_company),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Usage: `generate_sample [OUTPUT_DIR] [ROWS]`
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let rows: usize = match args.next() {
        Some(n) => n.parse::<usize>().with_context(|| format!("ROWS must be a count, got '{n}'"))?,
        None => 3024,
    };

    let mut rng = SimpleRng::new(42);
    let records = generate(rows, &mut rng);

    let csv_path = out_dir.join("sample_finance.csv");
    let parquet_path = out_dir.join("sample_finance.parquet");
    write_csv(&csv_path, &records)?;
    write_parquet(&parquet_path, &records)?;

    log::info!("Generated {} records", records.len());
    println!(
        "Wrote {} records to {} and {}",
        records.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
