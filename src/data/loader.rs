use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{Dataset, Record, COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an event dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the canonical column names (recommended)
/// * `.json`    – `[{ "date": "...", "headline": "...", ... }, ...]`
/// * `.parquet` – flat columns named like the CSV header
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(open(path)?),
        "json" => load_json(open(path)?),
        "parquet" | "pq" => load_parquet(open(path)?),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }?;

    log::info!(
        "Loaded {} records ({} columns) from {}",
        dataset.len(),
        COLUMNS.len(),
        path.display()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Schema check
// ---------------------------------------------------------------------------

/// Map every canonical column to its position among `headers`.
///
/// Names are compared exactly (after trimming surrounding whitespace). A name
/// that only differs in case is reported separately so the user can fix the
/// header instead of guessing.
fn resolve_columns<'a>(
    headers: impl IntoIterator<Item = &'a str>,
) -> Result<[usize; 11], LoadError> {
    let mut positions: [Option<usize>; 11] = [None; 11];

    for (idx, name) in headers.into_iter().enumerate() {
        let name = name.trim();
        match COLUMNS.iter().position(|c| *c == name) {
            Some(col) => {
                if positions[col].replace(idx).is_some() {
                    return Err(LoadError::DuplicateColumn(name.to_string()));
                }
            }
            None => {
                return Err(match COLUMNS.iter().find(|c| c.eq_ignore_ascii_case(name)) {
                    Some(expected) => LoadError::MisCasedColumn {
                        found: name.to_string(),
                        expected,
                    },
                    None => LoadError::UnknownColumn(name.to_string()),
                });
            }
        }
    }

    let mut resolved = [0usize; 11];
    for (col, pos) in positions.iter().enumerate() {
        resolved[col] = pos.ok_or(LoadError::MissingColumn(COLUMNS[col]))?;
    }
    Ok(resolved)
}

// ---------------------------------------------------------------------------
// Cell parsing (shared by every format)
// ---------------------------------------------------------------------------

/// Accepted date layouts. A trailing time-of-day is dropped before parsing.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%m/%d/%Y"];

/// Build a record from cells given in canonical column order.
/// `row` is the 1-based data row used in error messages.
fn build_record(row: usize, cells: [&str; 11]) -> Result<Record, LoadError> {
    Ok(Record {
        date: parse_date(row, text(row, 0, cells[0])?)?,
        headline: text(row, 1, cells[1])?.to_string(),
        source: text(row, 2, cells[2])?.to_string(),
        market_event: text(row, 3, cells[3])?.to_string(),
        market_index: text(row, 4, cells[4])?.to_string(),
        index_change_percent: number(row, 5, cells[5])?,
        trading_volume: number(row, 6, cells[6])?,
        sentiment: text(row, 7, cells[7])?.to_string(),
        sector: text(row, 8, cells[8])?.to_string(),
        impact_level: text(row, 9, cells[9])?.to_string(),
        related_company: text(row, 10, cells[10])?.to_string(),
    })
}

fn text(row: usize, col: usize, cell: &str) -> Result<&str, LoadError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Err(LoadError::MissingValue {
            row,
            column: COLUMNS[col],
        });
    }
    Ok(cell)
}

fn number(row: usize, col: usize, cell: &str) -> Result<f64, LoadError> {
    let cell = text(row, col, cell)?;
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LoadError::InvalidNumber {
            row,
            column: COLUMNS[col],
            value: cell.to_string(),
        }),
    }
}

fn parse_date(row: usize, cell: &str) -> Result<NaiveDate, LoadError> {
    let day = cell
        .split_once(|c: char| c == ' ' || c == 'T')
        .map_or(cell, |(day, _time)| day);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
        .ok_or_else(|| LoadError::InvalidDate {
            row,
            value: cell.to_string(),
        })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV text with a header row. Columns may come in any order.
pub fn load_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let positions = resolve_columns(headers.iter())?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let cells = std::array::from_fn(|col| row.get(positions[col]).unwrap_or(""));
        records.push(build_record(i + 1, cells)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "date": "2025-01-02", "headline": "...", "index_change_percent": 1.2, ... },
///   ...
/// ]
/// ```
///
/// Numbers may be JSON numbers or numeric strings.
pub fn load_json<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    let items = match root {
        JsonValue::Array(items) => items,
        other => {
            return Err(LoadError::ColumnType {
                column: "<root>",
                found: json_kind(&other).to_string(),
                expected: "array of objects",
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let row = i + 1;
        let obj = item.as_object().ok_or_else(|| LoadError::ColumnType {
            column: "<row>",
            found: json_kind(item).to_string(),
            expected: "object",
        })?;
        resolve_columns(obj.keys().map(String::as_str))?;

        let owned: [String; 11] = std::array::from_fn(|col| json_cell(obj.get(COLUMNS[col])));
        let cells = std::array::from_fn(|col| owned[col].as_str());
        records.push(build_record(row, cells)?);
    }

    Ok(Dataset::from_records(records))
}

fn json_cell(val: Option<&JsonValue>) -> String {
    match val {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose flat columns follow the CSV header.
///
/// Expected types:
/// - text columns: Utf8 or LargeUtf8
/// - `index_change_percent`, `trading_volume`: Float64, Float32, Int64 or Int32
/// - `date`: Date32 or a text column
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
pub fn load_parquet(file: File) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    // Checked against the file schema so zero-row files are validated too.
    let positions = resolve_columns(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        let columns: Vec<Vec<Option<String>>> = positions
            .iter()
            .enumerate()
            .map(|(col, &idx)| cell_strings(batch.column(idx), col))
            .collect::<Result<_, _>>()?;

        for r in 0..batch.num_rows() {
            let row = records.len() + 1;
            let cells = std::array::from_fn(|col| columns[col][r].as_deref().unwrap_or(""));
            records.push(build_record(row, cells)?);
        }
    }

    Ok(Dataset::from_records(records))
}

/// Days between 0001-01-01 (day 1 of the common era) and 1970-01-01.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Render one Arrow column as optional cell text so every format shares
/// [`build_record`]. Nulls become `None` and are rejected there.
fn cell_strings(array: &ArrayRef, col: usize) -> Result<Vec<Option<String>>, LoadError> {
    let column = COLUMNS[col];
    let numeric = matches!(column, "index_change_percent" | "trading_volume");

    let cells: Vec<Option<String>> = match array.data_type() {
        DataType::Utf8 => array
            .as_string::<i32>()
            .iter()
            .map(|v| v.map(str::to_string))
            .collect(),
        DataType::LargeUtf8 => array
            .as_string::<i64>()
            .iter()
            .map(|v| v.map(str::to_string))
            .collect(),
        DataType::Float64 if numeric => array
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.map(|v| v.to_string()))
            .collect(),
        DataType::Float32 if numeric => array
            .as_primitive::<Float32Type>()
            .iter()
            .map(|v| v.map(|v| v.to_string()))
            .collect(),
        DataType::Int64 if numeric => array
            .as_primitive::<Int64Type>()
            .iter()
            .map(|v| v.map(|v| v.to_string()))
            .collect(),
        DataType::Int32 if numeric => array
            .as_primitive::<Int32Type>()
            .iter()
            .map(|v| v.map(|v| v.to_string()))
            .collect(),
        DataType::Date32 if column == "date" => array
            .as_primitive::<Date32Type>()
            .iter()
            .map(|v| {
                v.and_then(|days| days.checked_add(UNIX_EPOCH_FROM_CE))
                    .and_then(NaiveDate::from_num_days_from_ce_opt)
                    .map(|d| d.format("%Y-%m-%d").to_string())
            })
            .collect(),
        other => {
            return Err(LoadError::ColumnType {
                column,
                found: format!("{other:?}"),
                expected: if numeric {
                    "a numeric type"
                } else if column == "date" {
                    "Date32 or Utf8"
                } else {
                    "Utf8"
                },
            })
        }
    };
    Ok(cells)
}
