//! Reads an uploaded grade sheet into raw records.
//!
//! The whole file is parsed before anything is returned, so a bad row means
//! an error and never a partial roster.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use serde_json::Value;
use thiserror::Error;

use crate::normalize::RawRecord;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type: {0} (expected .xlsx, .csv or .json)")]
    UnsupportedFormat(String),

    #[error("malformed spreadsheet: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("spreadsheet has no worksheets")]
    NoWorksheet,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Xlsx,
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => Ok(InputFormat::Xlsx),
            "csv" => Ok(InputFormat::Csv),
            "json" => Ok(InputFormat::Json),
            _ => Err(IngestError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

pub fn read_records(path: &Path) -> Result<Vec<RawRecord>, IngestError> {
    let format = InputFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| IngestError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let records = parse_records(&bytes, format)?;
    tracing::info!(path = %path.display(), records = records.len(), "read grade sheet");
    Ok(records)
}

pub fn parse_records(bytes: &[u8], format: InputFormat) -> Result<Vec<RawRecord>, IngestError> {
    match format {
        InputFormat::Xlsx => parse_xlsx(bytes),
        InputFormat::Csv => parse_csv(bytes),
        InputFormat::Json => Ok(serde_json::from_slice(bytes)?),
    }
}

/// First worksheet only. Row 0 gives the keys; numeric cells stay numbers.
fn parse_xlsx(bytes: &[u8]) -> Result<Vec<RawRecord>, IngestError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)??;

    let mut rows = sheet.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();
    let mut records = Vec::new();

    for row in rows {
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .filter_map(|(header, cell)| cell_value(cell).map(|value| (header.clone(), value)))
            .collect();
        if !record.is_empty() {
            records.push(record);
        }
    }

    Ok(records)
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) if text.is_empty() => None,
        Data::String(text) => Some(Value::String(text.clone())),
        Data::Int(number) => Some(Value::from(*number)),
        Data::Float(number) => serde_json::Number::from_f64(*number).map(Value::Number),
        Data::Bool(flag) => Some(Value::Bool(*flag)),
        other => Some(Value::String(other.to_string())),
    }
}

/// Header row gives the keys. Blank cells are left out of the record so they
/// read the same as a missing column.
fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        records.push(record);
    }

    Ok(records)
}
