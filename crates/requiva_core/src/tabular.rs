//! CSV encoding of record batches.
//!
//! Written tables always carry the canonical header in canonical order.
//! Reading is tolerant: any header is accepted and cells are returned as
//! untyped rows for the normalizer.
//!
//! Empty cells read back as [`Value::Null`]. Cells of numeric columns that
//! parse as numbers read back as [`Value::Number`]; everything else is text.

use crate::error::CoreResult;
use crate::record::{RawRow, RecordBatch};
use crate::schema::{column_names, Field};
use crate::value::Value;
use std::io::{Read, Write};
use time::macros::format_description;
use time::Date;

/// Writes `batch` as CSV with the canonical header.
///
/// # Errors
///
/// Returns an error if encoding or the underlying writer fails.
pub fn write_csv<W: Write>(batch: &RecordBatch, writer: W) -> CoreResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(column_names())?;
    for record in batch {
        csv.write_record(record.values().iter().map(Value::to_string))?;
    }
    csv.flush()?;
    Ok(())
}

/// Encodes `batch` as CSV bytes.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn to_csv_bytes(batch: &RecordBatch) -> CoreResult<Vec<u8>> {
    let mut out = Vec::new();
    write_csv(batch, &mut out)?;
    Ok(out)
}

/// Reads CSV rows keyed by whatever header the input carries.
///
/// An input with no header at all yields no rows.
///
/// # Errors
///
/// Returns an error if the input is not valid CSV.
pub fn read_rows<R: Read>(reader: R) -> CoreResult<Vec<RawRow>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for result in csv.records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.clone(), decode_cell(name, cell)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn decode_cell(column: &str, cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    let numeric = Field::from_name(column).is_some_and(Field::is_numeric);
    if numeric {
        if let Ok(n) = cell.trim().parse::<f64>() {
            if n.is_finite() {
                return Value::Number(n);
            }
        }
    }
    Value::text(cell)
}

/// File name for a CSV export taken on `date`.
#[must_use]
pub fn export_file_name(date: Date) -> String {
    let stamp = date
        .format(format_description!("[year][month][day]"))
        .unwrap_or_else(|_| date.to_string());
    format!("Requiva_Orders_{stamp}.csv")
}
