//! Schema normalizer.
//!
//! The only sanctioned conversion from untyped rows to canonical records.
//! Missing columns become [`Value::Null`]; columns outside the schema are
//! dropped.

use crate::record::{OrderRecord, RawRow, RecordBatch, Row};
use crate::schema::Field;
use crate::value::Value;

/// Normalizes a sequence of rows into a canonical batch.
///
/// Row order is preserved. An empty input yields an empty batch that still
/// carries the canonical columns.
pub fn normalize<I>(rows: I) -> RecordBatch
where
    I: IntoIterator,
    I::Item: Into<Row>,
{
    rows.into_iter()
        .map(|row| match row.into() {
            Row::External(raw) => normalize_row(raw),
            Row::Canonical(record) => record,
        })
        .collect()
}

/// Normalizes a single untyped row.
#[must_use]
pub fn normalize_row(mut raw: RawRow) -> OrderRecord {
    let values = Field::ALL.map(|field| raw.remove(field.name()).unwrap_or(Value::Null));
    OrderRecord::from_values(values)
}

/// Normalizes an already-typed batch.
///
/// Canonical records pass through unchanged.
#[must_use]
pub fn normalize_batch(batch: RecordBatch) -> RecordBatch {
    normalize(batch.into_rows())
}
