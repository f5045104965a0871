//! `REQ#` generation.
//!
//! Identifiers look like `REQ-2025-0007`: a per-year sequence, zero-padded
//! to four digits and widening past `9999`.
//!
//! Generation reads the batch it is given and takes no lock. Two callers
//! working from the same batch produce the same identifier; the store does
//! not serialize generation with the following save.

use crate::record::RecordBatch;
use crate::schema::Field;
use time::OffsetDateTime;

/// Returns the current calendar year, local time when the offset is known.
#[must_use]
pub fn current_year() -> i32 {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .year()
}

/// Returns the `REQ-<year>-` prefix.
#[must_use]
pub fn id_prefix(year: i32) -> String {
    format!("REQ-{year}-")
}

/// Generates the next identifier for the current year.
#[must_use]
pub fn generate_id(existing: &RecordBatch) -> String {
    generate_id_for_year(existing, current_year())
}

/// Generates the next identifier for `year`.
///
/// Only values starting with the year's prefix whose last `-` segment is all
/// ASCII digits count toward the sequence; everything else is ignored.
#[must_use]
pub fn generate_id_for_year(existing: &RecordBatch, year: i32) -> String {
    let prefix = id_prefix(year);
    let next = existing
        .iter()
        .filter_map(|record| {
            let value = record.get(Field::ReqId);
            if value.is_null() {
                return None;
            }
            sequence_number(&value.to_string(), &prefix)
        })
        .max()
        .map_or(1, |max| max.saturating_add(1));

    format!("{prefix}{next:04}")
}

fn sequence_number(id: &str, prefix: &str) -> Option<u64> {
    if !id.starts_with(prefix) {
        return None;
    }
    let suffix = id.rsplit('-').next()?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}
