//! Filtering and item frequency over a loaded batch.

use crate::order::PoSource;
use crate::record::{OrderRecord, RecordBatch};
use crate::schema::Field;
use std::collections::HashMap;

/// Criteria for narrowing the orders table.
///
/// Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Case-insensitive substring of `VENDOR`.
    pub vendor: Option<String>,
    /// Case-insensitive substring of `GRANT USED`.
    pub grant: Option<String>,
    /// Exact `PO SOURCE`.
    pub po_source: Option<PoSource>,
}

impl OrderFilter {
    /// Creates a filter that matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vendor substring. Blank input clears it.
    #[must_use]
    pub fn vendor(mut self, needle: impl Into<String>) -> Self {
        self.vendor = non_blank(needle.into());
        self
    }

    /// Sets the grant substring. Blank input clears it.
    #[must_use]
    pub fn grant(mut self, needle: impl Into<String>) -> Self {
        self.grant = non_blank(needle.into());
        self
    }

    /// Sets the PO source.
    #[must_use]
    pub const fn po_source(mut self, source: PoSource) -> Self {
        self.po_source = Some(source);
        self
    }

    /// Whether a record satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, record: &OrderRecord) -> bool {
        if let Some(needle) = &self.vendor {
            if !contains_ignore_case(record, Field::Vendor, needle) {
                return false;
            }
        }
        if let Some(needle) = &self.grant {
            if !contains_ignore_case(record, Field::GrantUsed, needle) {
                return false;
            }
        }
        if let Some(source) = self.po_source {
            if record.get(Field::PoSource).as_text() != Some(source.label()) {
                return false;
            }
        }
        true
    }

    /// Returns the matching records, in order.
    #[must_use]
    pub fn apply(&self, batch: &RecordBatch) -> RecordBatch {
        batch.filtered(|r| self.matches(r))
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn contains_ignore_case(record: &OrderRecord, field: Field, needle: &str) -> bool {
    let value = record.get(field);
    if value.is_null() {
        return false;
    }
    value
        .to_string()
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

/// Returns the `limit` most frequent item names with their counts.
///
/// Sorted by descending count; ties keep first-appearance order. Records
/// without an item are not counted.
#[must_use]
pub fn top_items(batch: &RecordBatch, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (pos, record) in batch.iter().enumerate() {
        let item = record.get(Field::Item);
        if item.is_null() {
            continue;
        }
        counts.entry(item.to_string()).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(item, (count, _))| (item, count))
        .collect()
}
