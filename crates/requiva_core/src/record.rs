//! Order records and record batches.

use crate::schema::{column_names, Field, FIELD_COUNT};
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// An untyped row from an external source.
///
/// Keys are arbitrary column names; nothing about the set of keys is
/// guaranteed.
pub type RawRow = BTreeMap<String, Value>;

/// A row as it crosses the normalizer boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// A row read from a backend or built by hand, not yet checked.
    External(RawRow),
    /// A row that already has the canonical shape.
    Canonical(OrderRecord),
}

impl From<RawRow> for Row {
    fn from(row: RawRow) -> Self {
        Row::External(row)
    }
}

impl From<OrderRecord> for Row {
    fn from(record: OrderRecord) -> Self {
        Row::Canonical(record)
    }
}

/// One purchase-order line with exactly the canonical field set.
///
/// Fields that were absent are held as [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderRecord {
    values: [Value; FIELD_COUNT],
}

impl OrderRecord {
    /// Creates a record with every field null.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, field: Field) -> &Value {
        &self.values[field.index()]
    }

    /// Replaces the value of a field.
    pub fn set(&mut self, field: Field, value: impl Into<Value>) {
        self.values[field.index()] = value.into();
    }

    /// Builder-style [`OrderRecord::set`].
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Returns the `REQ#` value.
    #[must_use]
    pub fn req_id(&self) -> &Value {
        self.get(Field::ReqId)
    }

    /// Iterates fields and values in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &Value)> {
        Field::ALL.iter().copied().zip(self.values.iter())
    }

    /// Returns the values in canonical order.
    #[must_use]
    pub fn values(&self) -> &[Value; FIELD_COUNT] {
        &self.values
    }

    /// Converts back into an untyped row keyed by column name.
    #[must_use]
    pub fn to_raw(&self) -> RawRow {
        self.iter()
            .map(|(field, value)| (field.name().to_string(), value.clone()))
            .collect()
    }

    pub(crate) fn from_values(values: [Value; FIELD_COUNT]) -> Self {
        Self { values }
    }
}

impl Serialize for OrderRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.name(), value)?;
        }
        map.end()
    }
}

/// An ordered collection of canonical records.
///
/// A batch always knows its columns, so an empty batch still reports the
/// canonical field list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordBatch {
    records: Vec<OrderRecord>,
}

impl RecordBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a batch from canonical records.
    #[must_use]
    pub fn from_records(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    /// Column names of this batch, always the canonical list.
    #[must_use]
    pub fn columns(&self) -> [&'static str; FIELD_COUNT] {
        column_names()
    }

    /// Appends a record.
    pub fn push(&mut self, record: OrderRecord) {
        self.records.push(record);
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, OrderRecord> {
        self.records.iter()
    }

    /// Returns the records as a slice.
    #[must_use]
    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    /// Converts into normalizer input rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.records.into_iter().map(Row::Canonical).collect()
    }

    /// Keeps only records matching the predicate.
    #[must_use]
    pub fn filtered<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&OrderRecord) -> bool,
    {
        Self {
            records: self.records.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }
}

impl IntoIterator for RecordBatch {
    type Item = OrderRecord;
    type IntoIter = std::vec::IntoIter<OrderRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordBatch {
    type Item = &'a OrderRecord;
    type IntoIter = std::slice::Iter<'a, OrderRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<OrderRecord> for RecordBatch {
    fn from_iter<I: IntoIterator<Item = OrderRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Serialize for RecordBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}
