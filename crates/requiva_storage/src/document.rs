//! Remote document store trait definition.

use crate::error::StorageResult;
use requiva_core::{OrderRecord, RawRow, Value};

/// A merge write of one document.
///
/// Only the listed fields are touched. A field written as [`Value::Null`]
/// overwrites the stored value with null; a field left out keeps whatever
/// the document already holds.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    /// Document key.
    pub key: String,
    /// Fields to set, in order.
    pub fields: Vec<(String, Value)>,
}

impl DocumentWrite {
    /// Creates a write of the given fields.
    pub fn new(key: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Self {
            key: key.into(),
            fields,
        }
    }

    /// Creates a write carrying every canonical field of `record`.
    pub fn from_record(key: impl Into<String>, record: &OrderRecord) -> Self {
        let fields = record
            .iter()
            .map(|(field, value)| (field.name().to_string(), value.clone()))
            .collect();
        Self::new(key, fields)
    }
}

/// A schema-less keyed collection of documents.
///
/// Documents are maps from field name to [`Value`] and may carry any keys,
/// including ones left over from older schemas.
///
/// # Invariants
///
/// - `commit` applies every write or none of them
/// - writes merge into existing documents field by field
/// - explicit nulls are stored, not dropped
///
/// # Implementors
///
/// - [`super::MemoryDocumentStore`] - For testing
/// - `requiva_firestore::FirestoreStore` - Firestore over REST
pub trait DocumentStore: Send + Sync {
    /// Name of the collection this store reads and writes.
    fn collection(&self) -> &str;

    /// Returns every document in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    fn list_documents(&self) -> StorageResult<Vec<RawRow>>;

    /// Applies all `writes` as one atomic batch.
    ///
    /// # Errors
    ///
    /// Returns an error if any write is rejected; nothing is applied then.
    fn commit(&self, writes: &[DocumentWrite]) -> StorageResult<()>;
}

/// Whether `key` can name a document.
///
/// Keys must be non-empty, must not contain `/` and must not be `.` or `..`.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains('/') && key != "." && key != ".."
}
