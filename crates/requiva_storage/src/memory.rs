//! In-memory document store for testing.

use crate::document::{is_valid_key, DocumentStore, DocumentWrite};
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use requiva_core::RawRow;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// An in-memory document collection.
///
/// Follows the same merge and atomicity rules as the remote store, and can
/// be switched to fail every request to exercise error paths.
///
/// # Example
///
/// ```rust
/// use requiva_core::Value;
/// use requiva_storage::{DocumentStore, DocumentWrite, MemoryDocumentStore};
///
/// let store = MemoryDocumentStore::new("requiva_orders");
/// store
///     .commit(&[DocumentWrite::new("REQ-2025-0001", vec![("ITEM".into(), Value::text("Tubes"))])])
///     .unwrap();
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryDocumentStore {
    collection: String,
    documents: RwLock<BTreeMap<String, RawRow>>,
    unavailable: AtomicBool,
}

impl MemoryDocumentStore {
    /// Creates an empty collection.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            documents: RwLock::new(BTreeMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Creates a collection with pre-existing documents.
    ///
    /// Useful for simulating documents written under older schemas.
    pub fn with_documents(
        collection: impl Into<String>,
        documents: impl IntoIterator<Item = (String, RawRow)>,
    ) -> Self {
        let store = Self::new(collection);
        store.documents.write().extend(documents);
        store
    }

    /// Returns a copy of one document.
    #[must_use]
    pub fn document(&self, key: &str) -> Option<RawRow> {
        self.documents.read().get(key).cloned()
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Makes every subsequent request fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::remote("store unavailable"));
        }
        Ok(())
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn list_documents(&self) -> StorageResult<Vec<RawRow>> {
        self.check_available()?;
        Ok(self.documents.read().values().cloned().collect())
    }

    fn commit(&self, writes: &[DocumentWrite]) -> StorageResult<()> {
        self.check_available()?;

        // Reject the whole batch before touching anything.
        if let Some(bad) = writes.iter().find(|w| !is_valid_key(&w.key)) {
            return Err(StorageError::invalid_key(bad.key.clone()));
        }

        let mut documents = self.documents.write();
        for write in writes {
            let document = documents.entry(write.key.clone()).or_default();
            for (name, value) in &write.fields {
                document.insert(name.clone(), value.clone());
            }
        }
        Ok(())
    }
}
