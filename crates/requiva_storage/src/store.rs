//! The record store: one load/save interface over either backend.

use crate::document::{is_valid_key, DocumentWrite};
use crate::error::{StorageError, StorageResult};
use crate::selector::{Backend, BackendKind};
use requiva_core::{
    generate_id, generate_id_for_year, normalize, normalize_batch, Field, NewOrder, OrderRecord,
    RecordBatch, Row,
};
use tracing::{debug, info};

/// Outcome of a save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    /// Records written.
    pub written: usize,
    /// Records skipped because their `REQ#` was missing.
    pub skipped: usize,
}

/// Loads and saves order records through the selected [`Backend`].
///
/// Every load and save passes through the schema normalizer, so callers
/// only ever see canonical [`RecordBatch`]es.
///
/// # Example
///
/// ```rust,no_run
/// use requiva_storage::{select_backend, LocalOnly, RecordStore, StoreConfig};
///
/// let backend = select_backend(&StoreConfig::from_env(), &LocalOnly);
/// let store = RecordStore::new(backend);
/// let batch = store.load().unwrap();
/// println!("{} orders", batch.len());
/// ```
#[derive(Debug, Clone)]
pub struct RecordStore {
    backend: Backend,
}

impl RecordStore {
    /// Creates a store over `backend`.
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// The active backend.
    #[must_use]
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Which kind of backend is active.
    #[must_use]
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Loads every record, normalized to the canonical schema.
    ///
    /// Rows written under older schemas get null for the fields they lack.
    /// The local table is created header-only when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn load(&self) -> StorageResult<RecordBatch> {
        let rows = match &self.backend {
            Backend::Remote(remote) => remote.store().list_documents()?,
            Backend::Local(table) => table.read_rows()?,
        };
        let batch = normalize(rows);
        debug!(backend = %self.backend_kind(), records = batch.len(), "loaded records");
        Ok(batch)
    }

    /// Saves `batch`.
    ///
    /// Remote: each record with a usable `REQ#` is merged into the document
    /// of that key, every canonical field written and nulls included; the
    /// rest are skipped. All writes are committed together.
    ///
    /// Local: the table is replaced by `batch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the save. Nothing is written
    /// then.
    pub fn save(&self, batch: &RecordBatch) -> StorageResult<SaveSummary> {
        let batch = normalize_batch(batch.clone());
        let summary = match &self.backend {
            Backend::Remote(remote) => {
                let mut writes = Vec::with_capacity(batch.len());
                let mut skipped = 0;
                for record in &batch {
                    let key = record.req_id();
                    if key.is_missing_key() {
                        debug!(item = %record.get(Field::Item), "skipping record without REQ#");
                        skipped += 1;
                        continue;
                    }
                    let key = key.to_string();
                    if !is_valid_key(&key) {
                        return Err(StorageError::invalid_key(key));
                    }
                    writes.push(DocumentWrite::from_record(key, record));
                }
                remote.store().commit(&writes)?;
                SaveSummary {
                    written: writes.len(),
                    skipped,
                }
            }
            Backend::Local(table) => {
                table.replace(&batch)?;
                SaveSummary {
                    written: batch.len(),
                    skipped: 0,
                }
            }
        };
        info!(
            backend = %self.backend_kind(),
            written = summary.written,
            skipped = summary.skipped,
            "saved records"
        );
        Ok(summary)
    }

    /// Normalizes arbitrary rows and saves them.
    ///
    /// # Errors
    ///
    /// See [`RecordStore::save`].
    pub fn save_rows<I>(&self, rows: I) -> StorageResult<SaveSummary>
    where
        I: IntoIterator,
        I::Item: Into<Row>,
    {
        self.save(&normalize(rows))
    }

    /// Next `REQ#` for the current year given `existing`.
    #[must_use]
    pub fn generate_id(&self, existing: &RecordBatch) -> String {
        generate_id(existing)
    }

    /// Next `REQ#` for `year` given `existing`.
    #[must_use]
    pub fn generate_id_for_year(&self, existing: &RecordBatch, year: i32) -> String {
        generate_id_for_year(existing, year)
    }

    /// Adds one order: loads, assigns the next `REQ#`, appends, saves.
    ///
    /// Not atomic with respect to other writers; two concurrent appends can
    /// pick the same identifier.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `order` is rejected, or the load/save
    /// error.
    pub fn append(&self, order: NewOrder) -> StorageResult<OrderRecord> {
        order.validate().map_err(requiva_core::CoreError::from)?;

        let mut batch = self.load()?;
        let id = self.generate_id(&batch);
        let record = order.into_record(id)?;
        batch.push(record.clone());
        self.save(&batch)?;
        info!(req_id = %record.req_id(), "added order");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalTable;
    use crate::memory::MemoryDocumentStore;
    use requiva_core::{current_year, RawRow, Value};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn remote_store() -> (Arc<MemoryDocumentStore>, RecordStore) {
        let memory = Arc::new(MemoryDocumentStore::new("orders"));
        let store = RecordStore::new(Backend::remote(memory.clone()));
        (memory, store)
    }

    fn record(id: Value, item: &str) -> OrderRecord {
        OrderRecord::new()
            .with(Field::ReqId, id)
            .with(Field::Item, item)
            .with(Field::Vendor, "Acme")
    }

    #[test]
    fn empty_remote_loads_shaped_batch() {
        let (_, store) = remote_store();
        let batch = store.load().unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.columns().len(), requiva_core::FIELD_COUNT);
    }

    #[test]
    fn remote_save_skips_missing_keys() {
        let (memory, store) = remote_store();
        let batch = RecordBatch::from_records(vec![
            record(Value::text("REQ-2025-0001"), "Tubes"),
            record(Value::Null, "Gloves"),
            record(Value::text("  "), "Tips"),
            record(Value::text("NaN"), "Racks"),
        ]);

        let summary = store.save(&batch).unwrap();
        assert_eq!(
            summary,
            SaveSummary {
                written: 1,
                skipped: 3
            }
        );
        assert_eq!(memory.len(), 1);
        assert!(memory.document("REQ-2025-0001").is_some());
    }

    #[test]
    fn remote_save_writes_every_field() {
        let (memory, store) = remote_store();
        store
            .save(&RecordBatch::from_records(vec![record(
                Value::text("REQ-2025-0001"),
                "Tubes",
            )]))
            .unwrap();

        let doc = memory.document("REQ-2025-0001").unwrap();
        assert_eq!(doc.len(), requiva_core::FIELD_COUNT);
        assert_eq!(doc.get("NOTES"), Some(&Value::Null));
    }

    #[test]
    fn remote_save_rejects_bad_key_before_commit() {
        let (memory, store) = remote_store();
        let batch = RecordBatch::from_records(vec![
            record(Value::text("REQ-2025-0001"), "Tubes"),
            record(Value::text("a/b"), "Gloves"),
        ]);
        assert!(matches!(
            store.save(&batch),
            Err(StorageError::InvalidKey { .. })
        ));
        assert!(memory.is_empty());
    }

    #[test]
    fn remote_failure_propagates() {
        let (memory, store) = remote_store();
        memory.set_unavailable(true);
        assert!(store.load().is_err());
        assert!(store.save(&RecordBatch::new()).is_err());
    }

    #[test]
    fn remote_load_null_fills_old_documents() {
        let mut old = RawRow::new();
        old.insert("REQ#".to_string(), Value::text("REQ-2023-0001"));
        old.insert("ITEM".to_string(), Value::text("Pipettes"));
        old.insert("ITEM LOCATION".to_string(), Value::text("Shelf 3"));
        let memory = MemoryDocumentStore::with_documents("orders", [("REQ-2023-0001".to_string(), old)]);
        let store = RecordStore::new(Backend::remote(Arc::new(memory)));

        let batch = store.load().unwrap();
        let loaded = &batch.records()[0];
        assert_eq!(loaded.get(Field::Item), &Value::text("Pipettes"));
        assert!(loaded.get(Field::LocationKept).is_null());
        assert!(loaded.get(Field::TimeReceived).is_null());
    }

    #[test]
    fn local_save_replaces_file() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(Backend::local(LocalTable::new(dir.path().join("orders.csv"))));

        let batch = RecordBatch::from_records(vec![
            record(Value::text("REQ-2025-0001"), "Tubes"),
            record(Value::Null, "Gloves"),
        ]);
        let summary = store.save(&batch).unwrap();
        assert_eq!(summary.written, 2);
        assert_eq!(store.load().unwrap(), batch);
    }

    #[test]
    fn save_rows_normalizes() {
        let (memory, store) = remote_store();
        let mut raw = RawRow::new();
        raw.insert("REQ#".to_string(), Value::text("REQ-2025-0003"));
        raw.insert("LEGACY".to_string(), Value::text("dropped"));

        store.save_rows(vec![raw]).unwrap();
        let doc = memory.document("REQ-2025-0003").unwrap();
        assert!(doc.get("LEGACY").is_none());
        assert_eq!(doc.len(), requiva_core::FIELD_COUNT);
    }

    #[test]
    fn append_assigns_next_id() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(Backend::local(LocalTable::new(dir.path().join("orders.csv"))));

        let first = store.append(NewOrder::new("Tubes", 3.0, 19.995, "Acme")).unwrap();
        let second = store.append(NewOrder::new("Gloves", 1.0, 8.0, "VWR")).unwrap();

        let year = current_year();
        assert_eq!(first.req_id(), &Value::text(format!("REQ-{year}-0001")));
        assert_eq!(second.req_id(), &Value::text(format!("REQ-{year}-0002")));
        assert_eq!(first.get(Field::Total).as_number(), Some(59.99));
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn append_rejects_invalid_order_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        let store = RecordStore::new(Backend::local(LocalTable::new(&path)));

        let err = store.append(NewOrder::new("", 1.0, 1.0, "Acme")).unwrap_err();
        assert_eq!(err.to_string(), "ITEM is required.");
        assert!(!path.exists());
    }

    #[test]
    fn generate_id_delegates() {
        let (_, store) = remote_store();
        let batch = RecordBatch::from_records(vec![record(Value::text("REQ-2025-0007"), "Tubes")]);
        assert_eq!(store.generate_id_for_year(&batch, 2025), "REQ-2025-0008");
    }
}
