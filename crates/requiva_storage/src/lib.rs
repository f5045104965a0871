//! # Requiva Storage
//!
//! Persistence for Requiva order records.
//!
//! One [`RecordStore`] interface covers two backends: a remote, schema-less
//! document collection and a local CSV table. The backend is chosen once per
//! process by [`select_backend`], which falls back to the local table when
//! the remote store is unavailable.
//!
//! ## Available Backends
//!
//! - [`DocumentStore`] implementations, used through [`Backend::Remote`]
//!   - [`MemoryDocumentStore`] - For testing
//!   - `requiva_firestore::FirestoreStore` - Firestore over REST
//! - [`LocalTable`] - A CSV file on disk
//!
//! ## Example
//!
//! ```rust
//! use requiva_core::{Field, NewOrder, Value};
//! use requiva_storage::{select_backend, LocalOnly, RecordStore, StoreConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = StoreConfig::new().with_data_path(dir.path().join("orders.csv"));
//! let store = RecordStore::new(select_backend(&config, &LocalOnly));
//!
//! let added = store.append(NewOrder::new("Tubes", 2.0, 4.5, "Acme")).unwrap();
//! assert_eq!(added.get(Field::Total), &Value::Number(9.0));
//! assert_eq!(store.load().unwrap().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod document;
mod error;
mod local;
mod memory;
mod selector;
mod store;

pub use config::{
    CredentialSource, ServiceAccount, StoreConfig, DEFAULT_COLLECTION, DEFAULT_DATA_PATH,
    ENV_CLIENT_EMAIL, ENV_COLLECTION, ENV_CREDENTIALS_FILE, ENV_DATA_PATH, ENV_PRIVATE_KEY,
    ENV_PROJECT_ID, ENV_SERVICE_ACCOUNT_JSON,
};
pub use document::{is_valid_key, DocumentStore, DocumentWrite};
pub use error::{ConfigError, StorageError, StorageResult};
pub use local::LocalTable;
pub use memory::MemoryDocumentStore;
pub use selector::{select_backend, Backend, BackendKind, LocalOnly, RemoteBackend, RemoteConnector};
pub use store::{RecordStore, SaveSummary};
