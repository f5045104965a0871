//! # Requiva Firestore
//!
//! Remote document store for Requiva over the Firestore REST API.
//!
//! [`FirestoreConnector`] plugs into `requiva_storage::select_backend`.
//! It authenticates with a service account and hands out
//! [`FirestoreStore`]s, one per collection, sharing one client per
//! identity.
//!
//! ## Example
//!
//! ```rust,no_run
//! use requiva_firestore::FirestoreConnector;
//! use requiva_storage::{select_backend, RecordStore, StoreConfig};
//!
//! let connector = FirestoreConnector::new().unwrap();
//! let backend = select_backend(&StoreConfig::from_env(), &connector);
//! let store = RecordStore::new(backend);
//! println!("{}", store.backend_kind().describe());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod connector;
mod encode;
mod error;
mod http;
mod store;

#[cfg(test)]
mod testing;

pub use auth::{TokenSource, DATASTORE_SCOPE, DEFAULT_TOKEN_URI};
pub use connector::FirestoreConnector;
pub use encode::{decode_document, decode_value, encode_fields, encode_value, field_path};
pub use error::{FirestoreError, FirestoreResult};
pub use http::{HttpClient, ReqwestClient, REQUEST_TIMEOUT};
pub use store::{FirestoreClient, FirestoreStore, DEFAULT_BASE_URL, PAGE_SIZE};
