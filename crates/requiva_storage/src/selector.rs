//! Backend selection.
//!
//! The selector runs once per process. It tries the remote document store
//! and, when that cannot be configured or reached, falls back to the local
//! table with a warning. It never fails.

use crate::config::{ServiceAccount, StoreConfig};
use crate::document::DocumentStore;
use crate::error::ConfigError;
use crate::local::LocalTable;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds a remote document store client for one service identity.
pub trait RemoteConnector {
    /// Connects to `collection` as `account`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Connect`] when the client cannot be built or
    /// authenticated.
    fn connect(
        &self,
        account: &ServiceAccount,
        collection: &str,
    ) -> Result<Arc<dyn DocumentStore>, ConfigError>;
}

/// A connector that never connects, for local-only use.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalOnly;

impl RemoteConnector for LocalOnly {
    fn connect(
        &self,
        _account: &ServiceAccount,
        _collection: &str,
    ) -> Result<Arc<dyn DocumentStore>, ConfigError> {
        Err(ConfigError::connect("remote store support is disabled"))
    }
}

/// The remote half of a [`Backend`].
#[derive(Clone)]
pub struct RemoteBackend {
    store: Arc<dyn DocumentStore>,
}

impl RemoteBackend {
    /// Wraps a connected store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The underlying document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

impl fmt::Debug for RemoteBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteBackend")
            .field("collection", &self.store.collection())
            .finish()
    }
}

/// The storage backend chosen for this process.
#[derive(Debug, Clone)]
pub enum Backend {
    /// A remote document collection.
    Remote(RemoteBackend),
    /// A local CSV table.
    Local(LocalTable),
}

impl Backend {
    /// Creates a remote backend over `store`.
    pub fn remote(store: Arc<dyn DocumentStore>) -> Self {
        Self::Remote(RemoteBackend::new(store))
    }

    /// Creates a local backend at `table`.
    pub fn local(table: LocalTable) -> Self {
        Self::Local(table)
    }

    /// Which kind of backend this is.
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Remote(_) => BackendKind::Remote,
            Self::Local(_) => BackendKind::Local,
        }
    }

    /// Human-readable location: the collection or the file path.
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Self::Remote(remote) => remote.store().collection().to_string(),
            Self::Local(table) => table.path().display().to_string(),
        }
    }
}

/// Kind of backend, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Remote document store.
    Remote,
    /// Local CSV table.
    Local,
}

impl BackendKind {
    /// Banner text shown to users.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Remote => "Connected to remote document store",
            Self::Local => "Using local CSV storage",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Chooses the backend for this process.
///
/// Uses the remote store when credentials resolve and `connector` succeeds;
/// otherwise logs the cause and returns the local table at
/// `config.data_path`.
pub fn select_backend(config: &StoreConfig, connector: &dyn RemoteConnector) -> Backend {
    match try_remote(config, connector) {
        Ok(backend) => {
            info!(collection = %config.collection, "using remote document store");
            backend
        }
        Err(err) => {
            warn!(error = %err, path = %config.data_path.display(), "falling back to local CSV storage");
            Backend::local(LocalTable::new(&config.data_path))
        }
    }
}

fn try_remote(config: &StoreConfig, connector: &dyn RemoteConnector) -> Result<Backend, ConfigError> {
    let account = config.credentials.resolve()?;
    let store = connector.connect(&account, &config.collection)?;
    Ok(Backend::remote(store))
}
