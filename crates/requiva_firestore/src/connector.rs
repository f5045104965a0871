//! [`RemoteConnector`] for Firestore.

use crate::error::FirestoreResult;
use crate::http::{HttpClient, ReqwestClient};
use crate::store::{FirestoreClient, FirestoreStore, DEFAULT_BASE_URL};
use parking_lot::Mutex;
use requiva_storage::{ConfigError, DocumentStore, RemoteConnector, ServiceAccount};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Connects to Firestore, building at most one client per service identity.
///
/// A client is keyed by project id and service email. Connecting again with
/// the same identity reuses the authenticated client instead of
/// initialising a new one.
pub struct FirestoreConnector {
    http: Arc<dyn HttpClient>,
    base_url: String,
    clients: Mutex<HashMap<(String, String), Arc<FirestoreClient>>>,
}

impl FirestoreConnector {
    /// Creates a connector using a real HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> FirestoreResult<Self> {
        Ok(Self::with_http(Arc::new(ReqwestClient::new()?)))
    }

    /// Creates a connector over `http`.
    pub fn with_http(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Overrides the REST API root, e.g. for an emulator.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Number of distinct clients built so far.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    fn client(&self, account: &ServiceAccount) -> FirestoreResult<Arc<FirestoreClient>> {
        let identity = account.identity();
        let mut clients = self.clients.lock();
        if let Some(client) = clients.get(&identity) {
            debug!(project = %identity.0, "reusing remote client");
            return Ok(Arc::clone(client));
        }

        let client = FirestoreClient::new(account, Arc::clone(&self.http), self.base_url.clone())?;
        client.authenticate()?;
        info!(project = %identity.0, email = %identity.1, "authenticated remote client");

        let client = Arc::new(client);
        clients.insert(identity, Arc::clone(&client));
        Ok(client)
    }
}

impl RemoteConnector for FirestoreConnector {
    fn connect(
        &self,
        account: &ServiceAccount,
        collection: &str,
    ) -> Result<Arc<dyn DocumentStore>, ConfigError> {
        let client = self.client(account)?;
        Ok(Arc::new(FirestoreStore::new(client, collection)))
    }
}

impl std::fmt::Debug for FirestoreConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreConnector")
            .field("base_url", &self.base_url)
            .field("clients", &self.client_count())
            .finish_non_exhaustive()
    }
}
