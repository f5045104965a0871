//! Firestore collections as [`DocumentStore`]s.

use crate::auth::TokenSource;
use crate::encode::{decode_document, encode_fields, field_path};
use crate::error::{FirestoreError, FirestoreResult};
use crate::http::HttpClient;
use requiva_core::RawRow;
use requiva_storage::{
    is_valid_key, DocumentStore, DocumentWrite, ServiceAccount, StorageError, StorageResult,
};
use serde_json::{json, Value as Json};
use std::sync::Arc;
use tracing::debug;

/// Firestore REST API root.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Documents requested per listing page.
pub const PAGE_SIZE: usize = 300;

/// An authenticated connection to one project's default database.
pub struct FirestoreClient {
    http: Arc<dyn HttpClient>,
    tokens: TokenSource,
    base_url: String,
    project_id: String,
}

impl FirestoreClient {
    /// Creates a client for `account` against `base_url`.
    ///
    /// No request is made until [`FirestoreClient::authenticate`] or the
    /// first store operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the account's key cannot be loaded.
    pub fn new(
        account: &ServiceAccount,
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
    ) -> FirestoreResult<Self> {
        let tokens = TokenSource::new(account, Arc::clone(&http))?;
        Ok(Self {
            http,
            tokens,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: account.project_id.clone(),
        })
    }

    /// Fetches a token now, so credential problems surface immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub fn authenticate(&self) -> FirestoreResult<()> {
        self.tokens.token().map(|_| ())
    }

    /// Project this client is bound to.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Resource name of the database's document root.
    #[must_use]
    pub fn documents_root(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}{}", self.base_url, self.documents_root(), suffix)
    }

    fn list_page(&self, collection: &str, page_token: Option<&str>) -> FirestoreResult<Json> {
        let token = self.tokens.token()?;
        let page_size = PAGE_SIZE.to_string();
        let mut query = vec![("pageSize", page_size.as_str())];
        if let Some(page_token) = page_token {
            query.push(("pageToken", page_token));
        }
        self.http
            .get_json(&self.url(&format!("/{collection}")), &token, &query)
    }

    fn commit(&self, body: &Json) -> FirestoreResult<Json> {
        let token = self.tokens.token()?;
        self.http.post_json(&self.url(":commit"), &token, body)
    }
}

impl std::fmt::Debug for FirestoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreClient")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

/// One Firestore collection.
///
/// Listing pages through the whole collection. Commits go through the
/// `documents:commit` endpoint, which applies all writes or none.
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Arc<FirestoreClient>,
    collection: String,
}

impl FirestoreStore {
    /// Creates a store for `collection` over `client`.
    pub fn new(client: Arc<FirestoreClient>, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    /// Resource name of the document with `key`.
    #[must_use]
    pub fn document_name(&self, key: &str) -> String {
        format!("{}/{}/{}", self.client.documents_root(), self.collection, key)
    }

    /// Builds the commit request body for `writes`.
    ///
    /// Each write becomes an `update` with an `updateMask` naming exactly
    /// the written fields, so other fields of the document are kept.
    #[must_use]
    pub fn commit_body(&self, writes: &[DocumentWrite]) -> Json {
        let writes: Vec<Json> = writes
            .iter()
            .map(|write| {
                let fields = encode_fields(write.fields.iter().map(|(k, v)| (k.as_str(), v)));
                let paths: Vec<String> = write.fields.iter().map(|(k, _)| field_path(k)).collect();
                json!({
                    "update": {
                        "name": self.document_name(&write.key),
                        "fields": fields,
                    },
                    "updateMask": { "fieldPaths": paths },
                })
            })
            .collect();
        json!({ "writes": writes })
    }
}

impl DocumentStore for FirestoreStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn list_documents(&self) -> StorageResult<Vec<RawRow>> {
        let mut rows = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self.client.list_page(&self.collection, page_token.as_deref())?;
            let documents = match page.get("documents") {
                None => &[][..],
                Some(Json::Array(documents)) => documents.as_slice(),
                Some(_) => {
                    return Err(FirestoreError::decode("documents is not an array").into());
                }
            };
            for document in documents {
                rows.push(decode_document(document)?);
            }
            debug!(collection = %self.collection, page = documents.len(), total = rows.len(), "listed page");

            page_token = page
                .get("nextPageToken")
                .and_then(Json::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            if page_token.is_none() {
                return Ok(rows);
            }
        }
    }

    fn commit(&self, writes: &[DocumentWrite]) -> StorageResult<()> {
        if let Some(bad) = writes.iter().find(|w| !is_valid_key(&w.key)) {
            return Err(StorageError::invalid_key(bad.key.clone()));
        }
        if writes.is_empty() {
            return Ok(());
        }
        self.client.commit(&self.commit_body(writes))?;
        debug!(collection = %self.collection, writes = writes.len(), "committed writes");
        Ok(())
    }
}
