//! Service-account authentication.
//!
//! A JWT assertion signed with the account's RSA key is exchanged at the
//! token endpoint for a short-lived bearer token. Tokens are reused until
//! shortly before they expire.

use crate::error::{FirestoreError, FirestoreResult};
use crate::http::HttpClient;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use parking_lot::Mutex;
use requiva_storage::ServiceAccount;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Token endpoint used when the account does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth scope for Firestore access.
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Issues bearer tokens for one service account.
pub struct TokenSource {
    http: Arc<dyn HttpClient>,
    client_email: String,
    token_uri: String,
    key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    /// Creates a token source for `account`.
    ///
    /// # Errors
    ///
    /// Returns [`FirestoreError::Auth`] if the private key is not a valid
    /// RSA PEM key.
    pub fn new(account: &ServiceAccount, http: Arc<dyn HttpClient>) -> FirestoreResult<Self> {
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
            .map_err(|e| FirestoreError::auth(format!("invalid private key: {e}")))?;
        Ok(Self {
            http,
            client_email: account.client_email.clone(),
            token_uri: account
                .token_uri
                .clone()
                .filter(|uri| !uri.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            key,
            cached: Mutex::new(None),
        })
    }

    /// The token endpoint in use.
    #[must_use]
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Returns a valid bearer token, fetching a new one when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if signing or the token exchange fails.
    pub fn token(&self) -> FirestoreResult<String> {
        let mut cached = self.cached.lock();
        if let Some(current) = cached.as_ref() {
            if Instant::now() < current.refresh_at {
                return Ok(current.token.clone());
            }
        }

        let fresh = self.fetch()?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    fn fetch(&self) -> FirestoreResult<CachedToken> {
        let assertion = self.assertion()?;
        let response = self.http.post_form(
            &self.token_uri,
            &[("grant_type", GRANT_TYPE), ("assertion", &assertion)],
        )?;
        let response: TokenResponse = serde_json::from_value(response)
            .map_err(|e| FirestoreError::auth(format!("token response: {e}")))?;

        let lifetime = Duration::from_secs(response.expires_in);
        debug!(email = %self.client_email, expires_in = response.expires_in, "fetched access token");
        Ok(CachedToken {
            token: response.access_token,
            refresh_at: Instant::now() + lifetime.saturating_sub(REFRESH_MARGIN),
        })
    }

    fn assertion(&self) -> FirestoreResult<String> {
        let iat = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| FirestoreError::auth(e.to_string()))?
            .as_secs();
        let claims = Claims {
            iss: &self.client_email,
            scope: DATASTORE_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| FirestoreError::auth(format!("signing assertion: {e}")))
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSource")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}
