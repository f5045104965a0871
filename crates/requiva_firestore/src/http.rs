//! HTTP client abstraction.
//!
//! The REST client talks JSON through [`HttpClient`] so tests can swap in a
//! scripted client. [`ReqwestClient`] is the real one.

use crate::error::{FirestoreError, FirestoreResult};
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value as Json;
use std::time::Duration;

/// Fixed timeout for every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Minimal JSON-over-HTTP client.
pub trait HttpClient: Send + Sync {
    /// Sends a GET with bearer auth and query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    fn get_json(&self, url: &str, bearer: &str, query: &[(&str, &str)]) -> FirestoreResult<Json>;

    /// Sends a POST of a JSON body with bearer auth.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    fn post_json(&self, url: &str, bearer: &str, body: &Json) -> FirestoreResult<Json>;

    /// Sends an unauthenticated form POST.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> FirestoreResult<Json>;
}

/// [`HttpClient`] over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Builds a client with [`REQUEST_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> FirestoreResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FirestoreError::http(e.to_string()))?;
        Ok(Self { client })
    }

    fn send(request: RequestBuilder) -> FirestoreResult<Json> {
        let response = request
            .send()
            .map_err(|e| FirestoreError::http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            truncate(&mut body, MAX_ERROR_BODY);
            return Err(FirestoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<Json>()
            .map_err(|e| FirestoreError::decode(e.to_string()))
    }
}

impl HttpClient for ReqwestClient {
    fn get_json(&self, url: &str, bearer: &str, query: &[(&str, &str)]) -> FirestoreResult<Json> {
        Self::send(self.client.get(url).bearer_auth(bearer).query(query))
    }

    fn post_json(&self, url: &str, bearer: &str, body: &Json) -> FirestoreResult<Json> {
        Self::send(self.client.post(url).bearer_auth(bearer).json(body))
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> FirestoreResult<Json> {
        Self::send(self.client.post(url).form(form))
    }
}

fn truncate(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
