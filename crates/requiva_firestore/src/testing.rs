//! Scripted HTTP client for unit tests.

use crate::error::{FirestoreError, FirestoreResult};
use crate::http::HttpClient;
use parking_lot::Mutex;
use serde_json::Value as Json;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub method: &'static str,
    pub url: String,
    pub bearer: Option<String>,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub body: Option<Json>,
}

/// Replays queued responses in order and records every request.
#[derive(Debug, Default)]
pub(crate) struct ScriptedClient {
    responses: Mutex<VecDeque<FirestoreResult<Json>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: Json) {
        self.responses.lock().push_back(Ok(response));
    }

    pub fn push_error(&self, error: FirestoreError) {
        self.responses.lock().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    fn reply(&self, request: Request) -> FirestoreResult<Json> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FirestoreError::http("no scripted response")))
    }
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

impl HttpClient for ScriptedClient {
    fn get_json(&self, url: &str, bearer: &str, query: &[(&str, &str)]) -> FirestoreResult<Json> {
        self.reply(Request {
            method: "GET",
            url: url.to_string(),
            bearer: Some(bearer.to_string()),
            query: owned(query),
            form: Vec::new(),
            body: None,
        })
    }

    fn post_json(&self, url: &str, bearer: &str, body: &Json) -> FirestoreResult<Json> {
        self.reply(Request {
            method: "POST",
            url: url.to_string(),
            bearer: Some(bearer.to_string()),
            query: Vec::new(),
            form: Vec::new(),
            body: Some(body.clone()),
        })
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> FirestoreResult<Json> {
        self.reply(Request {
            method: "POST",
            url: url.to_string(),
            bearer: None,
            query: Vec::new(),
            form: owned(form),
            body: None,
        })
    }
}
