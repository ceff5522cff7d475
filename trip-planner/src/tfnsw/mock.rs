//! Fixture transport for testing without API access.
//!
//! Serves canned JSON documents per endpoint as if they were live API
//! responses, and records every request so tests can check the
//! parameters that were sent.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use super::client::{ApiTransport, Endpoint, decode_body};
use super::error::TripPlannerError;

/// A request seen by a [`FixtureTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub endpoint: Endpoint,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of the first parameter with the given name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport that serves data from memory or JSON files.
#[derive(Clone, Default)]
pub struct FixtureTransport {
    responses: Arc<RwLock<HashMap<Endpoint, Value>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FixtureTransport {
    /// Create a transport with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport serving the given response per endpoint.
    ///
    /// A later entry for the same endpoint replaces an earlier one.
    pub fn from_responses(responses: impl IntoIterator<Item = (Endpoint, Value)>) -> Self {
        Self {
            responses: Arc::new(RwLock::new(responses.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    /// Create a transport serving `response` for every request to `endpoint`.
    pub fn serving(endpoint: Endpoint, response: Value) -> Self {
        Self::from_responses([(endpoint, response)])
    }

    /// Load fixtures from a directory.
    ///
    /// Expects files named after the endpoint path (e.g. `trip.json`,
    /// `stop_finder.json`). Other files are ignored.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TripPlannerError> {
        let dir = dir.as_ref();
        let mut responses = HashMap::new();

        let entries = std::fs::read_dir(dir).map_err(|e| {
            TripPlannerError::Config(format!("failed to read fixture directory {dir:?}: {e}"))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| TripPlannerError::Config(format!("failed to read directory entry: {e}")))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(endpoint) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(Endpoint::from_path)
            else {
                continue;
            };

            let body = std::fs::read_to_string(&path)
                .map_err(|e| TripPlannerError::Config(format!("failed to read {path:?}: {e}")))?;
            let value: Value = serde_json::from_str(&body)
                .map_err(|e| TripPlannerError::Config(format!("failed to parse {path:?}: {e}")))?;
            responses.insert(endpoint, value);
        }

        if responses.is_empty() {
            return Err(TripPlannerError::Config(format!(
                "no fixture files found in {dir:?}"
            )));
        }

        Ok(Self::from_responses(responses))
    }

    /// Replace the response for an endpoint.
    pub async fn set_response(&self, endpoint: Endpoint, response: Value) {
        self.responses.write().await.insert(endpoint, response);
    }

    /// Every request made so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().await.last().cloned()
    }
}

impl ApiTransport for FixtureTransport {
    async fn get(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<Value, TripPlannerError> {
        self.requests.lock().await.push(RecordedRequest {
            endpoint,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });

        let response = self
            .responses
            .read()
            .await
            .get(&endpoint)
            .cloned()
            .ok_or_else(|| TripPlannerError::Api {
                status: Some(404),
                message: format!("no fixture for endpoint {endpoint}"),
            })?;

        // Same error-object handling as the HTTP transport
        decode_body(&response.to_string())
    }
}
