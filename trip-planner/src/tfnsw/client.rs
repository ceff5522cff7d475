//! Trip planner HTTP transport.
//!
//! The query layer talks to the API through the [`ApiTransport`] trait:
//! one GET per call, returning the decoded JSON document. [`HttpTransport`]
//! is the production implementation over reqwest.

use std::fmt;
use std::future::Future;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use super::error::TripPlannerError;
use super::types::ApiErrorBody;

/// Default base URL for the TfNSW trip planner API.
pub const DEFAULT_BASE_URL: &str = "https://api.transport.nsw.gov.au/v1/tp";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Parameters sent with every request.
const COMMON_PARAMS: &[(&str, &str)] = &[
    ("outputFormat", "rapidJSON"),
    ("coordOutputFormat", "EPSG:4326"),
];

/// API endpoints used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    StopFinder,
    Trip,
    DepartureMon,
    AddInfo,
    Coord,
}

impl Endpoint {
    /// Every endpoint, in a fixed order.
    pub const ALL: [Endpoint; 5] = [
        Endpoint::StopFinder,
        Endpoint::Trip,
        Endpoint::DepartureMon,
        Endpoint::AddInfo,
        Endpoint::Coord,
    ];

    /// Path segment under the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::StopFinder => "stop_finder",
            Endpoint::Trip => "trip",
            Endpoint::DepartureMon => "departure_mon",
            Endpoint::AddInfo => "add_info",
            Endpoint::Coord => "coord",
        }
    }

    /// Parse a path segment back into an endpoint.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.path() == path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A source of raw API responses.
///
/// Implementations perform exactly one request per call and report
/// transport failures as `Network` and non-success responses (including a
/// top-level `error` object) as `Api`.
pub trait ApiTransport: Send + Sync {
    fn get(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> impl Future<Output = Result<Value, TripPlannerError>> + Send;
}

/// Configuration for the HTTP transport.
#[derive(Clone)]
pub struct TripPlannerConfig {
    /// API key, sent as `Authorization: apikey <key>`
    pub api_key: String,
    /// Base URL for the API (defaults to production TfNSW)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TripPlannerConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read configuration from the environment.
    ///
    /// `TFNSW_API_KEY` is required; `TFNSW_BASE_URL` and
    /// `TFNSW_TIMEOUT_SECS` override the defaults.
    pub fn from_env() -> Result<Self, TripPlannerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TripPlannerError> {
        let api_key = lookup("TFNSW_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| TripPlannerError::Config("TFNSW_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key);
        if let Some(url) = lookup("TFNSW_BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some(raw) = lookup("TFNSW_TIMEOUT_SECS") {
            let secs = raw.trim().parse().map_err(|_| {
                TripPlannerError::Config(format!("TFNSW_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            config = config.with_timeout(secs);
        }
        Ok(config)
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl fmt::Debug for TripPlannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripPlannerConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport with the given configuration.
    pub fn new(config: TripPlannerConfig) -> Result<Self, TripPlannerError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("apikey {}", config.api_key))
            .map_err(|_| TripPlannerError::Config("invalid API key format".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TripPlannerError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

impl ApiTransport for HttpTransport {
    async fn get(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<Value, TripPlannerError> {
        let url = self.url(endpoint);
        debug!(url = %url, params = ?params, "trip planner request");

        let response = self
            .http
            .get(&url)
            .query(COMMON_PARAMS)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TripPlannerError::Api {
                status: Some(status.as_u16()),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        debug!(endpoint = %endpoint, bytes = body.len(), "trip planner response");
        decode_body(&body)
    }
}

/// Decode a response body, surfacing an embedded `error` object.
pub(crate) fn decode_body(body: &str) -> Result<Value, TripPlannerError> {
    let value: Value = serde_json::from_str(body).map_err(|e| TripPlannerError::Api {
        status: None,
        message: format!("invalid JSON: {e}"),
    })?;

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        let message = serde_json::from_value::<ApiErrorBody>(error.clone())
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| error.to_string());
        return Err(TripPlannerError::Api {
            status: None,
            message,
        });
    }

    Ok(value)
}
