//! Trip planner client error types.

use crate::domain::DomainError;

/// Errors from querying the trip planner.
#[derive(Debug, thiserror::Error)]
pub enum TripPlannerError {
    /// Connectivity failure or timeout
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status, unreadable body or an `error` object in the response
    #[error("API error{}: {message}", status_suffix(.status))]
    Api { status: Option<u16>, message: String },

    /// A response could not be assembled into domain types
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Missing or invalid client configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Query arguments the API cannot be asked about
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" {s}")).unwrap_or_default()
}

impl From<reqwest::Error> for TripPlannerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            TripPlannerError::Network(err.to_string())
        } else {
            TripPlannerError::Api {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

/// Error while assembling a response fragment into domain types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A required field is absent or unusable
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The fragment has the wrong shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The assembled entity violates a domain invariant
    #[error(transparent)]
    Domain(#[from] DomainError),
}
