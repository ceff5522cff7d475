//! TfNSW trip planner API client.
//!
//! The API is an EFA backend answering in "rapidJSON". Responses are loose:
//! optional fields go missing or change type between releases, and list
//! entries are occasionally malformed. This module turns them into the
//! typed model in [`crate::domain`].
//!
//! Layers, leaf first:
//! - `types`: lenient serde DTOs mirroring the JSON
//! - [`convert`]: pure converters from DTO fragments to domain types
//! - `client` / `mock`: transports that fetch raw JSON documents
//! - `query`: [`TripPlanner`], which ties a transport to the converters

mod client;
pub mod convert;
mod error;
mod mock;
mod query;
pub mod types;

pub use client::{ApiTransport, DEFAULT_BASE_URL, Endpoint, HttpTransport, TripPlannerConfig};
pub use convert::JourneyOptions;
pub use error::{ParseError, TripPlannerError};
pub use mock::{FixtureTransport, RecordedRequest};
pub use query::{
    CyclingOptions, DEFAULT_MAX_RESULTS, OPAL_RESELLER_DRAW_CLASS, TripPlanner, TripRequest,
};
