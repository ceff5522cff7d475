//! Domain error types.
//!
//! These errors represent invariant violations while assembling domain
//! entities. They are distinct from transport and parsing errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Journey has no legs
    #[error("journey must have at least one leg")]
    EmptyJourney,

    /// Consecutive legs don't meet at the same location
    #[error("legs are not connected: arrived at {arrived_at}, next leg departs {departs_from}")]
    LegsNotConnected {
        arrived_at: String,
        departs_from: String,
    },

    /// Invalid leg construction (e.g., arrives before it departs)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),
}
