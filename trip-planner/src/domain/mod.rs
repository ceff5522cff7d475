//! Domain types for the trip planner client.
//!
//! This module contains the typed model that raw API responses are
//! assembled into. Types with invariants (`Coordinate`, `Leg`, `Journey`)
//! enforce them at construction time, so code that receives them can
//! trust their validity.

mod alert;
mod error;
mod fare;
mod geo;
mod journey;
mod leg;
mod location;
mod mode;
mod stop;
mod stop_event;
mod time;
mod transport;

pub use alert::ServiceAlert;
pub use error::DomainError;
pub use fare::{Fare, FareStatus, PersonCategory};
pub use geo::{CoordOrder, Coordinate};
pub use journey::{Journey, SUMMARY_SEPARATOR};
pub use leg::Leg;
pub use location::{Location, StopParent};
pub use mode::{CyclingProfile, LocationKind, Mode};
pub use stop::Stop;
pub use stop_event::{StopEvent, TravelInCars, upcoming};
pub use time::{
    SYDNEY, SydneyTime, alert_date, itd_date, itd_time, minutes_until, now_sydney,
    parse_timestamp, to_sydney,
};
pub use transport::{Operator, Product, Transport};
