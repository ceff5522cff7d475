//! Client for the Transport for NSW trip planner API.
//!
//! Turns the API's loosely typed "rapidJSON" responses into a validated
//! domain model (locations, journeys, fares, departures, service alerts)
//! and exposes stop search, trip planning, departure board, alert and
//! proximity queries on top of it.

pub mod cache;
pub mod domain;
pub mod matching;
pub mod tfnsw;
