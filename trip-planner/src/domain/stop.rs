//! A stop as visited by a leg or departure.

use serde_json::{Map, Value};

use super::{Coordinate, SydneyTime};

/// A stop, platform or point a leg passes through.
///
/// Timestamps are each optional: the origin of a leg has no arrival, a
/// timetabled-only service has no estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Stop identifier (may be empty for address-like points)
    pub id: String,
    pub name: String,
    pub disassembled_name: Option<String>,
    pub coord: Option<Coordinate>,
    pub departure_planned: Option<SydneyTime>,
    pub departure_estimated: Option<SydneyTime>,
    pub arrival_planned: Option<SydneyTime>,
    pub arrival_estimated: Option<SydneyTime>,
    /// Step-free access at this stop
    pub wheelchair_access: bool,
    /// Platform or stand name, when known
    pub platform: Option<String>,
    pub properties: Map<String, Value>,
}

impl Stop {
    /// Creates a stop with no timing information.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            disassembled_name: None,
            coord: None,
            departure_planned: None,
            departure_estimated: None,
            arrival_planned: None,
            arrival_estimated: None,
            wheelchair_access: false,
            platform: None,
            properties: Map::new(),
        }
    }

    /// Best known departure time: estimated if present, else planned.
    pub fn departure_time(&self) -> Option<SydneyTime> {
        self.departure_estimated.or(self.departure_planned)
    }

    /// Best known arrival time: estimated if present, else planned.
    pub fn arrival_time(&self) -> Option<SydneyTime> {
        self.arrival_estimated.or(self.arrival_planned)
    }

    /// Departure delay in whole minutes, when both times are known.
    pub fn departure_delay_minutes(&self) -> Option<i64> {
        let est = self.departure_estimated?;
        let plan = self.departure_planned?;
        Some((est - plan).num_minutes())
    }

    /// Short display name, falling back to the full name.
    pub fn short_name(&self) -> &str {
        self.disassembled_name.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_timestamp;

    #[test]
    fn estimated_wins() {
        let mut s = Stop::new("2000338", "Central Station");
        s.departure_planned = parse_timestamp("2024-03-15T10:00:00");
        assert_eq!(s.departure_time(), s.departure_planned);

        s.departure_estimated = parse_timestamp("2024-03-15T10:03:00");
        assert_eq!(s.departure_time(), s.departure_estimated);
        assert_eq!(s.departure_delay_minutes(), Some(3));
    }

    #[test]
    fn arrival_fallback() {
        let mut s = Stop::new("1", "Town Hall");
        assert_eq!(s.arrival_time(), None);
        s.arrival_planned = parse_timestamp("2024-03-15T10:05:00");
        assert_eq!(s.arrival_time(), s.arrival_planned);
        assert_eq!(s.departure_delay_minutes(), None);
    }

    #[test]
    fn short_name() {
        let mut s = Stop::new("1", "Central Station, Platform 16, Sydney");
        assert_eq!(s.short_name(), "Central Station, Platform 16, Sydney");
        s.disassembled_name = Some("Platform 16".into());
        assert_eq!(s.short_name(), "Platform 16");
    }
}
