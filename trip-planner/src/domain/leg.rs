//! Journey leg type.
//!
//! A `Leg` is one continuous segment of a journey: a ride on a single
//! service, or a walk or cycle between two points.

use chrono::Duration;
use serde_json::{Map, Value};

use super::{Coordinate, DomainError, Mode, ServiceAlert, Stop, SydneyTime, Transport};

/// A leg of a journey.
///
/// # Invariants
///
/// - When the origin's estimated departure and the destination's
///   estimated arrival are both known, arrival is not before departure
/// - `duration()` is never negative
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    origin: Stop,
    destination: Stop,
    transport: Transport,
    duration: Duration,
    stop_sequence: Vec<Stop>,
    path: Vec<Coordinate>,
    hints: Vec<String>,
    infos: Vec<ServiceAlert>,
    is_realtime: bool,
    low_floor_vehicle: bool,
    wheelchair_accessible_vehicle: bool,
    properties: Map<String, Value>,
}

impl Leg {
    /// Construct a leg, validating its real-time timestamps.
    ///
    /// The duration is taken from the endpoint times when both are known
    /// and ordered; otherwise `reported_duration` (the API's own figure)
    /// is used, and zero if that is missing too.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the estimated arrival precedes the estimated
    /// departure, or if the reported duration is negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_planner::domain::{parse_timestamp, Leg, Mode, Stop, Transport};
    ///
    /// let mut central = Stop::new("2000338", "Central");
    /// central.departure_planned = parse_timestamp("2024-03-15T10:00:00");
    /// let mut town_hall = Stop::new("2000339", "Town Hall");
    /// town_hall.arrival_planned = parse_timestamp("2024-03-15T10:03:00");
    ///
    /// let leg = Leg::new(central, town_hall, Transport::of_mode(Mode::Train), None).unwrap();
    /// assert_eq!(leg.duration().num_minutes(), 3);
    /// assert_eq!(leg.mode(), Mode::Train);
    /// ```
    pub fn new(
        origin: Stop,
        destination: Stop,
        transport: Transport,
        reported_duration: Option<Duration>,
    ) -> Result<Self, DomainError> {
        if let (Some(dep), Some(arr)) = (origin.departure_estimated, destination.arrival_estimated) {
            if arr < dep {
                return Err(DomainError::InvalidLeg("estimated arrival precedes departure"));
            }
        }
        if reported_duration.is_some_and(|d| d < Duration::zero()) {
            return Err(DomainError::InvalidLeg("negative duration"));
        }

        let from_times = match (origin.departure_time(), destination.arrival_time()) {
            (Some(dep), Some(arr)) if arr >= dep => Some(arr - dep),
            _ => None,
        };
        let duration = from_times
            .or(reported_duration)
            .unwrap_or_else(Duration::zero);

        Ok(Leg {
            origin,
            destination,
            transport,
            duration,
            stop_sequence: Vec::new(),
            path: Vec::new(),
            hints: Vec::new(),
            infos: Vec::new(),
            is_realtime: false,
            low_floor_vehicle: false,
            wheelchair_accessible_vehicle: false,
            properties: Map::new(),
        })
    }

    /// Sets the intermediate stops.
    pub fn with_stop_sequence(mut self, stops: Vec<Stop>) -> Self {
        self.stop_sequence = stops;
        self
    }

    /// Sets the path geometry.
    pub fn with_path(mut self, path: Vec<Coordinate>) -> Self {
        self.path = path;
        self
    }

    /// Sets the textual hints.
    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    /// Sets the alerts attached to this leg.
    pub fn with_infos(mut self, infos: Vec<ServiceAlert>) -> Self {
        self.infos = infos;
        self
    }

    /// Marks the leg as tracked in real time.
    pub fn with_realtime(mut self, is_realtime: bool) -> Self {
        self.is_realtime = is_realtime;
        self
    }

    /// Sets the vehicle accessibility flags.
    pub fn with_vehicle_access(mut self, low_floor: bool, wheelchair: bool) -> Self {
        self.low_floor_vehicle = low_floor;
        self.wheelchair_accessible_vehicle = wheelchair;
        self
    }

    /// Sets the raw properties bag.
    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    /// Returns the canonical mode of this leg.
    pub fn mode(&self) -> Mode {
        self.transport.mode
    }

    pub fn origin(&self) -> &Stop {
        &self.origin
    }

    pub fn destination(&self) -> &Stop {
        &self.destination
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Returns the leg duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Best known departure time from the origin.
    pub fn departure_time(&self) -> Option<SydneyTime> {
        self.origin.departure_time()
    }

    /// Best known arrival time at the destination.
    pub fn arrival_time(&self) -> Option<SydneyTime> {
        self.destination.arrival_time()
    }

    pub fn stop_sequence(&self) -> &[Stop] {
        &self.stop_sequence
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn infos(&self) -> &[ServiceAlert] {
        &self.infos
    }

    /// Returns true if the API reports this leg as real-time controlled.
    pub fn is_realtime(&self) -> bool {
        self.is_realtime
    }

    /// Returns true if a low-floor vehicle is planned.
    pub fn low_floor_vehicle(&self) -> bool {
        self.low_floor_vehicle
    }

    /// Returns true if a wheelchair-accessible vehicle is planned.
    pub fn wheelchair_accessible_vehicle(&self) -> bool {
        self.wheelchair_accessible_vehicle
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Summary label: the mode, or the line for unclassified services.
    pub fn label(&self) -> &str {
        self.transport.label()
    }

    /// Returns true for walking and cycling legs.
    pub fn is_active(&self) -> bool {
        self.mode().is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_timestamp;

    fn stop(id: &str, dep: Option<&str>, arr: Option<&str>) -> Stop {
        let mut s = Stop::new(id, id);
        s.departure_planned = dep.and_then(parse_timestamp);
        s.arrival_planned = arr.and_then(parse_timestamp);
        s
    }

    #[test]
    fn duration_from_times() {
        let leg = Leg::new(
            stop("a", Some("2024-03-15T10:00:00"), None),
            stop("b", None, Some("2024-03-15T10:25:00")),
            Transport::of_mode(Mode::Train),
            Some(Duration::minutes(99)),
        )
        .unwrap();
        assert_eq!(leg.duration(), Duration::minutes(25));
    }

    #[test]
    fn duration_falls_back_to_reported() {
        let leg = Leg::new(
            stop("a", None, None),
            stop("b", None, None),
            Transport::of_mode(Mode::Walk),
            Some(Duration::seconds(300)),
        )
        .unwrap();
        assert_eq!(leg.duration(), Duration::minutes(5));
        assert!(leg.is_active());
    }

    #[test]
    fn disordered_planned_times_use_reported() {
        let leg = Leg::new(
            stop("a", Some("2024-03-15T10:30:00"), None),
            stop("b", None, Some("2024-03-15T10:00:00")),
            Transport::of_mode(Mode::Bus),
            Some(Duration::minutes(7)),
        )
        .unwrap();
        assert_eq!(leg.duration(), Duration::minutes(7));
    }

    #[test]
    fn missing_everything_is_zero() {
        let leg = Leg::new(
            stop("a", None, None),
            stop("b", None, None),
            Transport::of_mode(Mode::Walk),
            None,
        )
        .unwrap();
        assert_eq!(leg.duration(), Duration::zero());
    }

    #[test]
    fn estimated_arrival_before_departure_rejected() {
        let mut origin = stop("a", None, None);
        origin.departure_estimated = parse_timestamp("2024-03-15T10:10:00");
        let mut dest = stop("b", None, None);
        dest.arrival_estimated = parse_timestamp("2024-03-15T10:05:00");

        let result = Leg::new(origin, dest, Transport::of_mode(Mode::Train), None);
        assert!(matches!(result, Err(DomainError::InvalidLeg(_))));
    }

    #[test]
    fn negative_reported_duration_rejected() {
        let result = Leg::new(
            stop("a", None, None),
            stop("b", None, None),
            Transport::of_mode(Mode::Walk),
            Some(Duration::seconds(-1)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn builders_set_fields() {
        let leg = Leg::new(
            stop("a", None, None),
            stop("b", None, None),
            Transport::of_mode(Mode::Bus),
            None,
        )
        .unwrap()
        .with_realtime(true)
        .with_vehicle_access(true, false)
        .with_hints(vec!["Opal cards accepted".into()]);

        assert!(leg.is_realtime());
        assert!(leg.low_floor_vehicle());
        assert!(!leg.wheelchair_accessible_vehicle());
        assert_eq!(leg.hints(), ["Opal cards accepted".to_string()]);
        assert_eq!(leg.label(), "Bus");
    }
}
