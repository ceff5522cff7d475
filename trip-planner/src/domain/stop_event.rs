//! Departure board entries.

use super::{Stop, SydneyTime, Transport, minutes_until};

/// Which cars of a train to board at a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelInCars {
    pub number_of_cars: u32,
    /// First car to travel in (1-based)
    pub from_car: u32,
    /// Last car to travel in (1-based)
    pub to_car: u32,
    pub message: Option<String>,
}

impl TravelInCars {
    /// Returns true if the guidance covers the whole train.
    pub fn is_whole_train(&self) -> bool {
        self.from_car <= 1 && self.to_car >= self.number_of_cars
    }
}

/// A single departure from a stop.
#[derive(Debug, Clone, PartialEq)]
pub struct StopEvent {
    /// The stop or platform the service departs from
    pub location: Stop,
    pub transport: Transport,
    pub departure_planned: Option<SydneyTime>,
    pub departure_estimated: Option<SydneyTime>,
    /// Real-time controlled and carrying an estimate
    pub is_realtime: bool,
    /// Minutes from the reference time to departure; negative once departed
    pub minutes_until_departure: Option<i64>,
    /// Car guidance for this and onward stops
    pub travel_in_cars: Vec<TravelInCars>,
}

impl StopEvent {
    /// Best known departure time: estimated if present, else planned.
    pub fn departure_time(&self) -> Option<SydneyTime> {
        self.departure_estimated.or(self.departure_planned)
    }

    /// Minutes until departure relative to another reference time.
    pub fn minutes_until_at(&self, now: &SydneyTime) -> Option<i64> {
        self.departure_time().map(|t| minutes_until(&t, now))
    }

    /// Returns true if the departure time is before the reference time.
    ///
    /// Events without any departure time are never considered departed.
    pub fn has_departed(&self) -> bool {
        self.minutes_until_departure.is_some_and(|m| m < 0)
    }

    /// Departure delay in whole minutes, when both times are known.
    pub fn delay_minutes(&self) -> Option<i64> {
        let est = self.departure_estimated?;
        let plan = self.departure_planned?;
        Some((est - plan).num_minutes())
    }
}

/// Keep only events that have not yet departed, preserving order.
///
/// ```
/// use trip_planner::domain::{upcoming, Mode, Stop, StopEvent, Transport};
///
/// let event = |mins| StopEvent {
///     location: Stop::new("200060", "Central"),
///     transport: Transport::of_mode(Mode::Train),
///     departure_planned: None,
///     departure_estimated: None,
///     is_realtime: false,
///     minutes_until_departure: mins,
///     travel_in_cars: vec![],
/// };
/// let kept = upcoming(vec![event(Some(-5)), event(Some(0)), event(None), event(Some(3))]);
/// assert_eq!(kept.len(), 3);
/// ```
pub fn upcoming(events: impl IntoIterator<Item = StopEvent>) -> Vec<StopEvent> {
    events.into_iter().filter(|e| !e.has_departed()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mode, parse_timestamp};

    fn event(planned: &str, estimated: Option<&str>, now: &str) -> StopEvent {
        let departure_planned = parse_timestamp(planned);
        let departure_estimated = estimated.and_then(parse_timestamp);
        let now = parse_timestamp(now).unwrap();
        let best = departure_estimated.or(departure_planned);
        StopEvent {
            location: Stop::new("2000338", "Central Station, Platform 18"),
            transport: Transport::of_mode(Mode::Train),
            departure_planned,
            departure_estimated,
            is_realtime: departure_estimated.is_some(),
            minutes_until_departure: best.map(|t| minutes_until(&t, &now)),
            travel_in_cars: vec![],
        }
    }

    #[test]
    fn departed_event() {
        let e = event("2024-03-15T09:55:00", None, "2024-03-15T10:00:00");
        assert_eq!(e.minutes_until_departure, Some(-5));
        assert!(e.has_departed());
    }

    #[test]
    fn estimated_drives_minutes() {
        let e = event(
            "2024-03-15T10:00:00",
            Some("2024-03-15T10:04:00"),
            "2024-03-15T10:00:00",
        );
        assert_eq!(e.minutes_until_departure, Some(4));
        assert_eq!(e.delay_minutes(), Some(4));
        assert!(!e.has_departed());
    }

    #[test]
    fn recompute_against_new_reference() {
        let e = event("2024-03-15T10:10:00", None, "2024-03-15T10:00:00");
        let later = parse_timestamp("2024-03-15T10:12:00").unwrap();
        assert_eq!(e.minutes_until_at(&later), Some(-2));
    }

    #[test]
    fn upcoming_filters_departed() {
        let now = "2024-03-15T10:00:00";
        let events = vec![
            event("2024-03-15T09:58:00", None, now),
            event("2024-03-15T10:00:00", None, now),
            event("2024-03-15T10:05:00", None, now),
        ];
        let kept = upcoming(events);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].minutes_until_departure, Some(0));
    }

    #[test]
    fn whole_train_guidance() {
        let all = TravelInCars {
            number_of_cars: 4,
            from_car: 1,
            to_car: 4,
            message: None,
        };
        assert!(all.is_whole_train());
        let front = TravelInCars {
            number_of_cars: 8,
            from_car: 1,
            to_car: 4,
            message: Some("Only the front 4 cars will platform".into()),
        };
        assert!(!front.is_whole_train());
    }
}
