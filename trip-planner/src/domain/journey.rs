//! Journey types.
//!
//! A `Journey` is one complete itinerary returned by the trip planner,
//! from origin to destination, as an ordered chain of legs.

use chrono::Duration;

use super::{DomainError, Fare, Leg, Mode, SydneyTime};

/// Separator between leg labels in [`Journey::summary`].
pub const SUMMARY_SEPARATOR: &str = " → ";

/// A complete journey from origin to destination.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (destination of one = origin of next)
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    legs: Vec<Leg>,
    fare: Option<Fare>,
}

impl Journey {
    /// Constructs a journey from legs, checking continuity.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - The legs list is empty
    /// - A leg's destination stop differs from the next leg's origin
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_planner::domain::{Journey, Leg, Mode, Stop, Transport};
    ///
    /// let train = Leg::new(
    ///     Stop::new("a", "Central"),
    ///     Stop::new("b", "Circular Quay"),
    ///     Transport::of_mode(Mode::Train),
    ///     None,
    /// ).unwrap();
    /// let walk = Leg::new(
    ///     Stop::new("b", "Circular Quay"),
    ///     Stop::new("c", "Opera House"),
    ///     Transport::of_mode(Mode::Walk),
    ///     None,
    /// ).unwrap();
    ///
    /// let journey = Journey::new(vec![train, walk]).unwrap();
    /// assert_eq!(journey.summary(), "Train → Walk");
    /// assert_eq!(journey.change_count(), 0);
    /// ```
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyJourney);
        }

        for window in legs.windows(2) {
            let arrived_at = &window[0].destination().id;
            let departs_from = &window[1].origin().id;
            if arrived_at != departs_from {
                return Err(DomainError::LegsNotConnected {
                    arrived_at: arrived_at.clone(),
                    departs_from: departs_from.clone(),
                });
            }
        }

        Ok(Journey { legs, fare: None })
    }

    /// Attaches the fare for the requested passenger category.
    pub fn with_fare(mut self, fare: Option<Fare>) -> Self {
        self.fare = fare;
        self
    }

    /// Returns the legs in travel order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the number of legs.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns the number of changes between services.
    ///
    /// Walking and cycling legs are not services.
    pub fn change_count(&self) -> usize {
        self.legs
            .iter()
            .filter(|leg| !leg.is_active())
            .count()
            .saturating_sub(1)
    }

    /// First leg's departure time.
    pub fn departure_time(&self) -> Option<SydneyTime> {
        self.legs.first().and_then(Leg::departure_time)
    }

    /// Last leg's arrival time.
    pub fn arrival_time(&self) -> Option<SydneyTime> {
        self.legs.last().and_then(Leg::arrival_time)
    }

    /// Total journey duration.
    ///
    /// Arrival minus departure when both are known and ordered, otherwise
    /// the sum of the leg durations.
    pub fn total_duration(&self) -> Duration {
        match (self.departure_time(), self.arrival_time()) {
            (Some(dep), Some(arr)) if arr >= dep => arr - dep,
            _ => self
                .legs
                .iter()
                .fold(Duration::zero(), |acc, leg| acc + leg.duration()),
        }
    }

    /// Total time spent walking.
    pub fn walking_duration(&self) -> Duration {
        self.legs
            .iter()
            .filter(|leg| leg.mode() == Mode::Walk)
            .fold(Duration::zero(), |acc, leg| acc + leg.duration())
    }

    /// Leg labels joined in order, e.g. `"Train → Walk → Ferry"`.
    ///
    /// Repeated modes are kept so the summary reflects each leg.
    pub fn summary(&self) -> String {
        self.legs
            .iter()
            .map(Leg::label)
            .collect::<Vec<_>>()
            .join(SUMMARY_SEPARATOR)
    }

    /// The fare for this journey, or `None` when pricing is unavailable.
    pub fn fare_summary(&self) -> Option<&Fare> {
        self.fare.as_ref()
    }

    /// Returns true if any leg is tracked in real time.
    pub fn has_realtime(&self) -> bool {
        self.legs.iter().any(Leg::is_realtime)
    }

    /// Returns true if the journey is a single service with no walking.
    pub fn is_direct(&self) -> bool {
        self.legs.len() == 1 && !self.legs[0].is_active()
    }
}
