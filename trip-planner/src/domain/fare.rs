//! Fare types.

use std::fmt;

/// Passenger category a fare is priced for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PersonCategory {
    #[default]
    Adult,
    Child,
    Senior,
    Concession,
    Scholar,
    /// Any other category string the API returns, upper-cased
    Other(String),
}

impl PersonCategory {
    /// Parse the API's `person` string (case-insensitive).
    ///
    /// ```
    /// use trip_planner::domain::PersonCategory;
    ///
    /// assert_eq!(PersonCategory::from_api("ADULT"), PersonCategory::Adult);
    /// assert_eq!(PersonCategory::from_api("child"), PersonCategory::Child);
    /// assert_eq!(PersonCategory::from_api("Pensioner"), PersonCategory::Other("PENSIONER".into()));
    /// ```
    pub fn from_api(s: &str) -> Self {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "ADULT" => PersonCategory::Adult,
            "CHILD" => PersonCategory::Child,
            "SENIOR" => PersonCategory::Senior,
            "CONCESSION" => PersonCategory::Concession,
            "SCHOLAR" => PersonCategory::Scholar,
            _ => PersonCategory::Other(upper),
        }
    }

    /// The API's string for this category.
    pub fn as_api_str(&self) -> &str {
        match self {
            PersonCategory::Adult => "ADULT",
            PersonCategory::Child => "CHILD",
            PersonCategory::Senior => "SENIOR",
            PersonCategory::Concession => "CONCESSION",
            PersonCategory::Scholar => "SCHOLAR",
            PersonCategory::Other(s) => s,
        }
    }
}

impl fmt::Display for PersonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Whether the fare applies to the journey as planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FareStatus {
    /// The whole journey is covered by the fare system
    Valid,
    /// Only some legs are covered
    PartiallyValid,
    /// The journey is outside the fare system
    NotApplicable,
    Unknown,
}

impl FareStatus {
    /// Map the API's `evaluationTicket` code.
    pub fn from_api(s: &str) -> Self {
        match s {
            "nswFareEnabled" => FareStatus::Valid,
            "nswFarePartiallyEnabled" => FareStatus::PartiallyValid,
            "nswFareNotEnabled" => FareStatus::NotApplicable,
            _ => FareStatus::Unknown,
        }
    }
}

/// A priced fare for one passenger category.
///
/// `None` in place of a `Fare` means pricing is unavailable; it never
/// stands for a free journey.
#[derive(Debug, Clone, PartialEq)]
pub struct Fare {
    pub person: PersonCategory,
    /// Total payable, including any station access fee
    pub price_total: f64,
    /// Ticket price before access fees
    pub ticket_price: f64,
    /// Surcharge for airport or similar stations
    pub station_access_fee: f64,
    pub status: FareStatus,
    pub rider_category_name: Option<String>,
    /// First leg (1-based) the fare covers
    pub from_leg: Option<usize>,
    /// Last leg (1-based) the fare covers
    pub to_leg: Option<usize>,
}

impl Fare {
    /// Returns true if a station access fee is included.
    pub fn has_access_fee(&self) -> bool {
        self.station_access_fee > 0.0
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2} ({})", self.price_total, self.person)
    }
}
