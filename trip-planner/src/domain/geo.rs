//! Geographic coordinates.

use std::fmt;

/// Axis order of a raw `[a, b]` coordinate pair.
///
/// The API is not consistent across endpoints, so every caller states the
/// ordering it expects instead of relying on a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordOrder {
    /// `[latitude, longitude]`
    #[default]
    LatLon,
    /// `[longitude, latitude]`
    LonLat,
}

/// A WGS84 position in decimal degrees.
///
/// Both components are finite and within geographic bounds by
/// construction; there is no partially-valid coordinate.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::{Coordinate, CoordOrder};
///
/// let quay = Coordinate::from_pair(&[-33.861, 151.211], CoordOrder::LatLon).unwrap();
/// assert_eq!(quay.latitude(), -33.861);
///
/// // Out of range latitude is rejected
/// assert!(Coordinate::new(91.0, 151.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, returning `None` when out of bounds.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        (lat_ok && lon_ok).then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate from a raw two-element pair in the given order.
    ///
    /// Pairs with any other number of elements are rejected.
    pub fn from_pair(pair: &[f64], order: CoordOrder) -> Option<Self> {
        let [a, b] = pair else {
            return None;
        };
        match order {
            CoordOrder::LatLon => Self::new(*a, *b),
            CoordOrder::LonLat => Self::new(*b, *a),
        }
    }

    /// Returns the latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Render in the request form `"lon:lat:EPSG:4326"` with six decimals.
    ///
    /// ```
    /// use trip_planner::domain::Coordinate;
    ///
    /// let c = Coordinate::new(-33.865143, 151.2099).unwrap();
    /// assert_eq!(c.to_api_string(), "151.209900:-33.865143:EPSG:4326");
    /// ```
    pub fn to_api_string(&self) -> String {
        format!("{:.6}:{:.6}:EPSG:4326", self.longitude, self.latitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
