//! Query operations over a trip planner transport.
//!
//! Each operation issues exactly one request, then threads the response
//! through the converters. Request parameters follow the TfNSW Open Data
//! conventions for each endpoint.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::{
    Coordinate, CyclingProfile, Journey, Location, LocationKind, PersonCategory, ServiceAlert,
    StopEvent, SydneyTime, alert_date, itd_date, itd_time, now_sydney,
};
use crate::matching;

use super::client::{ApiTransport, Endpoint, HttpTransport, TripPlannerConfig};
use super::convert::{
    API_COORD_ORDER, JourneyOptions, convert_alerts, convert_journeys, convert_locations,
    convert_stop_events, from_object,
};
use super::error::TripPlannerError;
use super::types::{AddInfoResponse, DepartureResponse, LocationsResponse, TripResponse};

/// Default number of stop search results.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Draw class of Opal card resellers in coordinate searches.
pub const OPAL_RESELLER_DRAW_CLASS: u32 = 74;

/// Default search radius for Opal resellers, in metres.
const OPAL_RESELLER_RADIUS_M: u32 = 1000;

/// Default `type_1` filter for coordinate searches.
const DEFAULT_NEARBY_TYPE: &str = "GIS_POINT";

/// Kind filters are applied client-side, so ask for this many times more.
const KIND_FILTER_OVERFETCH: usize = 5;

/// Parameters of a cycling trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclingOptions {
    pub profile: CyclingProfile,
    /// Cycle the whole way rather than combining the bike with transit
    pub bike_only: bool,
    pub max_time_minutes: u32,
    pub speed_kmh: u32,
}

impl Default for CyclingOptions {
    fn default() -> Self {
        Self {
            profile: CyclingProfile::default(),
            bike_only: true,
            max_time_minutes: 240,
            speed_kmh: 16,
        }
    }
}

/// A trip planning request.
///
/// ```
/// use trip_planner::domain::{LocationKind, PersonCategory};
/// use trip_planner::tfnsw::TripRequest;
///
/// let request = TripRequest::new("10101331", "10102027")
///     .arriving_by()
///     .with_wheelchair()
///     .with_person(PersonCategory::Child);
///
/// assert!(request.arrive_by);
/// assert_eq!(request.origin_kind, LocationKind::Stop);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    /// Stop id, or a coordinate in API form when `origin_kind` is `Coordinate`
    pub origin: String,
    pub origin_kind: LocationKind,
    pub destination: String,
    pub destination_kind: LocationKind,
    /// Search time; the planner's clock when absent
    pub when: Option<SydneyTime>,
    /// Treat `when` as the latest arrival rather than the earliest departure
    pub arrive_by: bool,
    /// Ask for real-time estimates
    pub realtime: bool,
    /// Only wheelchair-accessible journeys
    pub wheelchair: bool,
    /// Fare category for the fare summary
    pub person: PersonCategory,
    /// Keep only the ends of each leg's stop sequence
    pub aggregate_stop_sequence: bool,
    pub cycling: Option<CyclingOptions>,
}

impl TripRequest {
    /// Departing now, stop to stop, with real-time data.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            origin_kind: LocationKind::Stop,
            destination: destination.into(),
            destination_kind: LocationKind::Stop,
            when: None,
            arrive_by: false,
            realtime: true,
            wheelchair: false,
            person: PersonCategory::Adult,
            aggregate_stop_sequence: false,
            cycling: None,
        }
    }

    /// Start from a coordinate instead of a stop.
    pub fn from_coordinate(coord: Coordinate, destination: impl Into<String>) -> Self {
        let mut request = Self::new(coord.to_api_string(), destination);
        request.origin_kind = LocationKind::Coordinate;
        request
    }

    pub fn at(mut self, when: SydneyTime) -> Self {
        self.when = Some(when);
        self
    }

    pub fn arriving_by(mut self) -> Self {
        self.arrive_by = true;
        self
    }

    pub fn with_wheelchair(mut self) -> Self {
        self.wheelchair = true;
        self
    }

    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn with_person(mut self, person: PersonCategory) -> Self {
        self.person = person;
        self
    }

    pub fn with_cycling(mut self, cycling: CyclingOptions) -> Self {
        self.cycling = Some(cycling);
        self
    }

    fn journey_options(&self) -> JourneyOptions {
        JourneyOptions {
            aggregate_stop_sequence: self.aggregate_stop_sequence,
            person: self.person.clone(),
            coord_order: API_COORD_ORDER,
        }
    }
}

type Clock = Arc<dyn Fn() -> SydneyTime + Send + Sync>;

/// Trip planner client.
///
/// Cheap to clone; clones share the transport.
pub struct TripPlanner<T = HttpTransport> {
    transport: Arc<T>,
    clock: Clock,
}

impl<T> Clone for TripPlanner<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TripPlanner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripPlanner")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl TripPlanner<HttpTransport> {
    /// Create a client talking to the live API.
    pub fn new(config: TripPlannerConfig) -> Result<Self, TripPlannerError> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: ApiTransport> TripPlanner<T> {
    /// Create a client over any transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            clock: Arc::new(now_sydney),
        }
    }

    /// Replace the clock used for default search times and for
    /// minutes-until-departure.
    pub fn with_clock(mut self, clock: impl Fn() -> SydneyTime + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<R, TripPlannerError> {
        let value: Value = self.transport.get(endpoint, params).await?;
        Ok(from_object(&value, "response")?)
    }

    // --- Stop finder ---

    /// Search stops, places and addresses by name.
    ///
    /// Results keep the API's relevance order. With a `kind` filter, more
    /// results are requested and filtered locally, since the API returns
    /// nothing for typed free-text queries.
    pub async fn find_stop(
        &self,
        query: &str,
        kind: Option<LocationKind>,
        max_results: usize,
    ) -> Result<Vec<Location>, TripPlannerError> {
        let hit_list = match kind {
            Some(_) => max_results.saturating_mul(KIND_FILTER_OVERFETCH),
            None => max_results,
        };
        let params = [
            ("type_sf", "any".to_string()),
            ("name_sf", query.to_string()),
            ("anyMaxSizeHitList", hit_list.max(1).to_string()),
            ("TfNSWSF", "true".to_string()),
            ("odvSugMacro", "1".to_string()),
        ];

        let response: LocationsResponse = self.fetch(Endpoint::StopFinder, &params).await?;
        let locations = matching::select(
            convert_locations(&response.locations, API_COORD_ORDER)?,
            kind,
            max_results,
        );
        debug!(query, count = locations.len(), "stop search");
        Ok(locations)
    }

    /// The single best match for a search, or `None` when nothing matches.
    pub async fn best_stop(&self, query: &str) -> Result<Option<Location>, TripPlannerError> {
        let locations = self.find_stop(query, None, DEFAULT_MAX_RESULTS).await?;
        Ok(matching::best(locations))
    }

    /// Look up a stop by id.
    ///
    /// Prefers a result whose id matches exactly, falling back to the first
    /// stop the search returns.
    pub async fn find_stop_by_id(&self, stop_id: &str) -> Result<Option<Location>, TripPlannerError> {
        let mut stops = self
            .find_stop(stop_id, Some(LocationKind::Stop), DEFAULT_MAX_RESULTS)
            .await?;
        let index = stops.iter().position(|s| s.id == stop_id).unwrap_or(0);
        Ok((index < stops.len()).then(|| stops.swap_remove(index)))
    }

    // --- Trip planning ---

    /// Plan a trip between two stops.
    pub async fn plan_trip(
        &self,
        origin_id: &str,
        destination_id: &str,
        when: Option<SydneyTime>,
        arrive_by: bool,
        wheelchair: bool,
    ) -> Result<Vec<Journey>, TripPlannerError> {
        let mut request = TripRequest::new(origin_id, destination_id);
        request.when = when;
        request.arrive_by = arrive_by;
        request.wheelchair = wheelchair;
        self.plan_trip_with(&request).await
    }

    /// Plan a trip from a GPS position to a stop.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the position is not a valid coordinate.
    pub async fn plan_trip_from_coordinate(
        &self,
        latitude: f64,
        longitude: f64,
        destination_id: &str,
        when: Option<SydneyTime>,
    ) -> Result<Vec<Journey>, TripPlannerError> {
        let coord = checked_coordinate(latitude, longitude)?;
        let mut request = TripRequest::from_coordinate(coord, destination_id);
        request.when = when;
        self.plan_trip_with(&request).await
    }

    /// Plan a cycling trip, alone or combined with transit.
    pub async fn plan_cycling_trip(
        &self,
        origin_id: &str,
        destination_id: &str,
        profile: CyclingProfile,
        bike_only: bool,
    ) -> Result<Vec<Journey>, TripPlannerError> {
        let request = TripRequest::new(origin_id, destination_id).with_cycling(CyclingOptions {
            profile,
            bike_only,
            ..CyclingOptions::default()
        });
        self.plan_trip_with(&request).await
    }

    /// Plan a trip with full control over the request.
    ///
    /// Journeys that cannot be assembled are dropped with a warning.
    pub async fn plan_trip_with(
        &self,
        request: &TripRequest,
    ) -> Result<Vec<Journey>, TripPlannerError> {
        let when = request.when.unwrap_or_else(|| (self.clock)());
        let mut params = vec![
            ("depArrMacro", if request.arrive_by { "arr" } else { "dep" }.to_string()),
            ("itdDate", itd_date(&when)),
            ("itdTime", itd_time(&when)),
            ("type_origin", request.origin_kind.as_api_str().to_string()),
            ("name_origin", request.origin.clone()),
            ("type_destination", request.destination_kind.as_api_str().to_string()),
            ("name_destination", request.destination.clone()),
            ("TfNSWTR", request.realtime.to_string()),
        ];
        if request.wheelchair {
            params.push(("wheelchair", "on".to_string()));
        }
        if let Some(cycling) = &request.cycling {
            params.extend([
                ("cycleSpeed", cycling.speed_kmh.to_string()),
                ("computeMonomodalTripBicycle", u8::from(cycling.bike_only).to_string()),
                ("maxTimeBicycle", cycling.max_time_minutes.to_string()),
                ("onlyITBicycle", "1".to_string()),
                ("useElevationData", "1".to_string()),
                ("bikeProfSpeed", cycling.profile.as_api_str().to_string()),
                ("elevFac", cycling.profile.elevation_factor().to_string()),
            ]);
        }

        let response: TripResponse = self.fetch(Endpoint::Trip, &params).await?;
        let journeys = convert_journeys(&response.journeys, &request.journey_options());
        info!(
            origin = %request.origin,
            destination = %request.destination,
            received = response.journeys.len(),
            kept = journeys.len(),
            "trip planned"
        );
        Ok(journeys)
    }

    // --- Departures ---

    /// Departure board for a stop, or one of its platforms.
    ///
    /// Minutes until departure are computed against the planner's clock, and
    /// departures already gone are kept with negative minutes.
    pub async fn get_departures(
        &self,
        stop_id: &str,
        platform_id: Option<&str>,
        when: Option<SydneyTime>,
    ) -> Result<Vec<StopEvent>, TripPlannerError> {
        let now = (self.clock)();
        let when = when.unwrap_or(now);
        let mut params = vec![
            ("mode", "direct".to_string()),
            ("type_dm", "stop".to_string()),
            ("name_dm", platform_id.unwrap_or(stop_id).to_string()),
            ("depArrMacro", "dep".to_string()),
            ("itdDate", itd_date(&when)),
            ("itdTime", itd_time(&when)),
            ("TfNSWDM", "true".to_string()),
        ];
        if platform_id.is_some() {
            params.push(("nameKey_dm", "$USEPOINT$".to_string()));
        }

        let response: DepartureResponse = self.fetch(Endpoint::DepartureMon, &params).await?;
        let events = convert_stop_events(&response.stop_events, &now, API_COORD_ORDER);
        debug!(stop_id, count = events.len(), "departures");
        Ok(events)
    }

    // --- Service alerts ---

    /// Current service alerts, optionally only those relevant to a stop.
    pub async fn get_alerts(
        &self,
        stop_id: Option<&str>,
    ) -> Result<Vec<ServiceAlert>, TripPlannerError> {
        self.get_alerts_with(stop_id, None, true).await
    }

    /// Service alerts valid on a date, optionally including past alerts.
    ///
    /// With a stop, alerts listing other stops are removed; alerts listing no
    /// stops at all are kept.
    pub async fn get_alerts_with(
        &self,
        stop_id: Option<&str>,
        when: Option<SydneyTime>,
        current_only: bool,
    ) -> Result<Vec<ServiceAlert>, TripPlannerError> {
        let when = when.unwrap_or_else(|| (self.clock)());
        let mut params = vec![("filterDateValid", alert_date(&when))];
        if current_only {
            params.push(("filterPublicationStatus", "current".to_string()));
        }
        if let Some(stop) = stop_id {
            params.push(("itdLPxx_selStop", stop.to_string()));
        }

        let response: AddInfoResponse = self.fetch(Endpoint::AddInfo, &params).await?;
        let infos = response.infos.unwrap_or_default();
        let mut alerts = convert_alerts(&infos.current);
        if !current_only {
            alerts.extend(convert_alerts(&infos.previous));
        }
        if let Some(stop) = stop_id {
            alerts.retain(|a| a.applies_to_stop(stop));
        }

        debug!(stop_id, count = alerts.len(), "alerts");
        Ok(alerts)
    }

    // --- Coordinate search ---

    /// Locations within `radius_m` of a point.
    ///
    /// `type_filter` is the API's `type_1` value, `GIS_POINT` when absent.
    pub async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        type_filter: Option<&str>,
    ) -> Result<Vec<Location>, TripPlannerError> {
        self.coord_search(latitude, longitude, radius_m, type_filter, None)
            .await
    }

    /// Opal card resellers near a point, within 1000 m by default.
    pub async fn find_opal_resellers(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: Option<u32>,
    ) -> Result<Vec<Location>, TripPlannerError> {
        self.coord_search(
            latitude,
            longitude,
            radius_m.unwrap_or(OPAL_RESELLER_RADIUS_M),
            None,
            Some(OPAL_RESELLER_DRAW_CLASS),
        )
        .await
    }

    async fn coord_search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        type_filter: Option<&str>,
        draw_class: Option<u32>,
    ) -> Result<Vec<Location>, TripPlannerError> {
        let coord = checked_coordinate(latitude, longitude)?;
        let mut params = vec![
            ("coord", coord.to_api_string()),
            ("type_1", type_filter.unwrap_or(DEFAULT_NEARBY_TYPE).to_string()),
            ("radius_1", radius_m.to_string()),
            ("inclFilter", "1".to_string()),
        ];
        if let Some(class) = draw_class {
            params.push(("inclDrawClasses_1", class.to_string()));
        }

        let response: LocationsResponse = self.fetch(Endpoint::Coord, &params).await?;
        let locations = convert_locations(&response.locations, API_COORD_ORDER)?;
        debug!(%coord, radius_m, count = locations.len(), "coordinate search");
        Ok(locations)
    }
}

fn checked_coordinate(latitude: f64, longitude: f64) -> Result<Coordinate, TripPlannerError> {
    Coordinate::new(latitude, longitude).ok_or_else(|| {
        TripPlannerError::InvalidRequest(format!("coordinate out of range: {latitude}, {longitude}"))
    })
}
