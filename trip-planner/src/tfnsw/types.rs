//! Trip planner response DTOs.
//!
//! These types map onto the rapidJSON responses. The API omits fields
//! freely and occasionally sends them with a different JSON type, so every
//! optional field is deserialized leniently: a value of the wrong shape
//! becomes `None` instead of failing the whole response. Top-level lists
//! are kept as raw `Value`s so each entry can be converted (and skipped)
//! on its own.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Deserialize an optional field, treating a mistyped value as absent.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Deserialize a list, treating anything but an array as empty.
pub(crate) fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

/// Deserialize an identifier that may arrive as a string or a number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| value_as_string(&v)))
}

/// Deserialize a number that may arrive as a numeric string.
pub(crate) fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| value_as_f64(&v)))
}

/// A non-blank string, or a number rendered as a string.
pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A finite number, or a string holding one.
pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Response from `stop_finder` and `coord`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub locations: Vec<Value>,
}

/// Response from `trip`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub journeys: Vec<Value>,
}

/// Response from `departure_mon`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub stop_events: Vec<Value>,
}

/// Response from `add_info`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddInfoResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub infos: Option<InfoLists>,
}

/// Current and historical alert lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoLists {
    #[serde(default, deserialize_with = "lenient_list")]
    pub current: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub previous: Vec<Value>,
}

/// Top-level `error` object some failures carry alongside HTTP 200.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

/// A location from the stop finder or coordinate search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub disassembled_name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub coord: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub modes: Option<Vec<i64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub product_classes: Option<Vec<i64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub match_quality: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent: Option<ParentDto>,
    #[serde(default, deserialize_with = "lenient")]
    pub street_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub building_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<Map<String, Value>>,

    /// Anything not named above; merged into the location's properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An entry in a location's parent chain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent: Option<Box<ParentDto>>,
}

/// A stop on a leg or departure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub disassembled_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub coord: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub departure_time_planned: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub departure_time_estimated: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub arrival_time_planned: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub arrival_time_estimated: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<Map<String, Value>>,
}

/// Product block of a transportation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default, deserialize_with = "lenient")]
    pub class: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon_id: Option<i64>,
}

/// Operator block of a transportation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// Something with just a name, e.g. a headsign destination.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedDto {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// The service operating a leg or departure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportationDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub disassembled_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub product: Option<ProductDto>,
    #[serde(default, deserialize_with = "lenient")]
    pub destination: Option<NamedDto>,
    #[serde(default, deserialize_with = "lenient")]
    pub operator: Option<OperatorDto>,
}

/// One leg of a journey.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    /// Seconds
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub origin: Option<StopDto>,
    #[serde(default, deserialize_with = "lenient")]
    pub destination: Option<StopDto>,
    #[serde(default, deserialize_with = "lenient")]
    pub transportation: Option<TransportationDto>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub stop_sequence: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub coords: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub hints: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub infos: Vec<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_realtime_controlled: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<Map<String, Value>>,
}

/// One journey (itinerary) of a trip response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyDto {
    #[serde(default, deserialize_with = "lenient_list")]
    pub legs: Vec<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub fare: Option<FareDto>,
}

/// Fare block of a journey.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareDto {
    #[serde(default, deserialize_with = "lenient_list")]
    pub tickets: Vec<Value>,
}

/// A priced ticket for one person category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    #[serde(default, deserialize_with = "lenient")]
    pub person: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub price_brutto: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub from_leg: Option<usize>,
    #[serde(default, deserialize_with = "lenient")]
    pub to_leg: Option<usize>,
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<TicketPropertiesDto>,
}

/// Ticket properties carrying totals and the validity code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPropertiesDto {
    #[serde(default, deserialize_with = "number_or_string")]
    pub price_total_fare: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub price_station_access_fee: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub evaluation_ticket: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rider_category_name: Option<String>,
}

/// One entry of a departure board.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopEventDto {
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<StopDto>,
    #[serde(default, deserialize_with = "lenient")]
    pub departure_time_planned: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub departure_time_estimated: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub transportation: Option<TransportationDto>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_realtime_controlled: Option<bool>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub onward_locations: Vec<Value>,
}

/// A service alert.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamps: Option<AlertTimestampsDto>,
    #[serde(default, deserialize_with = "lenient")]
    pub affected: Option<AffectedDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertTimestampsDto {
    #[serde(default, deserialize_with = "lenient")]
    pub last_modification: Option<String>,
}

/// References an alert applies to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedDto {
    #[serde(default, deserialize_with = "lenient_list")]
    pub stops: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub lines: Vec<Value>,
}
