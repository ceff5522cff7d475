//! Conversion from trip planner DTOs to domain types.
//!
//! Converters are pure functions over `serde_json::Value` fragments. Soft
//! anomalies (a mistyped optional field, an unparseable timestamp) degrade
//! to `None`; entries that cannot be assembled at all are returned as
//! `ParseError` and skipped by the list converters with a warning. A
//! location without an id fails the whole list instead.

mod alert;
mod fare;
mod journey;
mod location;
mod stop_event;

pub use alert::{convert_alert, convert_alerts, subtitle_from_content};
pub use fare::convert_fare;
pub use journey::{JourneyOptions, convert_journey, convert_journeys, convert_leg};
pub use location::{convert_location, convert_locations};
pub use stop_event::{convert_stop_event, convert_stop_events, travel_in_cars_from_properties};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::{CoordOrder, Coordinate, Mode, Operator, Product, Stop, Transport, parse_timestamp};

use super::error::ParseError;
use super::types::{StopDto, TransportationDto, value_as_string};

/// Axis order of every EPSG:4326 endpoint used by the client.
pub const API_COORD_ORDER: CoordOrder = CoordOrder::LatLon;

/// Names the API uses when it has nothing better to say.
const PLACEHOLDER_NAMES: &[&str] = &["unknown"];

/// Deserialize a fragment that must be a JSON object.
pub(crate) fn from_object<T: DeserializeOwned>(
    value: &Value,
    what: &'static str,
) -> Result<T, ParseError> {
    if !value.is_object() {
        return Err(ParseError::Malformed(format!("{what} is not an object")));
    }
    serde_json::from_value(value.clone())
        .map_err(|e| ParseError::Malformed(format!("{what}: {e}")))
}

/// Trimmed, non-blank, non-placeholder text.
pub(crate) fn meaningful(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() || PLACEHOLDER_NAMES.iter().any(|p| s.eq_ignore_ascii_case(p)) {
        None
    } else {
        Some(s.to_string())
    }
}

/// A property rendered as a string, whatever its JSON type.
pub(crate) fn prop_string(props: &Map<String, Value>, key: &str) -> Option<String> {
    props.get(key).and_then(value_as_string)
}

/// A `"1"`/`1` or `"true"`/`true` property flag.
pub(crate) fn prop_flag(props: &Map<String, Value>, key: &str, truthy: &str) -> bool {
    match props.get(key) {
        Some(Value::String(s)) => s.trim() == truthy,
        Some(Value::Number(n)) => truthy == "1" && n.as_i64() == Some(1),
        Some(Value::Bool(b)) => truthy == "true" && *b,
        _ => false,
    }
}

/// Parse a raw `[a, b]` pair in the given order.
pub(crate) fn coordinate_from_value(value: &Value, order: CoordOrder) -> Option<Coordinate> {
    let pair: Vec<f64> = value
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<_>>()?;
    Coordinate::from_pair(&pair, order)
}

/// Build a stop from a leg endpoint, stop sequence entry or event location.
///
/// Leg continuity is checked by id, so a stop without one is an error
/// rather than a stop with an empty id.
pub(crate) fn convert_stop(dto: &StopDto, order: CoordOrder) -> Result<Stop, ParseError> {
    let id = dto
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(ParseError::MissingField("id"))?;
    let props = dto.properties.clone().unwrap_or_default();
    let name = meaningful(dto.name.as_deref())
        .or_else(|| meaningful(dto.disassembled_name.as_deref()))
        .unwrap_or_else(|| id.clone());

    Ok(Stop {
        disassembled_name: meaningful(dto.disassembled_name.as_deref()),
        coord: dto
            .coord
            .as_deref()
            .and_then(|c| Coordinate::from_pair(c, order)),
        departure_planned: dto.departure_time_planned.as_deref().and_then(parse_timestamp),
        departure_estimated: dto.departure_time_estimated.as_deref().and_then(parse_timestamp),
        arrival_planned: dto.arrival_time_planned.as_deref().and_then(parse_timestamp),
        arrival_estimated: dto.arrival_time_estimated.as_deref().and_then(parse_timestamp),
        wheelchair_access: prop_flag(&props, "WheelchairAccess", "true"),
        platform: prop_string(&props, "platformName").or_else(|| prop_string(&props, "platform")),
        properties: props,
        id,
        name,
    })
}

/// Build the transport of a leg or departure.
pub(crate) fn convert_transport(dto: Option<&TransportationDto>) -> Transport {
    let Some(dto) = dto else {
        return Transport::of_mode(Mode::Unknown);
    };

    let product = dto.product.as_ref().map(|p| Product {
        class: p.class,
        name: meaningful(p.name.as_deref()),
        icon_id: p.icon_id,
    });
    let mode = Mode::for_leg(
        product.as_ref().and_then(|p| p.class),
        product.as_ref().and_then(|p| p.name.as_deref()),
    );

    Transport {
        id: dto.id.clone(),
        name: meaningful(dto.name.as_deref()),
        disassembled_name: meaningful(dto.disassembled_name.as_deref()),
        number: meaningful(dto.number.as_deref()),
        mode,
        product,
        destination_name: dto
            .destination
            .as_ref()
            .and_then(|d| meaningful(d.name.as_deref())),
        operator: dto.operator.as_ref().map(|o| Operator {
            id: o.id.clone(),
            code: o.code.clone(),
            name: meaningful(o.name.as_deref()),
        }),
        description: meaningful(dto.description.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stop_dto(value: Value) -> StopDto {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn stop_from_fragment() {
        let dto = stop_dto(json!({
            "id": "2000338",
            "name": "Central Station, Platform 18, Sydney",
            "disassembledName": "Platform 18",
            "coord": [-33.882, 151.206],
            "departureTimePlanned": "2024-03-15T23:00:00Z",
            "departureTimeEstimated": "2024-03-15T23:02:00Z",
            "properties": { "WheelchairAccess": "true", "platformName": "18" }
        }));
        let stop = convert_stop(&dto, API_COORD_ORDER).unwrap();
        assert_eq!(stop.id, "2000338");
        assert_eq!(stop.short_name(), "Platform 18");
        assert_eq!(stop.coord.map(|c| c.latitude()), Some(-33.882));
        assert!(stop.wheelchair_access);
        assert_eq!(stop.platform.as_deref(), Some("18"));
        assert_eq!(stop.departure_delay_minutes(), Some(2));
    }

    #[test]
    fn stop_placeholder_name_falls_back() {
        let dto = stop_dto(json!({ "id": "x1", "name": "Unknown", "disassembledName": " " }));
        let stop = convert_stop(&dto, API_COORD_ORDER).unwrap();
        assert_eq!(stop.name, "x1");
        assert!(stop.disassembled_name.is_none());
        assert!(!stop.wheelchair_access);
    }

    #[test]
    fn stop_bad_timestamp_is_none() {
        let dto = stop_dto(json!({ "id": "1", "arrivalTimePlanned": "soon" }));
        assert!(convert_stop(&dto, API_COORD_ORDER).unwrap().arrival_planned.is_none());
    }

    #[test]
    fn stop_without_id_fails() {
        for value in [json!({ "name": "Central Station" }), json!({ "id": "  ", "name": "Central" })] {
            let err = convert_stop(&stop_dto(value), API_COORD_ORDER).unwrap_err();
            assert_eq!(err, ParseError::MissingField("id"));
        }
    }

    #[test]
    fn transport_mode_from_product() {
        let dto: TransportationDto = serde_json::from_value(json!({
            "id": "nsw:020T1: :H:sj2",
            "name": "Sydney Trains Network T1 North Shore & Western Line",
            "number": "T1",
            "product": { "class": 1, "name": "Sydney Trains Network", "iconId": 1 },
            "destination": { "name": "Hornsby" },
            "operator": { "id": "x0001", "name": "Sydney Trains" }
        }))
        .unwrap();
        let t = convert_transport(Some(&dto));
        assert_eq!(t.mode, Mode::Train);
        assert_eq!(t.number.as_deref(), Some("T1"));
        assert_eq!(t.destination_name.as_deref(), Some("Hornsby"));
        assert_eq!(t.operator_name(), Some("Sydney Trains"));
        assert_eq!(t.product.unwrap().icon_id, Some(1));
    }

    #[test]
    fn transport_absent() {
        assert_eq!(convert_transport(None).mode, Mode::Unknown);
    }

    #[test]
    fn flags() {
        let props = json!({ "a": "1", "b": 1, "c": "0", "d": true, "e": "true" });
        let props = props.as_object().unwrap();
        assert!(prop_flag(props, "a", "1"));
        assert!(prop_flag(props, "b", "1"));
        assert!(!prop_flag(props, "c", "1"));
        assert!(prop_flag(props, "d", "true"));
        assert!(prop_flag(props, "e", "true"));
        assert!(!prop_flag(props, "missing", "1"));
    }

    #[test]
    fn coordinate_values() {
        assert!(coordinate_from_value(&json!([-33.8, 151.2]), API_COORD_ORDER).is_some());
        assert!(coordinate_from_value(&json!([-33.8, "151.2"]), API_COORD_ORDER).is_none());
        assert!(coordinate_from_value(&json!([-33.8]), API_COORD_ORDER).is_none());
        assert!(coordinate_from_value(&json!("x"), API_COORD_ORDER).is_none());
    }

    #[test]
    fn from_object_rejects_non_objects() {
        let r: Result<StopDto, _> = from_object(&json!([1, 2]), "stop");
        assert!(matches!(r, Err(ParseError::Malformed(_))));
    }
}
