//! Departure board assembly.

use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::{
    CoordOrder, StopEvent, SydneyTime, TravelInCars, minutes_until, parse_timestamp,
};
use crate::tfnsw::error::ParseError;
use crate::tfnsw::types::StopEventDto;

use super::{convert_stop, convert_transport, from_object, meaningful, prop_string};

/// Convert one departure board entry.
///
/// `now` is the reference time `minutes_until_departure` is computed
/// against; departures already gone yield negative minutes.
///
/// # Errors
///
/// Returns `MissingField("location")` if the event has no location, or
/// `MissingField("id")` if the location has no id.
pub fn convert_stop_event(
    value: &Value,
    now: &SydneyTime,
    order: CoordOrder,
) -> Result<StopEvent, ParseError> {
    let dto: StopEventDto = from_object(value, "stop event")?;
    let location_dto = dto.location.ok_or(ParseError::MissingField("location"))?;
    let location = convert_stop(&location_dto, order)?;

    let departure_planned = dto
        .departure_time_planned
        .as_deref()
        .and_then(parse_timestamp)
        .or(location.departure_planned);
    let departure_estimated = dto
        .departure_time_estimated
        .as_deref()
        .and_then(parse_timestamp)
        .or(location.departure_estimated);

    let is_realtime = dto.is_realtime_controlled.unwrap_or(false) && departure_estimated.is_some();
    let minutes_until_departure = departure_estimated
        .or(departure_planned)
        .map(|t| minutes_until(&t, now));

    let onward = dto
        .onward_locations
        .iter()
        .filter_map(|l| l.get("properties").and_then(Value::as_object));
    let travel_in_cars = std::iter::once(&location.properties)
        .chain(onward)
        .filter_map(travel_in_cars_from_properties)
        .collect();

    Ok(StopEvent {
        location,
        transport: convert_transport(dto.transportation.as_ref()),
        departure_planned,
        departure_estimated,
        is_realtime,
        minutes_until_departure,
        travel_in_cars,
    })
}

/// Convert a departure board, skipping entries that fail.
pub fn convert_stop_events(values: &[Value], now: &SydneyTime, order: CoordOrder) -> Vec<StopEvent> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match convert_stop_event(value, now, order) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(index, error = %e, "skipping stop event");
                None
            }
        })
        .collect()
}

/// Read train car guidance from a stop's properties.
///
/// Returns `None` when the properties carry no car count, or when the
/// guidance is malformed (non-numeric, or a car range outside the train).
/// A missing range means the whole train.
pub fn travel_in_cars_from_properties(props: &Map<String, Value>) -> Option<TravelInCars> {
    let number = |keys: [&str; 2]| -> Option<Option<u32>> {
        match keys.iter().find_map(|k| prop_string(props, k)) {
            Some(raw) => raw.parse().ok().map(Some),
            None => Some(None),
        }
    };

    let number_of_cars = number(["NumberOfCars", "numberOfCars"])??;
    let from_car = number(["TravelInCarsFrom", "travelInCarsFrom"])?.unwrap_or(1);
    let to_car = number(["TravelInCarsTo", "travelInCarsTo"])?.unwrap_or(number_of_cars);

    if number_of_cars == 0 || from_car == 0 || from_car > to_car || to_car > number_of_cars {
        return None;
    }

    let message = ["TravelInCarsMessage", "travelInCarsMessage"]
        .iter()
        .find_map(|k| meaningful(props.get(*k).and_then(Value::as_str)));

    Some(TravelInCars {
        number_of_cars,
        from_car,
        to_car,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mode;
    use crate::tfnsw::convert::API_COORD_ORDER;
    use serde_json::json;

    fn now() -> SydneyTime {
        parse_timestamp("2024-03-15T10:00:00").unwrap()
    }

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn departed_five_minutes_ago() {
        let event = convert_stop_event(
            &json!({
                "location": { "id": "2000338", "name": "Central Station, Platform 18" },
                "departureTimePlanned": "2024-03-15T09:55:00",
                "transportation": { "number": "T1", "product": { "class": 1 } }
            }),
            &now(),
            API_COORD_ORDER,
        )
        .unwrap();
        assert_eq!(event.minutes_until_departure, Some(-5));
        assert!(event.has_departed());
        assert!(!event.is_realtime);
        assert_eq!(event.transport.mode, Mode::Train);
    }

    #[test]
    fn realtime_requires_flag_and_estimate() {
        let flagged_without_estimate = convert_stop_event(
            &json!({
                "location": { "id": "1" },
                "departureTimePlanned": "2024-03-15T10:05:00",
                "isRealtimeControlled": true
            }),
            &now(),
            API_COORD_ORDER,
        )
        .unwrap();
        assert!(!flagged_without_estimate.is_realtime);

        let estimate_without_flag = convert_stop_event(
            &json!({
                "location": { "id": "1" },
                "departureTimePlanned": "2024-03-15T10:05:00",
                "departureTimeEstimated": "2024-03-15T10:07:00"
            }),
            &now(),
            API_COORD_ORDER,
        )
        .unwrap();
        assert!(!estimate_without_flag.is_realtime);
        assert_eq!(estimate_without_flag.minutes_until_departure, Some(7));

        let both = convert_stop_event(
            &json!({
                "location": { "id": "1" },
                "departureTimeEstimated": "2024-03-15T10:07:00",
                "isRealtimeControlled": true
            }),
            &now(),
            API_COORD_ORDER,
        )
        .unwrap();
        assert!(both.is_realtime);
    }

    #[test]
    fn times_fall_back_to_location() {
        let event = convert_stop_event(
            &json!({ "location": { "id": "1", "departureTimePlanned": "2024-03-15T10:30:00" } }),
            &now(),
            API_COORD_ORDER,
        )
        .unwrap();
        assert_eq!(event.minutes_until_departure, Some(30));
    }

    #[test]
    fn no_times_no_minutes() {
        let event =
            convert_stop_event(&json!({ "location": { "id": "1" } }), &now(), API_COORD_ORDER)
                .unwrap();
        assert_eq!(event.minutes_until_departure, None);
        assert!(!event.has_departed());
    }

    #[test]
    fn missing_location_fails() {
        let err = convert_stop_event(&json!({}), &now(), API_COORD_ORDER).unwrap_err();
        assert_eq!(err, ParseError::MissingField("location"));
    }

    #[test]
    fn location_without_id_fails() {
        let err = convert_stop_event(
            &json!({ "location": { "name": "Central Station" } }),
            &now(),
            API_COORD_ORDER,
        )
        .unwrap_err();
        assert_eq!(err, ParseError::MissingField("id"));
    }

    #[test]
    fn car_guidance_from_location_and_onward() {
        let event = convert_stop_event(
            &json!({
                "location": { "id": "1", "properties": {
                    "NumberOfCars": "8", "TravelInCarsFrom": "1", "TravelInCarsTo": "4",
                    "TravelInCarsMessage": "Travel in the front 4 cars"
                } },
                "onwardLocations": [
                    { "id": "2", "properties": { "numberOfCars": 8 } },
                    { "id": "3", "properties": { "NumberOfCars": "lots" } },
                    { "id": "4" }
                ]
            }),
            &now(),
            API_COORD_ORDER,
        )
        .unwrap();
        assert_eq!(event.travel_in_cars.len(), 2);
        assert_eq!(event.travel_in_cars[0].to_car, 4);
        assert_eq!(
            event.travel_in_cars[0].message.as_deref(),
            Some("Travel in the front 4 cars")
        );
        assert!(event.travel_in_cars[1].is_whole_train());
    }

    #[test]
    fn car_guidance_rejects_bad_ranges() {
        assert!(travel_in_cars_from_properties(&props(json!({}))).is_none());
        assert!(
            travel_in_cars_from_properties(&props(
                json!({ "NumberOfCars": "4", "TravelInCarsTo": "6" })
            ))
            .is_none()
        );
        assert!(
            travel_in_cars_from_properties(&props(
                json!({ "NumberOfCars": "4", "TravelInCarsFrom": "x" })
            ))
            .is_none()
        );
        assert!(travel_in_cars_from_properties(&props(json!({ "NumberOfCars": "0" }))).is_none());
    }

    #[test]
    fn list_skips_bad() {
        let events = convert_stop_events(
            &[json!({ "location": { "id": "1" } }), json!([]), json!({})],
            &now(),
            API_COORD_ORDER,
        );
        assert_eq!(events.len(), 1);
    }
}
