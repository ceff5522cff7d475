//! Leg and journey assembly for trip responses.

use chrono::Duration;
use serde_json::Value;
use tracing::warn;

use crate::domain::{CoordOrder, DomainError, Journey, Leg, PersonCategory, Stop};
use crate::tfnsw::error::ParseError;
use crate::tfnsw::types::{JourneyDto, LegDto, StopDto};

use super::{
    API_COORD_ORDER, convert_alerts, convert_fare, convert_stop, convert_transport,
    coordinate_from_value, from_object, meaningful, prop_flag,
};

/// Options controlling journey assembly.
#[derive(Debug, Clone)]
pub struct JourneyOptions {
    /// Keep only the first and last points of each leg's stop sequence
    pub aggregate_stop_sequence: bool,
    /// Passenger category the fare summary is computed for
    pub person: PersonCategory,
    /// Axis order of coordinates in the response
    pub coord_order: CoordOrder,
}

impl Default for JourneyOptions {
    fn default() -> Self {
        Self {
            aggregate_stop_sequence: false,
            person: PersonCategory::Adult,
            coord_order: API_COORD_ORDER,
        }
    }
}

/// Convert one leg fragment.
///
/// Origin and destination fall back to the ends of the stop sequence when
/// the fragment omits them.
///
/// # Errors
///
/// Returns `MissingField` when no origin or destination can be found or an
/// endpoint has no id, or
/// `Domain` when the leg's real-time timestamps are inconsistent.
pub fn convert_leg(value: &Value, options: &JourneyOptions) -> Result<Leg, ParseError> {
    let dto: LegDto = from_object(value, "leg")?;
    let order = options.coord_order;

    let mut sequence: Vec<Stop> = dto
        .stop_sequence
        .iter()
        .filter_map(|s| from_object::<StopDto>(s, "stop").ok())
        .filter_map(|s| convert_stop(&s, order).ok())
        .collect();

    let origin = match &dto.origin {
        Some(o) => convert_stop(o, order)?,
        None => sequence
            .first()
            .cloned()
            .ok_or(ParseError::MissingField("origin"))?,
    };
    let destination = match &dto.destination {
        Some(d) => convert_stop(d, order)?,
        None => sequence
            .last()
            .cloned()
            .ok_or(ParseError::MissingField("destination"))?,
    };

    if options.aggregate_stop_sequence && sequence.len() > 2 {
        let last = sequence.pop();
        sequence.truncate(1);
        sequence.extend(last);
    }

    let path = dto
        .coords
        .iter()
        .filter_map(|c| coordinate_from_value(c, order))
        .collect();

    let hints = dto
        .hints
        .iter()
        .filter_map(|h| meaningful(h.get("infoText").and_then(Value::as_str)))
        .collect();

    let properties = dto.properties.unwrap_or_default();
    let low_floor = prop_flag(&properties, "PlanLowFloorVehicle", "1");
    let wheelchair = prop_flag(&properties, "PlanWheelChairAccess", "1");

    let leg = Leg::new(
        origin,
        destination,
        convert_transport(dto.transportation.as_ref()),
        dto.duration.map(Duration::seconds),
    )?
    .with_stop_sequence(sequence)
    .with_path(path)
    .with_hints(hints)
    .with_infos(convert_alerts(&dto.infos))
    .with_realtime(dto.is_realtime_controlled.unwrap_or(false))
    .with_vehicle_access(low_floor, wheelchair)
    .with_properties(properties);

    Ok(leg)
}

/// Convert one journey fragment, including its fare summary.
///
/// # Errors
///
/// Returns an error if the journey has no legs, any leg fails to convert,
/// or consecutive legs do not connect.
pub fn convert_journey(value: &Value, options: &JourneyOptions) -> Result<Journey, ParseError> {
    let dto: JourneyDto = from_object(value, "journey")?;
    if dto.legs.is_empty() {
        return Err(DomainError::EmptyJourney.into());
    }

    let legs = dto
        .legs
        .iter()
        .map(|leg| convert_leg(leg, options))
        .collect::<Result<Vec<_>, _>>()?;

    let journey = Journey::new(legs)?;
    Ok(journey.with_fare(convert_fare(dto.fare.as_ref(), &options.person)))
}

/// Convert a trip response's journeys, dropping any that fail.
pub fn convert_journeys(values: &[Value], options: &JourneyOptions) -> Vec<Journey> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match convert_journey(value, options) {
            Ok(journey) => Some(journey),
            Err(e) => {
                warn!(index, error = %e, "dropping journey");
                None
            }
        })
        .collect()
}
