//! Location parsing for the stop finder and coordinate search.

use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::{CoordOrder, Coordinate, Location, LocationKind, Mode, StopParent};
use crate::tfnsw::error::ParseError;
use crate::tfnsw::types::{LocationDto, ParentDto, value_as_f64};

use super::{from_object, meaningful, prop_string};

/// Convert one location fragment.
///
/// The coordinate search returns sparse top-level fields, so the id, name
/// and modes fall back to the `properties` block.
///
/// # Errors
///
/// Returns `ParseError::MissingField("id")` when no identifier can be
/// found, or `Malformed` if the fragment is not an object.
pub fn convert_location(value: &Value, order: CoordOrder) -> Result<Location, ParseError> {
    let dto: LocationDto = from_object(value, "location")?;
    let mut properties = dto.properties.unwrap_or_default();

    let id = dto
        .id
        .or_else(|| prop_string(&properties, "STOP_GLOBAL_ID"))
        .or_else(|| prop_string(&properties, "stopId"))
        .ok_or(ParseError::MissingField("id"))?;

    let street = [dto.street_name.as_deref(), dto.building_number.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let name = meaningful(dto.name.as_deref())
        .or_else(|| meaningful(dto.disassembled_name.as_deref()))
        .or_else(|| meaningful(prop_string(&properties, "STOP_NAME_WITH_PLACE").as_deref()))
        .or_else(|| meaningful(Some(street.as_str())))
        .unwrap_or_else(|| id.clone());

    let modes = location_modes(dto.modes, dto.product_classes, &properties);
    let distance_m = properties
        .get("distance")
        .and_then(value_as_f64)
        .filter(|d| *d >= 0.0 && *d <= f64::from(u32::MAX))
        .map(|d| d.round() as u32);

    for (key, extra) in dto.extra {
        properties.entry(key).or_insert(extra);
    }

    Ok(Location {
        id,
        name,
        disassembled_name: meaningful(dto.disassembled_name.as_deref()),
        kind: dto
            .kind
            .as_deref()
            .map_or(LocationKind::Unknown, LocationKind::from_api),
        coord: dto
            .coord
            .as_deref()
            .and_then(|c| Coordinate::from_pair(c, order)),
        modes,
        match_quality: dto.match_quality,
        parent: dto.parent.and_then(convert_parent),
        distance_m,
        properties,
        is_best: false,
    })
}

/// Convert a list of location fragments.
///
/// Malformed entries (not an object) are skipped with a warning.
///
/// # Errors
///
/// Returns `MissingField("id")` if any location has no identifier.
pub fn convert_locations(
    values: &[Value],
    order: CoordOrder,
) -> Result<Vec<Location>, ParseError> {
    let mut locations = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        match convert_location(value, order) {
            Ok(location) => locations.push(location),
            Err(e @ ParseError::Malformed(_)) => warn!(index, error = %e, "skipping location"),
            Err(e) => return Err(e),
        }
    }
    Ok(locations)
}

/// Modes from `modes`, else `productClasses`, else `STOP_MOT_LIST`.
fn location_modes(
    modes: Option<Vec<i64>>,
    product_classes: Option<Vec<i64>>,
    properties: &Map<String, Value>,
) -> Vec<Mode> {
    let codes = modes
        .filter(|m| !m.is_empty())
        .or_else(|| product_classes.filter(|m| !m.is_empty()))
        .unwrap_or_else(|| {
            prop_string(properties, "STOP_MOT_LIST")
                .map(|list| {
                    list.split(',')
                        .filter_map(|code| code.trim().parse().ok())
                        .collect()
                })
                .unwrap_or_default()
        });

    let mut result = Vec::with_capacity(codes.len());
    for mode in codes.into_iter().filter_map(Mode::from_code) {
        if !result.contains(&mode) {
            result.push(mode);
        }
    }
    result
}

fn convert_parent(dto: ParentDto) -> Option<StopParent> {
    let id = dto.id?;
    Some(StopParent {
        name: meaningful(dto.name.as_deref()).unwrap_or_else(|| id.clone()),
        kind: dto
            .kind
            .as_deref()
            .map_or(LocationKind::Unknown, LocationKind::from_api),
        parent: dto.parent.and_then(|p| convert_parent(*p)).map(Box::new),
        id,
    })
}
