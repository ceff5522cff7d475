//! Location types.
//!
//! A `Location` is anything the stop finder or coordinate search can
//! return: stops, platforms, points of interest, addresses and so on.

use serde_json::{Map, Value};

use super::{Coordinate, LocationKind, Mode};

/// The locality chain above a location (e.g. stop → suburb → locality).
#[derive(Debug, Clone, PartialEq)]
pub struct StopParent {
    /// Identifier of the parent
    pub id: String,
    /// Display name of the parent
    pub name: String,
    /// What kind of place the parent is
    pub kind: LocationKind,
    /// The parent's own parent, if any
    pub parent: Option<Box<StopParent>>,
}

impl StopParent {
    /// Iterate this parent and every ancestor above it, nearest first.
    pub fn ancestry(&self) -> impl Iterator<Item = &StopParent> {
        std::iter::successors(Some(self), |p| p.parent.as_deref())
    }
}

/// A searchable place.
///
/// Built by the location parser; `is_best` is only ever set by result
/// selection, never read from the response.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Opaque identifier, usable as a trip origin or destination
    pub id: String,
    /// Display name (never blank)
    pub name: String,
    /// Short name without locality, when the API gives one
    pub disassembled_name: Option<String>,
    pub kind: LocationKind,
    pub coord: Option<Coordinate>,
    /// Modes serving this location (empty when unknown)
    pub modes: Vec<Mode>,
    /// API relevance score for text searches
    pub match_quality: Option<i64>,
    pub parent: Option<StopParent>,
    /// Distance from the search point for proximity searches, in metres
    pub distance_m: Option<u32>,
    /// The raw `properties` object plus any unrecognised top-level fields
    pub properties: Map<String, Value>,
    /// Marks the single best match of a text search
    pub is_best: bool,
}

impl Location {
    /// Creates a location with only the required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: LocationKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            disassembled_name: None,
            kind,
            coord: None,
            modes: Vec::new(),
            match_quality: None,
            parent: None,
            distance_m: None,
            properties: Map::new(),
            is_best: false,
        }
    }

    /// Returns true if the location is served by the given mode.
    pub fn serves(&self, mode: Mode) -> bool {
        self.modes.contains(&mode)
    }

    /// Returns true for stops and platforms.
    pub fn is_stop(&self) -> bool {
        matches!(self.kind, LocationKind::Stop | LocationKind::Platform)
    }

    /// Name of the nearest enclosing locality, if the parent chain has one.
    pub fn locality(&self) -> Option<&str> {
        self.parent
            .as_ref()?
            .ancestry()
            .find(|p| p.kind == LocationKind::Locality)
            .map(|p| p.name.as_str())
    }
}
