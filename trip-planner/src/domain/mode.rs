//! Transport mode and location kind vocabularies.
//!
//! The trip planner identifies modes by numeric "product class" codes
//! (the EFA "means of transport" list). Walking and cycling legs use codes
//! of their own, but a few classes are shared between scheduled and
//! on-demand services, so leg modes are resolved through an explicit
//! `(class, type)` table rather than inferred from incidental fields.

use std::fmt;

/// Canonical transport mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    Train,
    Metro,
    LightRail,
    Bus,
    Coach,
    Ferry,
    SchoolBus,
    OnDemand,
    Walk,
    Cycle,
    Unknown,
}

impl Mode {
    /// Map a location-level mode code (e.g. from `STOP_MOT_LIST`).
    ///
    /// Returns `None` for codes outside the known vocabulary; callers drop
    /// those rather than failing.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_planner::domain::Mode;
    ///
    /// assert_eq!(Mode::from_code(1), Some(Mode::Train));
    /// assert_eq!(Mode::from_code(9), Some(Mode::Ferry));
    /// assert_eq!(Mode::from_code(42), None);
    /// ```
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Mode::Train),
            2 => Some(Mode::Metro),
            4 => Some(Mode::LightRail),
            5 => Some(Mode::Bus),
            7 => Some(Mode::Coach),
            9 => Some(Mode::Ferry),
            11 => Some(Mode::SchoolBus),
            99 | 100 => Some(Mode::Walk),
            107 => Some(Mode::Cycle),
            _ => None,
        }
    }

    /// Resolve the mode of a journey leg from its product class and the
    /// free-text product name.
    ///
    /// Exact `(class, type)` entries take precedence over class-only ones.
    /// Unrecognised classes resolve to [`Mode::Unknown`].
    pub fn for_leg(product_class: Option<i64>, product_name: Option<&str>) -> Self {
        let Some(class) = product_class else {
            return Mode::Unknown;
        };
        let type_key = product_name.map(|n| n.trim().to_ascii_lowercase());

        let lookup = |wanted: Option<&str>| {
            LEG_MODE_TABLE
                .iter()
                .find(|(c, t, _)| *c == class && *t == wanted)
                .map(|(_, _, mode)| *mode)
        };

        type_key
            .as_deref()
            .and_then(|key| lookup(Some(key)))
            .or_else(|| lookup(None))
            .unwrap_or(Mode::Unknown)
    }

    /// Human-readable label used in journey summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Train => "Train",
            Mode::Metro => "Metro",
            Mode::LightRail => "Light Rail",
            Mode::Bus => "Bus",
            Mode::Coach => "Coach",
            Mode::Ferry => "Ferry",
            Mode::SchoolBus => "School Bus",
            Mode::OnDemand => "On Demand",
            Mode::Walk => "Walk",
            Mode::Cycle => "Cycle",
            Mode::Unknown => "Unknown",
        }
    }

    /// Returns true for legs the traveller covers under their own power.
    pub fn is_active(&self) -> bool {
        matches!(self, Mode::Walk | Mode::Cycle)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Leg mode lookup keyed by `(product class, lower-cased product name)`.
///
/// A `None` type is the class-wide fallback. Read-only process-wide state.
static LEG_MODE_TABLE: &[(i64, Option<&str>, Mode)] = &[
    (1, None, Mode::Train),
    (2, None, Mode::Metro),
    (4, None, Mode::LightRail),
    (5, None, Mode::Bus),
    (5, Some("on demand"), Mode::OnDemand),
    (5, Some("on-demand"), Mode::OnDemand),
    (7, None, Mode::Coach),
    (9, None, Mode::Ferry),
    (11, None, Mode::SchoolBus),
    (19, None, Mode::OnDemand),
    (99, None, Mode::Walk),
    (99, Some("footpath"), Mode::Walk),
    (100, None, Mode::Walk),
    (100, Some("footpath"), Mode::Walk),
    (107, None, Mode::Cycle),
    (107, Some("bicycle"), Mode::Cycle),
];

/// Kind of location returned by stop search and coordinate requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Stop,
    Platform,
    Poi,
    Address,
    Locality,
    Street,
    Suburb,
    Coordinate,
    Unknown,
}

impl LocationKind {
    /// Parse the API's `type` string. Unknown strings map to `Unknown`.
    pub fn from_api(s: &str) -> Self {
        match s {
            "stop" => LocationKind::Stop,
            "platform" => LocationKind::Platform,
            "poi" => LocationKind::Poi,
            "singlehouse" => LocationKind::Address,
            "locality" => LocationKind::Locality,
            "street" => LocationKind::Street,
            "suburb" => LocationKind::Suburb,
            "coord" => LocationKind::Coordinate,
            _ => LocationKind::Unknown,
        }
    }

    /// The API's string for this kind.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            LocationKind::Stop => "stop",
            LocationKind::Platform => "platform",
            LocationKind::Poi => "poi",
            LocationKind::Address => "singlehouse",
            LocationKind::Locality => "locality",
            LocationKind::Street => "street",
            LocationKind::Suburb => "suburb",
            LocationKind::Coordinate => "coord",
            LocationKind::Unknown => "unknown",
        }
    }
}

/// Route preference for cycling trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CyclingProfile {
    Easier,
    #[default]
    Moderate,
    MoreDirect,
}

impl CyclingProfile {
    /// Value of the `bikeProfSpeed` request parameter.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            CyclingProfile::Easier => "EASIER",
            CyclingProfile::Moderate => "MODERATE",
            CyclingProfile::MoreDirect => "MORE_DIRECT",
        }
    }

    /// Value of the `elevFac` request parameter (how hard to avoid hills).
    pub fn elevation_factor(&self) -> u8 {
        match self {
            CyclingProfile::Easier => 0,
            CyclingProfile::Moderate => 50,
            CyclingProfile::MoreDirect => 100,
        }
    }
}
