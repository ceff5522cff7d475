//! Timestamp handling for trip planner responses.
//!
//! The API returns ISO-8601 timestamps, usually in UTC with a `Z` suffix
//! but occasionally without any offset. Everything is normalised to
//! Sydney local time, which is also the zone request parameters are
//! expressed in.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// The zone all timestamps are anchored to.
pub const SYDNEY: Tz = chrono_tz::Australia::Sydney;

/// A timezone-aware instant expressed in Sydney local time.
pub type SydneyTime = DateTime<Tz>;

/// Offset-less layouts the API has been seen to emit.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse an API timestamp.
///
/// Timestamps with an offset (or `Z`) are converted to Sydney time; those
/// without one are taken to already be Sydney local time. Returns `None`
/// for anything unparseable so one bad field never aborts a response.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::parse_timestamp;
///
/// let t = parse_timestamp("2024-03-15T23:30:00Z").unwrap();
/// // 23:30 UTC is 10:30 the next morning in Sydney (AEDT, +11)
/// assert_eq!(t.format("%Y-%m-%d %H:%M").to_string(), "2024-03-16 10:30");
///
/// let naive = parse_timestamp("2024-07-01T08:15:00").unwrap();
/// assert_eq!(naive.format("%H:%M %z").to_string(), "08:15 +1000");
///
/// assert!(parse_timestamp("not a time").is_none());
/// ```
pub fn parse_timestamp(s: &str) -> Option<SydneyTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&SYDNEY));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok());

    match naive {
        // Ambiguous wall-clock times (DST fall-back) resolve to the first occurrence.
        Some(naive) => {
            let local = SYDNEY.from_local_datetime(&naive).earliest();
            if local.is_none() {
                debug!(timestamp = %s, "timestamp falls in a daylight-saving gap");
            }
            local
        }
        None => {
            debug!(timestamp = %s, "unparseable timestamp ignored");
            None
        }
    }
}

/// Express any instant in Sydney local time.
pub fn to_sydney<Z: TimeZone>(dt: &DateTime<Z>) -> SydneyTime {
    dt.with_timezone(&SYDNEY)
}

/// The current instant in Sydney local time.
pub fn now_sydney() -> SydneyTime {
    to_sydney(&Utc::now())
}

/// `itdDate` request parameter (`YYYYMMDD`).
pub fn itd_date(dt: &SydneyTime) -> String {
    dt.format("%Y%m%d").to_string()
}

/// `itdTime` request parameter (`HHMM`).
pub fn itd_time(dt: &SydneyTime) -> String {
    dt.format("%H%M").to_string()
}

/// `filterDateValid` request parameter (`DD-MM-YYYY`).
pub fn alert_date(dt: &SydneyTime) -> String {
    dt.format("%d-%m-%Y").to_string()
}

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Whole minutes from `now` until `when`, rounded up.
///
/// The sign is preserved: an instant already in the past yields a
/// negative count.
///
/// ```
/// use trip_planner::domain::{minutes_until, parse_timestamp};
///
/// let now = parse_timestamp("2024-03-15T10:00:00").unwrap();
/// let soon = parse_timestamp("2024-03-15T10:02:30").unwrap();
/// let gone = parse_timestamp("2024-03-15T09:55:00").unwrap();
/// assert_eq!(minutes_until(&soon, &now), 3);
/// assert_eq!(minutes_until(&gone, &now), -5);
/// ```
pub fn minutes_until<A: TimeZone, B: TimeZone>(when: &DateTime<A>, now: &DateTime<B>) -> i64 {
    let millis = when
        .clone()
        .with_timezone(&Utc)
        .signed_duration_since(now.clone().with_timezone(&Utc))
        .num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_MINUTE);
    if millis.rem_euclid(MILLIS_PER_MINUTE) == 0 {
        whole
    } else {
        whole + 1
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    proptest! {
        /// The result is the smallest whole minute count covering the gap.
        #[test]
        fn minutes_is_ceiling(secs in -100_000i64..100_000) {
            let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
            let when = now + Duration::seconds(secs);
            let m = minutes_until(&when, &now);
            prop_assert!(m * 60 >= secs);
            prop_assert!((m - 1) * 60 < secs);
        }

        /// Any UTC instant survives a format/parse round trip.
        #[test]
        fn rfc3339_roundtrip(secs in 0i64..4_000_000_000) {
            let utc = Utc.timestamp_opt(secs, 0).unwrap();
            let parsed = parse_timestamp(&utc.to_rfc3339()).unwrap();
            prop_assert_eq!(parsed.with_timezone(&Utc), utc);
        }
    }
}
