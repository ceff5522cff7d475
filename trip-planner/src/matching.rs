//! Result selection for text searches.
//!
//! The stop finder already orders its results by relevance, so selection
//! never re-ranks: it filters by kind, truncates, and picks the head.

use crate::domain::{Location, LocationKind};

/// Keep at most `max_results` locations, optionally of one kind.
///
/// API order is preserved.
pub fn select(
    locations: Vec<Location>,
    kind: Option<LocationKind>,
    max_results: usize,
) -> Vec<Location> {
    locations
        .into_iter()
        .filter(|l| kind.is_none_or(|k| l.kind == k))
        .take(max_results)
        .collect()
}

/// The best match: the first location, marked with `is_best`.
pub fn best(locations: Vec<Location>) -> Option<Location> {
    let mut first = locations.into_iter().next()?;
    first.is_best = true;
    Some(first)
}
