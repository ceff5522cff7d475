//! Service alerts (planned works, disruptions, notices).

use std::collections::BTreeSet;

use super::SydneyTime;

/// A published service alert.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceAlert {
    pub id: Option<String>,
    /// Priority as published, e.g. "normal" or "veryHigh"
    pub priority: Option<String>,
    /// One-line headline (never blank)
    pub subtitle: String,
    /// Full HTML body
    pub content: Option<String>,
    /// Link to the published notice
    pub url: Option<String>,
    pub last_modification: Option<SydneyTime>,
    /// Stop identifiers the alert refers to
    pub affected_stops: BTreeSet<String>,
    /// Line identifiers the alert refers to
    pub affected_lines: BTreeSet<String>,
}

impl ServiceAlert {
    /// Returns true if the alert names the given stop.
    pub fn affects_stop(&self, stop_id: &str) -> bool {
        self.affected_stops.contains(stop_id)
    }

    /// Returns true if the alert names the given line.
    pub fn affects_line(&self, line_id: &str) -> bool {
        self.affected_lines.contains(line_id)
    }

    /// Returns true if the alert is relevant at a stop.
    ///
    /// Alerts that name no stops at all are network-wide and apply
    /// everywhere.
    pub fn applies_to_stop(&self, stop_id: &str) -> bool {
        self.affected_stops.is_empty() || self.affects_stop(stop_id)
    }
}
