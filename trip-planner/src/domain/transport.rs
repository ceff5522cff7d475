//! The vehicle or service operating a leg or departure.

use super::Mode;

/// Product metadata attached to a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Numeric product class (see [`Mode::for_leg`])
    pub class: Option<i64>,
    /// Product name, e.g. "Sydney Trains Network"
    pub name: Option<String>,
    pub icon_id: Option<i64>,
}

/// The operator running a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
}

/// A public transport service (or a walking/cycling pseudo-service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transport {
    pub id: Option<String>,
    /// Full name, e.g. "Sydney Trains Network T1 North Shore & Western Line"
    pub name: Option<String>,
    pub disassembled_name: Option<String>,
    /// Line number, e.g. "T1" or "333"
    pub number: Option<String>,
    pub mode: Mode,
    pub product: Option<Product>,
    /// Headsign destination
    pub destination_name: Option<String>,
    pub operator: Option<Operator>,
    pub description: Option<String>,
}

impl Transport {
    /// A transport carrying nothing but its mode.
    pub fn of_mode(mode: Mode) -> Self {
        Self {
            id: None,
            name: None,
            disassembled_name: None,
            number: None,
            mode,
            product: None,
            destination_name: None,
            operator: None,
            description: None,
        }
    }

    /// Short label for summaries.
    ///
    /// The mode label when the mode is known; otherwise the line number,
    /// then the name, then "Unknown".
    ///
    /// ```
    /// use trip_planner::domain::{Mode, Transport};
    ///
    /// assert_eq!(Transport::of_mode(Mode::Ferry).label(), "Ferry");
    ///
    /// let mut t = Transport::of_mode(Mode::Unknown);
    /// t.number = Some("X99".into());
    /// assert_eq!(t.label(), "X99");
    /// ```
    pub fn label(&self) -> &str {
        if self.mode != Mode::Unknown {
            return self.mode.label();
        }
        [&self.number, &self.disassembled_name, &self.name]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(Mode::Unknown.label())
    }

    /// Returns the operator's name, if known.
    pub fn operator_name(&self) -> Option<&str> {
        self.operator.as_ref()?.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_mode() {
        let mut t = Transport::of_mode(Mode::Train);
        t.number = Some("T1".into());
        assert_eq!(t.label(), "Train");
    }

    #[test]
    fn label_falls_back_for_unknown_mode() {
        let mut t = Transport::of_mode(Mode::Unknown);
        assert_eq!(t.label(), "Unknown");

        t.name = Some("Mystery Line".into());
        assert_eq!(t.label(), "Mystery Line");

        t.number = Some("  ".into());
        assert_eq!(t.label(), "Mystery Line");

        t.number = Some("M1".into());
        assert_eq!(t.label(), "M1");
    }

    #[test]
    fn operator_name() {
        let mut t = Transport::of_mode(Mode::Bus);
        assert_eq!(t.operator_name(), None);
        t.operator = Some(Operator {
            id: Some("2436".into()),
            code: None,
            name: Some("State Transit Sydney".into()),
        });
        assert_eq!(t.operator_name(), Some("State Transit Sydney"));
    }
}
