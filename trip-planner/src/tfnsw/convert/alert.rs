//! Service alert parsing.

use std::collections::BTreeSet;

use scraper::Html;
use serde_json::Value;
use tracing::warn;

use crate::domain::{ServiceAlert, parse_timestamp};
use crate::tfnsw::error::ParseError;
use crate::tfnsw::types::{AlertDto, value_as_string};

use super::{from_object, meaningful};

/// Longest subtitle derived from alert content, in characters.
const SUBTITLE_MAX_CHARS: usize = 100;

/// Convert one alert fragment.
///
/// # Errors
///
/// Returns `Malformed` for non-objects and for alerts carrying none of a
/// subtitle, content or url.
pub fn convert_alert(value: &Value) -> Result<ServiceAlert, ParseError> {
    let dto: AlertDto = from_object(value, "alert")?;

    let content = meaningful(dto.content.as_deref());
    let url = meaningful(dto.url.as_deref());
    let subtitle = meaningful(dto.subtitle.as_deref())
        .or_else(|| content.as_deref().and_then(subtitle_from_content))
        .or_else(|| url.clone())
        .ok_or_else(|| ParseError::Malformed("alert has no subtitle, content or url".into()))?;

    let affected = dto.affected.unwrap_or_default();

    Ok(ServiceAlert {
        id: dto.id,
        priority: meaningful(dto.priority.as_deref()),
        subtitle,
        content,
        url,
        last_modification: dto
            .timestamps
            .and_then(|t| t.last_modification)
            .as_deref()
            .and_then(parse_timestamp),
        affected_stops: reference_ids(&affected.stops),
        affected_lines: reference_ids(&affected.lines),
    })
}

/// Convert a list of alert fragments, skipping any that fail.
pub fn convert_alerts(values: &[Value]) -> Vec<ServiceAlert> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match convert_alert(value) {
            Ok(alert) => Some(alert),
            Err(e) => {
                warn!(index, error = %e, "skipping alert");
                None
            }
        })
        .collect()
}

/// Derive a one-line subtitle from HTML alert content.
///
/// Markup is parsed as an HTML fragment and only its text kept, with
/// entities decoded and whitespace collapsed. The result is cut to 100
/// characters with a trailing ellipsis.
///
/// ```
/// use trip_planner::tfnsw::convert::subtitle_from_content;
///
/// assert_eq!(
///     subtitle_from_content("<p>Lifts at <b>Central</b>&nbsp;are closed</p>").as_deref(),
///     Some("Lifts at Central are closed"),
/// );
/// assert_eq!(subtitle_from_content("<br/>"), None);
/// ```
pub fn subtitle_from_content(content: &str) -> Option<String> {
    let fragment = Html::parse_fragment(content);
    // Text nodes are joined with a space so words in adjacent blocks stay apart
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }

    if collapsed.chars().count() <= SUBTITLE_MAX_CHARS {
        Some(collapsed)
    } else {
        let cut: String = collapsed.chars().take(SUBTITLE_MAX_CHARS).collect();
        Some(format!("{}…", cut.trim_end()))
    }
}

fn reference_ids(refs: &[Value]) -> BTreeSet<String> {
    refs.iter()
        .filter_map(|r| r.get("id").and_then(value_as_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_alert() {
        let alert = convert_alert(&json!({
            "id": "ems-12345",
            "priority": "high",
            "subtitle": "Lifts out of service at Central",
            "content": "<div>Lift 3 is out of service.</div>",
            "url": "https://transportnsw.info/alerts/details#/ems-12345",
            "timestamps": { "lastModification": "2024-03-14T22:15:00Z" },
            "affected": {
                "stops": [{ "id": "200060", "name": "Central Station" }, { "name": "no id" }],
                "lines": [{ "id": "020T1", "number": "T1" }]
            }
        }))
        .unwrap();

        assert_eq!(alert.id.as_deref(), Some("ems-12345"));
        assert_eq!(alert.subtitle, "Lifts out of service at Central");
        assert!(alert.affects_stop("200060"));
        assert_eq!(alert.affected_stops.len(), 1);
        assert!(alert.affects_line("020T1"));
        assert_eq!(
            alert.last_modification.unwrap().format("%Y-%m-%d %H:%M").to_string(),
            "2024-03-15 09:15"
        );
    }

    #[test]
    fn subtitle_from_description() {
        let alert = convert_alert(&json!({ "content": "Service disruption on T1" })).unwrap();
        assert_eq!(alert.subtitle, "Service disruption on T1");
        assert!(alert.affected_stops.is_empty());
    }

    #[test]
    fn subtitle_from_url_last() {
        let alert = convert_alert(&json!({ "subtitle": "  ", "url": "https://example.org/a" })).unwrap();
        assert_eq!(alert.subtitle, "https://example.org/a");
    }

    #[test]
    fn empty_alert_rejected() {
        assert!(convert_alert(&json!({ "id": "1", "priority": "low" })).is_err());
        assert!(convert_alert(&json!("text")).is_err());
    }

    #[test]
    fn long_content_truncated() {
        let long = "word ".repeat(60);
        let subtitle = subtitle_from_content(&long).unwrap();
        assert!(subtitle.ends_with('…'));
        assert!(subtitle.chars().count() <= SUBTITLE_MAX_CHARS + 1);
    }

    #[test]
    fn entities_and_tags() {
        assert_eq!(
            subtitle_from_content("<p>Buses&nbsp;replace trains &amp; ferries</p>\n<p>between A &lt;&gt; B</p>")
                .as_deref(),
            Some("Buses replace trains & ferries between A <> B")
        );
    }

    #[test]
    fn named_and_numeric_entities() {
        let alert = convert_alert(&json!({
            "content": "<p>Trains won&rsquo;t run &#8211; use buses&hellip;</p>"
        }))
        .unwrap();
        assert_eq!(alert.subtitle, "Trains won\u{2019}t run \u{2013} use buses\u{2026}");
        assert_eq!(
            subtitle_from_content("Fares &#x24;2.50 &eacute;t&eacute;").as_deref(),
            Some("Fares $2.50 \u{e9}t\u{e9}")
        );
    }

    #[test]
    fn bare_angle_bracket_is_text() {
        let alert = convert_alert(&json!({
            "content": "Delays of <5 minutes on T1 between Central and Hornsby"
        }))
        .unwrap();
        assert_eq!(alert.subtitle, "Delays of <5 minutes on T1 between Central and Hornsby");
        assert_eq!(
            subtitle_from_content("<p>Gap 1 < gap 2</p>").as_deref(),
            Some("Gap 1 < gap 2")
        );
    }

    #[test]
    fn adjacent_blocks_keep_words_apart() {
        assert_eq!(
            subtitle_from_content("<p>Platform 1</p><p>closed</p>").as_deref(),
            Some("Platform 1 closed")
        );
    }

    #[test]
    fn list_skips_bad() {
        let alerts = convert_alerts(&[json!({ "subtitle": "ok" }), json!(null), json!({})]);
        assert_eq!(alerts.len(), 1);
    }
}
