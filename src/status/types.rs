//! Wire types of the status API.

use super::StatusCode;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Link target used when a snapshot carries no usable URL.
pub const PLACEHOLDER_LINK: &str = "#";

/// Decoded `GET /api/status` body, in the order the server sent it.
pub type StatusReport = IndexMap<String, ServiceSnapshot>;

/// One `(timestamp, status)` pair of a service's history.
///
/// Serialized as a two-element array, the way the status backend emits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, StatusCode)", into = "(String, StatusCode)")]
pub struct HistorySample {
    /// ISO-8601 timestamp of the check
    pub timestamp: String,
    /// Detailed status recorded by the check
    pub status: StatusCode,
}

impl HistorySample {
    pub fn new(timestamp: impl Into<String>, status: impl Into<StatusCode>) -> Self {
        Self {
            timestamp: timestamp.into(),
            status: status.into(),
        }
    }
}

impl From<(String, StatusCode)> for HistorySample {
    fn from((timestamp, status): (String, StatusCode)) -> Self {
        Self { timestamp, status }
    }
}

impl From<HistorySample> for (String, StatusCode) {
    fn from(sample: HistorySample) -> Self {
        (sample.timestamp, sample.status)
    }
}

/// Current status and bounded history for one service.
///
/// Each poll delivers a full replacement; nothing is merged client-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    /// Display name, when the backend sends one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Latest status code
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: StatusCode,
    /// Outbound link for the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Link sent by backends that predate `url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_url: Option<String>,
    /// Recent checks, oldest first
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<HistorySample>,
}

impl ServiceSnapshot {
    /// Link target for the service card.
    ///
    /// `url` wins over `display_url`; blank values are skipped and the
    /// result falls back to [`PLACEHOLDER_LINK`].
    pub fn link_target(&self) -> &str {
        [self.url.as_deref(), self.display_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_LINK)
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Bucket;

    #[test]
    fn test_decode_backend_payload() {
        let body = r#"{
            "beszel": {
                "name": "Beszel (Status)",
                "status": "offline_timeout",
                "display_url": "https://status.example.com",
                "history": [
                    ["2024-01-01T00:00:00+00:00", "online"],
                    ["2024-01-01T00:05:00+00:00", "offline_timeout"]
                ]
            }
        }"#;
        let report: StatusReport = serde_json::from_str(body).unwrap();
        let snapshot = &report["beszel"];
        assert_eq!(snapshot.name.as_deref(), Some("Beszel (Status)"));
        assert_eq!(snapshot.status.bucket(), Bucket::Offline);
        assert_eq!(snapshot.link_target(), "https://status.example.com");
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[1].status.as_str(), "offline_timeout");
    }

    #[test]
    fn test_decode_preserves_response_order() {
        let body = r#"{"zeta": {"status": "online"}, "alpha": {"status": "online"}, "mid": {"status": "online"}}"#;
        let report: StatusReport = serde_json::from_str(body).unwrap();
        let keys: Vec<_> = report.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_decode_missing_and_null_fields() {
        let body = r#"{"a": {}, "b": {"status": null, "history": null, "url": null}}"#;
        let report: StatusReport = serde_json::from_str(body).unwrap();
        for snapshot in report.values() {
            assert_eq!(snapshot.status.as_str(), "");
            assert!(snapshot.history.is_empty());
            assert_eq!(snapshot.link_target(), PLACEHOLDER_LINK);
        }
    }

    #[test]
    fn test_url_field_name() {
        let snapshot: ServiceSnapshot =
            serde_json::from_str(r#"{"status": "online", "url": "https://a.example"}"#).unwrap();
        assert_eq!(snapshot.link_target(), "https://a.example");
    }

    #[test]
    fn test_url_and_display_url_together() {
        let body = r#"{
            "web": {"status": "online", "url": "https://web.example", "display_url": "https://legacy.example"},
            "db": {"status": "error_500", "display_url": "https://db.example"}
        }"#;
        let report: StatusReport = serde_json::from_str(body).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report["web"].link_target(), "https://web.example");
        assert_eq!(report["db"].link_target(), "https://db.example");
        assert_eq!(report["db"].status.bucket(), Bucket::Error);
    }

    #[test]
    fn test_blank_url_uses_display_url() {
        let snapshot = ServiceSnapshot {
            url: Some("  ".to_string()),
            display_url: Some("https://legacy.example".to_string()),
            ..Default::default()
        };
        assert_eq!(snapshot.link_target(), "https://legacy.example");
    }

    #[test]
    fn test_blank_url_falls_back_to_placeholder() {
        let snapshot = ServiceSnapshot {
            url: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(snapshot.link_target(), "#");
    }

    #[test]
    fn test_malformed_history_entry_is_rejected() {
        let body = r#"{"status": "online", "history": [["2024-01-01T00:00:00Z"]]}"#;
        assert!(serde_json::from_str::<ServiceSnapshot>(body).is_err());
    }

    #[test]
    fn test_history_sample_serializes_as_pair() {
        let sample = HistorySample::new("2024-01-01T00:00:00Z", "online");
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"["2024-01-01T00:00:00Z","online"]"#);
    }
}
