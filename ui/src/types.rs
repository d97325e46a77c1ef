//! Shared types for the Segment Builder UI
//!
//! `SaveSegmentRequest` and `RelayResponse` mirror the server's relay wire
//! format; `Segment` is the record kept in browser storage.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Whether a schema describes the user or the group they belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitKind {
    User,
    Group,
}

impl TraitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraitKind::User => "user",
            TraitKind::Group => "group",
        }
    }

    /// Tailwind colour for the trait dot
    pub fn dot_class(&self) -> &'static str {
        match self {
            TraitKind::User => "bg-green-500",
            TraitKind::Group => "bg-pink-500",
        }
    }

    /// Tailwind classes for a schema pill
    pub fn pill_class(&self) -> &'static str {
        match self {
            TraitKind::User => "border-green-200 bg-green-50 text-green-700",
            TraitKind::Group => "border-pink-200 bg-pink-50 text-pink-700",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchemaOption {
    pub label: String,
    pub value: String,
    #[serde(rename = "trait")]
    pub trait_kind: TraitKind,
}

impl SchemaOption {
    pub fn new(label: &str, value: &str, trait_kind: TraitKind) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            trait_kind,
        }
    }
}

/// One schema slot in the segment form; `None` until the user picks a value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRow {
    pub value: Option<String>,
}

impl SchemaRow {
    pub fn empty() -> Self {
        Self { value: None }
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.as_deref().map_or(true, str::is_empty)
    }
}

/// A saved segment
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Segment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub schemas: Vec<String>,
    /// Last write time; older records may not carry one
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Accepts RFC 3339, an offset-less ISO 8601 time (read as UTC) or epoch
/// milliseconds. Anything else reads as "no timestamp" instead of failing
/// the whole record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_timestamp))
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Body posted to `/api/save-segment`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSegmentRequest {
    pub segment_name: String,
    pub schemas: Vec<String>,
    pub timestamp: String,
}

/// Relay answer; `status`/`response` are present when the webhook was reached,
/// `error` when forwarding failed
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn segment_json(timestamp: &str) -> String {
        format!(r#"{{"id":"1","name":"One","schemas":["age"],"timestamp":{}}}"#, timestamp)
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        for raw in [
            r#""2024-05-01T10:00:00Z""#,
            r#""2024-05-01T12:00:00+02:00""#,
            r#""2024-05-01T10:00:00""#,
            r#""2024-05-01T10:00:00.000""#,
            "1714557600000",
        ] {
            let segment: Segment = serde_json::from_str(&segment_json(raw)).unwrap();
            assert_eq!(segment.timestamp, Some(expected), "timestamp {}", raw);
        }
    }

    #[test]
    fn test_unreadable_timestamp_keeps_record() {
        for raw in [r#""yesterday""#, "null", "true"] {
            let segment: Segment = serde_json::from_str(&segment_json(raw)).unwrap();
            assert_eq!(segment.id, "1");
            assert!(segment.timestamp.is_none());
        }
    }
}
