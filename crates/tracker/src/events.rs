//! Wire types — the envelope posted to the collection endpoint and the
//! per-event payloads it carries.
//!
//! Field names follow the collector's camelCase contract. Optional fields
//! serialize as explicit `null` (the collector tolerates them); only the
//! identify `traits` map is null-filtered, and that happens in the builder.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of event types understood by the collector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    #[serde(rename = "session.start")]
    SessionStart,
    #[serde(rename = "page.view")]
    PageView,
    #[serde(rename = "events.batch")]
    EventsBatch,
    #[serde(rename = "form.submit")]
    FormSubmit,
    #[serde(rename = "user.identify")]
    UserIdentify,
    #[serde(rename = "page.leave")]
    PageLeave,
}

impl EventKind {
    /// The wire name of this event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SessionStart => "session.start",
            EventKind::PageView => "page.view",
            EventKind::EventsBatch => "events.batch",
            EventKind::FormSubmit => "form.submit",
            EventKind::UserIdentify => "user.identify",
            EventKind::PageLeave => "page.leave",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical wrapper sent over the wire: `{apiKey, type, data}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub api_key: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub data: serde_json::Value,
}

/// Marketing-attribution query parameters, nested under `utm` in the
/// session-start payload. Always present; fields may be null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtmParams {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
}

/// Device context sent with a session start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartPayload {
    pub visitor_id: String,
    pub session_id: String,
    pub timestamp: i64,
    pub referrer: Option<String>,
    pub entry_page: Option<String>,
    pub device: DeviceInfo,
    pub utm: UtmParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewPayload {
    pub session_id: String,
    pub visitor_id: String,
    /// Full URL as supplied by the caller.
    pub url: String,
    /// Path component of `url`, `/` when absent.
    pub path: String,
    pub title: Option<String>,
    pub referrer: Option<String>,
    pub timestamp: i64,
    pub load_time: Option<u64>,
}

/// A single named event inside an `events.batch` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub category: Option<String>,
    pub value: Option<String>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub timestamp: i64,
}

/// Batch wrapper for custom events. The list shape is forward-compatible
/// with multi-event batches; today each call carries exactly one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsBatchPayload {
    pub session_id: String,
    pub timestamp: i64,
    pub events: Vec<TrackedEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmitPayload {
    pub session_id: String,
    pub form_id: String,
    pub form_action: Option<String>,
    /// Field values, already masked by [`crate::sanitize`].
    pub fields: HashMap<String, String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyPayload {
    pub session_id: String,
    pub visitor_id: String,
    pub user_id: Option<String>,
    /// Merged identity traits; null values are dropped before this is built.
    pub traits: HashMap<String, serde_json::Value>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLeavePayload {
    pub session_id: String,
    /// The exit page, carried verbatim as both `url` and `path`.
    pub url: Option<String>,
    pub path: Option<String>,
    pub timestamp: i64,
}
