//! Pure payload constructors — one per event type.
//!
//! Each builder returns a fully formed, self-contained payload with no
//! shared state, so a call is independently replayable: identical inputs
//! yield identical payloads modulo the timestamp and any generated ids.
//! No I/O happens here; delivery belongs to [`crate::transport`].

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::events::{
    DeviceInfo, EventsBatchPayload, FormSubmitPayload, IdentifyPayload, PageLeavePayload,
    PageViewPayload, SessionStartPayload, TrackedEvent, UtmParams,
};
use crate::identity::new_session_id;
use crate::sanitize::mask_sensitive_fields;

/// Wall-clock time of payload construction, in epoch milliseconds.
fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Path component of a URL, `/` when the URL has no path or does not parse.
fn extract_path(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) if !url.path().is_empty() => url.path().to_string(),
        _ => "/".to_string(),
    }
}

/// The resolved `(visitor_id, session_id)` pair handed back to the caller,
/// which owns persisting it (typically into cookies).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHandle {
    pub visitor_id: String,
    pub session_id: String,
}

/// Inputs for a `session.start` event.
#[derive(Debug, Clone, Default)]
pub struct SessionStart {
    pub visitor_id: String,
    /// Generated when absent; the resolved id comes back on the handle.
    pub session_id: Option<String>,
    pub user_agent: Option<String>,
    /// Feeds visitor fingerprinting upstream; the wire payload only carries
    /// the user agent.
    pub ip_address: Option<String>,
    pub referrer: Option<String>,
    pub entry_page: Option<String>,
    pub utm: UtmParams,
}

pub fn session_start(opts: SessionStart) -> (SessionStartPayload, SessionHandle) {
    let session_id = opts.session_id.unwrap_or_else(new_session_id);
    let payload = SessionStartPayload {
        visitor_id: opts.visitor_id.clone(),
        session_id: session_id.clone(),
        timestamp: epoch_millis(),
        referrer: opts.referrer,
        entry_page: opts.entry_page,
        device: DeviceInfo {
            user_agent: opts.user_agent,
        },
        utm: opts.utm,
    };
    let handle = SessionHandle {
        visitor_id: opts.visitor_id,
        session_id,
    };
    (payload, handle)
}

/// Inputs for a `page.view` event.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub visitor_id: String,
    pub session_id: String,
    pub url: String,
    pub title: Option<String>,
    pub referrer: Option<String>,
    /// Page load time in milliseconds.
    pub load_time_ms: Option<u64>,
}

pub fn page_view(opts: PageView) -> PageViewPayload {
    let path = extract_path(&opts.url);
    PageViewPayload {
        session_id: opts.session_id,
        visitor_id: opts.visitor_id,
        url: opts.url,
        path,
        title: opts.title,
        referrer: opts.referrer,
        timestamp: epoch_millis(),
        load_time: opts.load_time_ms,
    }
}

/// Inputs for a named custom event.
#[derive(Debug, Clone)]
pub struct CustomEvent {
    pub visitor_id: String,
    pub session_id: String,
    /// Event name, e.g. `button_click`.
    pub name: String,
    /// Event type for grouping, e.g. `click`, `form`.
    pub kind: String,
    pub category: Option<String>,
    pub value: Option<String>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl Default for CustomEvent {
    fn default() -> Self {
        Self {
            visitor_id: String::new(),
            session_id: String::new(),
            name: String::new(),
            kind: "custom".to_string(),
            category: None,
            value: None,
            metadata: None,
        }
    }
}

pub fn custom_event(opts: CustomEvent) -> EventsBatchPayload {
    let now = epoch_millis();
    EventsBatchPayload {
        session_id: opts.session_id,
        timestamp: now,
        events: vec![TrackedEvent {
            kind: opts.kind,
            name: opts.name,
            category: opts.category,
            value: opts.value,
            metadata: opts.metadata.unwrap_or_default(),
            timestamp: now,
        }],
    }
}

/// Inputs for a `form.submit` event.
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    pub visitor_id: String,
    pub session_id: String,
    pub form_id: String,
    pub form_action: Option<String>,
    pub fields: HashMap<String, String>,
}

pub fn form_submission(opts: FormSubmission) -> FormSubmitPayload {
    FormSubmitPayload {
        session_id: opts.session_id,
        form_id: opts.form_id,
        form_action: opts.form_action,
        fields: mask_sensitive_fields(opts.fields),
        timestamp: epoch_millis(),
    }
}

/// Inputs for a `user.identify` event.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub visitor_id: String,
    pub session_id: String,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Arbitrary additional traits, merged over the named ones.
    pub extra_traits: HashMap<String, serde_json::Value>,
}

fn trait_value(value: Option<String>) -> serde_json::Value {
    value
        .map(serde_json::Value::String)
        .unwrap_or(serde_json::Value::Null)
}

pub fn identify(opts: Identity) -> IdentifyPayload {
    let mut merged: HashMap<String, serde_json::Value> = HashMap::from([
        ("email".to_string(), trait_value(opts.email)),
        ("userId".to_string(), trait_value(opts.user_id.clone())),
        ("name".to_string(), trait_value(opts.name)),
        ("phone".to_string(), trait_value(opts.phone)),
        ("company".to_string(), trait_value(opts.company)),
    ]);
    merged.extend(opts.extra_traits);

    // Null filtering runs after the merge, so an explicit null extra trait
    // removes the named trait it shadows.
    let traits = merged
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .collect();

    IdentifyPayload {
        session_id: opts.session_id,
        visitor_id: opts.visitor_id,
        user_id: opts.user_id,
        traits,
        timestamp: epoch_millis(),
    }
}

/// Build a `page.leave` payload. The exit page travels verbatim as both
/// `url` and `path`.
pub fn session_end(session_id: &str, exit_page: Option<String>) -> PageLeavePayload {
    PageLeavePayload {
        session_id: session_id.to_string(),
        url: exit_page.clone(),
        path: exit_page,
        timestamp: epoch_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_start_generates_session_id() {
        let (payload, handle) = session_start(SessionStart {
            visitor_id: "v-1".into(),
            ..Default::default()
        });
        assert_eq!(handle.visitor_id, "v-1");
        assert!(!handle.session_id.is_empty());
        assert_eq!(payload.session_id, handle.session_id);

        // Fresh id per call
        let (_, second) = session_start(SessionStart {
            visitor_id: "v-1".into(),
            ..Default::default()
        });
        assert_ne!(handle.session_id, second.session_id);
    }

    #[test]
    fn test_session_start_keeps_supplied_session_id() {
        let (payload, handle) = session_start(SessionStart {
            visitor_id: "v-1".into(),
            session_id: Some("s-preset".into()),
            ..Default::default()
        });
        assert_eq!(handle.session_id, "s-preset");
        assert_eq!(payload.session_id, "s-preset");
    }

    #[test]
    fn test_session_start_embeds_utm_and_device() {
        let (payload, _) = session_start(SessionStart {
            visitor_id: "v-1".into(),
            user_agent: Some("Mozilla/5.0".into()),
            referrer: Some("https://news.example".into()),
            entry_page: Some("https://example.com/?utm_source=ad".into()),
            utm: UtmParams {
                utm_source: Some("ad".into()),
                utm_campaign: Some("spring".into()),
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(payload.device.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(payload.utm.utm_source.as_deref(), Some("ad"));
        assert!(payload.utm.utm_medium.is_none());
        assert!(payload.timestamp > 0);
    }

    #[test]
    fn test_page_view_extracts_path() {
        let payload = page_view(PageView {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            url: "https://example.com/products?x=1".into(),
            ..Default::default()
        });
        assert_eq!(payload.path, "/products");
        assert_eq!(payload.url, "https://example.com/products?x=1");
    }

    #[test]
    fn test_page_view_defaults_path_to_root() {
        let payload = page_view(PageView {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            url: "https://example.com".into(),
            ..Default::default()
        });
        assert_eq!(payload.path, "/");
    }

    #[test]
    fn test_page_view_unparseable_url_keeps_raw_url() {
        let payload = page_view(PageView {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            url: "not a url".into(),
            ..Default::default()
        });
        assert_eq!(payload.url, "not a url");
        assert_eq!(payload.path, "/");
    }

    #[test]
    fn test_custom_event_wraps_single_event_batch() {
        let payload = custom_event(CustomEvent {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            name: "button_click".into(),
            ..Default::default()
        });
        assert_eq!(payload.events.len(), 1);
        assert_eq!(payload.events[0].kind, "custom");
        assert_eq!(payload.events[0].name, "button_click");
        assert!(payload.events[0].metadata.is_empty());
        assert_eq!(payload.timestamp, payload.events[0].timestamp);
    }

    #[test]
    fn test_form_submission_masks_fields() {
        let payload = form_submission(FormSubmission {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            form_id: "signup".into(),
            form_action: Some("/signup".into()),
            fields: HashMap::from([
                ("password".to_string(), "abc".to_string()),
                ("email".to_string(), "a@b.com".to_string()),
            ]),
        });
        assert_eq!(payload.fields["password"], "***");
        assert_eq!(payload.fields["email"], "a@b.com");
    }

    #[test]
    fn test_identify_drops_null_traits() {
        let payload = identify(Identity {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            email: None,
            name: Some("Jane".into()),
            ..Default::default()
        });
        assert_eq!(payload.traits["name"], json!("Jane"));
        assert!(!payload.traits.contains_key("email"));
        assert!(!payload.traits.contains_key("phone"));
    }

    #[test]
    fn test_identify_merges_extra_traits() {
        let payload = identify(Identity {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            email: Some("a@b.com".into()),
            user_id: Some("u-42".into()),
            extra_traits: HashMap::from([
                ("plan".to_string(), json!("pro")),
                ("seats".to_string(), json!(5)),
                ("discarded".to_string(), serde_json::Value::Null),
            ]),
            ..Default::default()
        });
        assert_eq!(payload.traits["email"], json!("a@b.com"));
        assert_eq!(payload.traits["userId"], json!("u-42"));
        assert_eq!(payload.traits["plan"], json!("pro"));
        assert_eq!(payload.traits["seats"], json!(5));
        assert!(!payload.traits.contains_key("discarded"));
        assert_eq!(payload.user_id.as_deref(), Some("u-42"));
    }

    #[test]
    fn test_session_end_carries_exit_page_twice() {
        let payload = session_end("s-1", Some("https://example.com/bye".into()));
        assert_eq!(payload.url.as_deref(), Some("https://example.com/bye"));
        assert_eq!(payload.path.as_deref(), Some("https://example.com/bye"));
        assert_eq!(payload.session_id, "s-1");
    }
}
