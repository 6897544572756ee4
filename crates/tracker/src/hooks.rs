//! Framework-agnostic request-hook logic shared by the web integrations.
//!
//! A host-framework adapter extracts cookies and request metadata, calls
//! [`Tracker::resolve_request`] on the way in, and writes the visitor and
//! session cookies on the way out using the constants below. Page-view
//! tracking policy (every request vs. opt-in per route) is the adapter's
//! decision, not this module's.

use std::sync::Arc;

use crate::builders::{Identity, SessionStart};
use crate::events::UtmParams;
use crate::identity::{new_session_id, visitor_id_from_fingerprint};
use crate::tracker::Tracker;

/// Visitor cookie lifetime: one year.
pub const VISITOR_COOKIE_MAX_AGE_SECS: i64 = 365 * 24 * 60 * 60;

/// Session cookie lifetime: the 30-minute inactivity window. The window
/// slides only because a new request sets the cookie again.
pub const SESSION_COOKIE_MAX_AGE_SECS: i64 = 30 * 60;

/// Default cookie prefix; cookies are named `<prefix>_vid` / `<prefix>_sid`.
pub const DEFAULT_COOKIE_PREFIX: &str = "siteline";

/// Request metadata a host framework supplies for session attribution.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub user_agent: String,
    pub remote_ip: String,
    pub referrer: Option<String>,
    /// Absolute URL of the request, used as the entry page.
    pub full_url: String,
    /// Raw query string, scanned for `utm_*` parameters.
    pub query: Option<String>,
}

/// Visitor/session identifiers resolved for one request.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub visitor_id: String,
    pub session_id: String,
    pub is_new_session: bool,
}

/// Extract UTM attribution parameters from a raw query string.
pub fn utm_from_query(query: &str) -> UtmParams {
    let mut utm = UtmParams::default();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = value.into_owned();
        match key.as_ref() {
            "utm_source" => utm.utm_source = Some(value),
            "utm_medium" => utm.utm_medium = Some(value),
            "utm_campaign" => utm.utm_campaign = Some(value),
            "utm_term" => utm.utm_term = Some(value),
            "utm_content" => utm.utm_content = Some(value),
            _ => {}
        }
    }
    utm
}

impl Tracker {
    /// Resolve the visitor/session pair for an inbound request.
    ///
    /// A missing visitor cookie falls back to the request fingerprint; a
    /// missing session cookie starts a new session and fires
    /// `session.start` with the request's attribution metadata before the
    /// handler runs.
    pub async fn resolve_request(
        &self,
        visitor_cookie: Option<String>,
        session_cookie: Option<String>,
        meta: &RequestMeta,
    ) -> ResolvedSession {
        let visitor_id = visitor_cookie.unwrap_or_else(|| {
            visitor_id_from_fingerprint(&meta.user_agent, &meta.remote_ip)
        });

        match session_cookie {
            Some(session_id) => ResolvedSession {
                visitor_id,
                session_id,
                is_new_session: false,
            },
            None => {
                let session_id = new_session_id();
                let utm = meta.query.as_deref().map(utm_from_query).unwrap_or_default();
                self.start_session(SessionStart {
                    visitor_id: visitor_id.clone(),
                    session_id: Some(session_id.clone()),
                    user_agent: Some(meta.user_agent.clone()),
                    ip_address: Some(meta.remote_ip.clone()),
                    referrer: meta.referrer.clone(),
                    entry_page: Some(meta.full_url.clone()),
                    utm,
                })
                .await;
                ResolvedSession {
                    visitor_id,
                    session_id,
                    is_new_session: true,
                }
            }
        }
    }
}

/// State handed to a framework adapter: the shared tracker plus the cookie
/// prefix. Cloning is cheap; all clones point at the same tracker.
#[derive(Clone)]
pub struct HookState {
    tracker: Arc<Tracker>,
    cookie_prefix: String,
}

impl HookState {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(tracker),
            cookie_prefix: DEFAULT_COOKIE_PREFIX.to_string(),
        }
    }

    pub fn with_cookie_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cookie_prefix = prefix.into();
        self
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn visitor_cookie_name(&self) -> String {
        format!("{}_vid", self.cookie_prefix)
    }

    pub fn session_cookie_name(&self) -> String {
        format!("{}_sid", self.cookie_prefix)
    }

    /// Attach identity traits to the request's resolved visitor/session
    /// pair. The ids on `identity` are overwritten with the resolved ones.
    pub async fn identify(&self, session: &ResolvedSession, mut identity: Identity) -> bool {
        identity.visitor_id = session.visitor_id.clone();
        identity.session_id = session.session_id.clone();
        self.tracker.identify(identity).await
    }
}
