//! Siteline server-side tracking SDK — visitor identity, session lifecycle,
//! and event delivery to a Siteline collection endpoint.
//!
//! # Modules
//!
//! - [`config`] — Tracker configuration (API key, endpoint, timeout, debug)
//! - [`error`] — Error types surfaced at construction time
//! - [`identity`] — Visitor fingerprinting and session id generation
//! - [`events`] — Wire envelope and per-event payload types
//! - [`sanitize`] — Sensitive form-field masking
//! - [`builders`] — Pure payload constructors
//! - [`transport`] — HTTP client for the collection endpoint
//! - [`hooks`] — Framework-agnostic request-hook logic shared by the
//!   web-framework integrations
//! - [`tracker`] — The [`Tracker`] facade tying it all together
//!
//! # Example
//!
//! ```no_run
//! use siteline_tracker::{PageView, Tracker, TrackerConfig};
//!
//! # async fn run() -> Result<(), siteline_tracker::TrackerError> {
//! let tracker = Tracker::new(TrackerConfig::new("your-api-key"))?;
//!
//! let session = tracker.start_session(Default::default()).await;
//! tracker
//!     .track_page_view(PageView {
//!         visitor_id: session.visitor_id.clone(),
//!         session_id: session.session_id.clone(),
//!         url: "https://example.com/products".to_string(),
//!         title: Some("Products".to_string()),
//!         ..Default::default()
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod builders;
pub mod config;
pub mod error;
pub mod events;
pub mod hooks;
pub mod identity;
pub mod sanitize;
pub mod tracker;
pub mod transport;

pub use builders::{
    CustomEvent, FormSubmission, Identity, PageView, SessionHandle, SessionStart,
};
pub use config::{TrackerConfig, DEFAULT_ENDPOINT};
pub use error::{TrackerError, TrackerResult};
pub use events::{Envelope, EventKind, UtmParams};
pub use hooks::{HookState, RequestMeta, ResolvedSession};
pub use identity::{new_session_id, visitor_id_from_fingerprint};
pub use tracker::{BlockingTracker, Tracker};
pub use transport::CollectorClient;
