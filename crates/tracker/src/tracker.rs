//! The tracker facade — builds payloads and hands them straight to the
//! transport. Immutable after construction; share one instance per process
//! or per request, no locking needed.

use tracing::debug;

use crate::builders::{
    self, CustomEvent, FormSubmission, Identity, PageView, SessionHandle, SessionStart,
};
use crate::config::TrackerConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::events::EventKind;
use crate::transport::CollectorClient;

#[derive(Debug)]
pub struct Tracker {
    config: TrackerConfig,
    client: CollectorClient,
}

impl Tracker {
    /// Create a tracker. Fails fast on an empty API key so a misconfigured
    /// deployment is caught at startup rather than with silent non-delivery.
    pub fn new(config: TrackerConfig) -> TrackerResult<Self> {
        if config.api_key.is_empty() {
            return Err(TrackerError::MissingApiKey);
        }
        let client = CollectorClient::new(&config)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Start a session. Generates a session id when the caller supplies
    /// none and returns the resolved identifier pair for persistence.
    pub async fn start_session(&self, opts: SessionStart) -> SessionHandle {
        let (payload, handle) = builders::session_start(opts);
        let delivered = self.client.send(EventKind::SessionStart, &payload).await;
        debug!(
            visitor_id = %handle.visitor_id,
            session_id = %handle.session_id,
            delivered,
            "session started"
        );
        handle
    }

    pub async fn track_page_view(&self, opts: PageView) -> bool {
        let payload = builders::page_view(opts);
        self.client.send(EventKind::PageView, &payload).await
    }

    pub async fn track_event(&self, opts: CustomEvent) -> bool {
        let payload = builders::custom_event(opts);
        self.client.send(EventKind::EventsBatch, &payload).await
    }

    pub async fn track_form_submission(&self, opts: FormSubmission) -> bool {
        let payload = builders::form_submission(opts);
        self.client.send(EventKind::FormSubmit, &payload).await
    }

    pub async fn identify(&self, opts: Identity) -> bool {
        let payload = builders::identify(opts);
        self.client.send(EventKind::UserIdentify, &payload).await
    }

    pub async fn end_session(
        &self,
        visitor_id: &str,
        session_id: &str,
        exit_page: Option<String>,
    ) -> bool {
        let payload = builders::session_end(session_id, exit_page);
        let delivered = self.client.send(EventKind::PageLeave, &payload).await;
        debug!(visitor_id, session_id, delivered, "session ended");
        delivered
    }
}

/// Synchronous wrapper for hosts without an async runtime. Owns a
/// current-thread runtime and blocks on each call, preserving the
/// one-request-per-call contract.
pub struct BlockingTracker {
    inner: Tracker,
    runtime: tokio::runtime::Runtime,
}

impl BlockingTracker {
    pub fn new(config: TrackerConfig) -> TrackerResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| TrackerError::Runtime(err.to_string()))?;
        Ok(Self {
            inner: Tracker::new(config)?,
            runtime,
        })
    }

    pub fn start_session(&self, opts: SessionStart) -> SessionHandle {
        self.runtime.block_on(self.inner.start_session(opts))
    }

    pub fn track_page_view(&self, opts: PageView) -> bool {
        self.runtime.block_on(self.inner.track_page_view(opts))
    }

    pub fn track_event(&self, opts: CustomEvent) -> bool {
        self.runtime.block_on(self.inner.track_event(opts))
    }

    pub fn track_form_submission(&self, opts: FormSubmission) -> bool {
        self.runtime.block_on(self.inner.track_form_submission(opts))
    }

    pub fn identify(&self, opts: Identity) -> bool {
        self.runtime.block_on(self.inner.identify(opts))
    }

    pub fn end_session(
        &self,
        visitor_id: &str,
        session_id: &str,
        exit_page: Option<String>,
    ) -> bool {
        self.runtime
            .block_on(self.inner.end_session(visitor_id, session_id, exit_page))
    }
}
