//! HTTP transport to the collection endpoint.
//!
//! Fire-and-forget with a boolean acknowledgement: one POST per event, no
//! retry, no backoff, no queue. Any non-200 status and any transport
//! failure collapse to `false`; delivery problems never reach the host
//! application as errors.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::config::TrackerConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::events::{Envelope, EventKind};

/// Client for the collection endpoint. Holds only the connection pool and
/// immutable configuration, so it is safe to share across tasks.
#[derive(Debug)]
pub struct CollectorClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    debug: bool,
}

impl CollectorClient {
    pub fn new(config: &TrackerConfig) -> TrackerResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| TrackerError::Http(err.to_string()))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            debug: config.debug,
        })
    }

    /// POST one envelope. `true` only for an exact 200 response; every other
    /// status and every transport failure returns `false`.
    pub async fn send<T: Serialize>(&self, kind: EventKind, data: &T) -> bool {
        let data = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(err) => {
                debug!(kind = %kind, error = %err, "event payload failed to serialize");
                return false;
            }
        };
        let envelope = Envelope {
            api_key: self.api_key.clone(),
            kind,
            data,
        };

        if self.debug {
            debug!(
                kind = %kind,
                payload = %serde_json::to_string(&envelope).unwrap_or_default(),
                "sending tracking event"
            );
        }

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&envelope)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                if self.debug {
                    let body = response.text().await.unwrap_or_default();
                    debug!(kind = %kind, status = status.as_u16(), body = %body, "collector response");
                }
                status == StatusCode::OK
            }
            Err(err) => {
                debug!(kind = %kind, error = %err, "event delivery failed");
                false
            }
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
