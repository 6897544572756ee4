//! Visitor and session identifier generation.
//!
//! Visitor ids are derived from a device fingerprint and are stable across
//! requests from the same browser/address pair; session ids are random and
//! fresh per session. Neither is stored by this crate — cookie persistence
//! is the integration's job.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Visitor ids are the first 16 hex characters of the fingerprint digest.
/// Truncation trades global uniqueness for short, cookie-friendly tokens.
const VISITOR_ID_HEX_LEN: usize = 16;

/// Derive a stable visitor id from the request fingerprint.
///
/// Hashes `"{user_agent}:{ip_address}"` with SHA-256 and keeps the leading
/// hex characters. Deterministic; empty inputs still produce a valid id.
pub fn visitor_id_from_fingerprint(user_agent: &str, ip_address: &str) -> String {
    let digest = Sha256::digest(format!("{user_agent}:{ip_address}").as_bytes());
    hex::encode(digest)[..VISITOR_ID_HEX_LEN].to_string()
}

/// Generate a fresh random session id.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_id_is_deterministic() {
        let a = visitor_id_from_fingerprint("Mozilla/5.0", "203.0.113.1");
        let b = visitor_id_from_fingerprint("Mozilla/5.0", "203.0.113.1");
        assert_eq!(a, b);
        assert_eq!(a.len(), VISITOR_ID_HEX_LEN);
    }

    #[test]
    fn test_distinct_fingerprints_yield_distinct_ids() {
        let a = visitor_id_from_fingerprint("Mozilla/5.0", "203.0.113.1");
        let b = visitor_id_from_fingerprint("Mozilla/5.0", "203.0.113.2");
        let c = visitor_id_from_fingerprint("curl/8.0", "203.0.113.1");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_fingerprint_still_yields_valid_id() {
        let id = visitor_id_from_fingerprint("", "");
        assert_eq!(id.len(), VISITOR_ID_HEX_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        // Stable across calls even for degenerate input
        assert_eq!(id, visitor_id_from_fingerprint("", ""));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| new_session_id()).collect();
        assert_eq!(ids.len(), 100);
    }
}
