//! Masking of sensitive form fields before they leave the process.
//!
//! Matching is a case-insensitive substring check on the field NAME only;
//! values are never inspected. A field named `notes` containing a card
//! number passes through untouched — known gap, kept deliberately so the
//! rule stays predictable for integrators.

use std::collections::HashMap;

/// Keywords that mark a field name as sensitive.
const SENSITIVE_KEYWORDS: [&str; 7] = [
    "password", "secret", "token", "credit", "card", "cvv", "ssn",
];

/// Replacement written in place of a sensitive value.
const MASK: &str = "***";

/// Return true when the field name contains any sensitive keyword.
pub fn is_sensitive_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    SENSITIVE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Mask the values of sensitive fields; other entries pass through unchanged.
pub fn mask_sensitive_fields(fields: HashMap<String, String>) -> HashMap<String, String> {
    fields
        .into_iter()
        .map(|(name, value)| {
            let value = if is_sensitive_field(&name) {
                MASK.to_string()
            } else {
                value
            };
            (name, value)
        })
        .collect()
}
