//! Opaque authentication tokens
//!
//! Tokens are random UUID-v4 values stored on the user row. They are
//! structurally validated before any store lookup so obviously malformed
//! input is rejected without I/O.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a fresh authentication token in canonical textual form.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// Check that a presented token has the shape of a canonical token.
pub fn is_well_formed(token: &str) -> bool {
    Uuid::parse_str(token).is_ok()
}

/// Check whether a token issued at `issued_at` has outlived the configured
/// time-to-live. With no TTL configured, tokens never expire.
pub fn is_expired(issued_at: DateTime<Utc>, ttl_seconds: Option<u64>, now: DateTime<Utc>) -> bool {
    match ttl_seconds {
        Some(ttl) => now.signed_duration_since(issued_at).num_seconds() >= ttl as i64,
        None => false,
    }
}
