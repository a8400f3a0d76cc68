//! Per-route secret checks.
//!
//! # Responsibilities
//! - Accept or reject a resolved request against its route's secret
//!
//! # Design Decisions
//! - Empty secret = open route, accepts unconditionally
//! - Path and `Authorization` checks are substring containment, the
//!   `X-Receiver-Token` check is exact equality; this asymmetry is
//!   observable behavior and stays as-is
//! - A rejection carries no hint of which check failed

/// Header carrying the exact-match token.
pub const RECEIVER_TOKEN_HEADER: &str = "x-receiver-token";

/// Check a request's credentials against a route secret.
///
/// `authorization` and `receiver_token` are the raw header values,
/// `None` when absent.
pub fn authorized(
    secret: &str,
    path: &str,
    authorization: Option<&str>,
    receiver_token: Option<&str>,
) -> bool {
    if secret.is_empty() {
        return true;
    }
    if path.contains(secret) {
        return true;
    }
    if authorization.is_some_and(|v| v.contains(secret)) {
        return true;
    }
    receiver_token == Some(secret)
}
