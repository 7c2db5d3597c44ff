use axum::http::{HeaderMap, Method};

use crate::errors::AppError;
use crate::permissions::AccessPolicy;
use crate::state::AppState;

pub fn is_authenticated(headers: &HeaderMap, expected_token: &str) -> bool {
    if expected_token.is_empty() {
        return false;
    }
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    auth.strip_prefix("Bearer ") == Some(expected_token)
}

/// Rejects the request unless `policy` allows it. Returns whether the caller is authenticated.
pub fn authorize(
    state: &AppState,
    method: &Method,
    headers: &HeaderMap,
    policy: AccessPolicy,
) -> Result<bool, AppError> {
    let authenticated = is_authenticated(headers, &state.config.admin_token);
    if !policy.is_allowed(method, authenticated) {
        return Err(AppError::Unauthorized);
    }
    Ok(authenticated)
}
