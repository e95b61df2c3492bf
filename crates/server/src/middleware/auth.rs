use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use pigeon_shared::constants::SESSION_COOKIE_NAME;

use crate::error::AppError;
use crate::models::AuthUser;
use crate::services::accounts;
use crate::AppState;

/// Extract the session token from `Authorization` (with or without the
/// `Bearer` scheme) or from the session cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let token_from_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim().to_string())
        .filter(|t| !t.is_empty());

    token_from_header.or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    })
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

        accounts::authenticate(state.stores.users.as_ref(), &token).await
    }
}
