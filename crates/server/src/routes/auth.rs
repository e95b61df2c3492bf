use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use pigeon_shared::constants::SESSION_COOKIE_NAME;

use crate::error::{AppError, AppResult};
use crate::middleware::json::ApiJson;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::services::accounts;
use crate::AppState;

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let user = accounts::register(state.stores.users.as_ref(), body).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered",
            user_id: user.id,
        }),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let ttl = chrono::Duration::days(state.config.session_ttl_days);
    let outcome = accounts::login(state.stores.users.as_ref(), body, ttl).await?;

    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE_NAME,
        outcome.token,
        ttl.num_seconds()
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::internal("Failed to build session cookie", e))?,
    );

    Ok((
        StatusCode::OK,
        headers,
        Json(LoginResponse {
            message: "Login successful",
            user_id: outcome.user.id,
            token: outcome.token,
        }),
    ))
}
