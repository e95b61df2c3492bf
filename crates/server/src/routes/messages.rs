use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::middleware::json::ApiJson;
use crate::models::{AuthUser, ConversationKind, MessageQuery, SendMessageRequest, SendMessageResponse};
use crate::services::messages;
use crate::AppState;

/// POST /messages
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(body): ApiJson<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    let data = messages::append_message(&state.stores, &user, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            message: "Message sent",
            data,
        }),
    ))
}

/// GET /messages/{targetId}
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(target_id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> AppResult<impl IntoResponse> {
    let kind = query
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::parse::<ConversationKind>)
        .transpose()
        .map_err(AppError::invalid)?;

    let items = messages::list_messages(&state.stores, &user, &target_id, kind).await?;
    Ok(Json(serde_json::json!({ "messages": items })))
}
