use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{AuthUser, UserSearchQuery};
use crate::services::accounts;
use crate::AppState;

/// GET /search_users?username=
pub async fn search_users(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<UserSearchQuery>,
) -> AppResult<impl IntoResponse> {
    let users =
        accounts::search_users(state.stores.users.as_ref(), &user, query.username.as_deref())
            .await?;
    Ok(Json(serde_json::json!({ "users": users })))
}
