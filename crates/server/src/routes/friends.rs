use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::error::AppResult;
use crate::middleware::json::ApiJson;
use crate::models::{AddFriendRequest, AddFriendResponse, AuthUser};
use crate::services::friends::{self, FriendOutcome};
use crate::AppState;

/// GET /friends
pub async fn list_friends(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let friends = friends::list_friends(state.stores.users.as_ref(), &user.id).await?;
    Ok(Json(serde_json::json!({ "friends": friends })))
}

/// POST /add_friend
pub async fn add_friend(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(body): ApiJson<AddFriendRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome =
        friends::add_friend(state.stores.users.as_ref(), &user, body.friend_id.as_deref()).await?;

    let response = match outcome {
        FriendOutcome::Created => AddFriendResponse {
            message: "Friend added",
            created: true,
        },
        FriendOutcome::AlreadyFriends => AddFriendResponse {
            message: "Already friends",
            created: false,
        },
    };
    Ok(Json(response))
}
