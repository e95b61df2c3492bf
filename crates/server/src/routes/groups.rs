use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::error::AppResult;
use crate::middleware::json::ApiJson;
use crate::models::{
    AddMemberRequest, AddMemberResponse, AuthUser, CreateGroupRequest, CreateGroupResponse,
    GroupResponse,
};
use crate::services::groups;
use crate::AppState;

/// GET /groups
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let groups: Vec<GroupResponse> = groups::list_groups(state.stores.groups.as_ref(), &user.id)
        .await?
        .into_iter()
        .map(GroupResponse::from)
        .collect();
    Ok(Json(serde_json::json!({ "groups": groups })))
}

/// POST /groups/create
pub async fn create_group(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(body): ApiJson<CreateGroupRequest>,
) -> AppResult<impl IntoResponse> {
    let group = groups::create_group(
        state.stores.users.as_ref(),
        state.stores.groups.as_ref(),
        &user,
        body,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGroupResponse {
            message: "Group created",
            group_id: group.id,
        }),
    ))
}

/// GET /groups/{groupId}
pub async fn get_group(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(group_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let details = groups::group_details(
        state.stores.users.as_ref(),
        state.stores.groups.as_ref(),
        &group_id,
    )
    .await?;
    Ok(Json(details))
}

/// POST /groups/{groupId}/members
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(group_id): Path<String>,
    ApiJson(body): ApiJson<AddMemberRequest>,
) -> AppResult<impl IntoResponse> {
    let added = groups::add_member(
        state.stores.users.as_ref(),
        state.stores.groups.as_ref(),
        &group_id,
        body.user_id.as_deref(),
    )
    .await?;

    let message = if added { "Member added" } else { "Already a member" };
    Ok(Json(AddMemberResponse { message, added }))
}
