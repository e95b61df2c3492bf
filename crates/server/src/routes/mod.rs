pub mod auth;
pub mod friends;
pub mod groups;
pub mod messages;
pub mod users;

use crate::AppState;
use axum::{routing::{get, post}, Router};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Identity
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/search_users", get(users::search_users))
        // Friends
        .route("/friends", get(friends::list_friends))
        .route("/add_friend", post(friends::add_friend))
        // Groups
        .route("/groups", get(groups::list_groups))
        .route("/groups/create", post(groups::create_group))
        .route("/groups/{groupId}", get(groups::get_group))
        .route("/groups/{groupId}/members", post(groups::add_member))
        // Messages
        .route("/messages", post(messages::send_message))
        .route("/messages/{targetId}", get(messages::list_messages))
        .with_state(state)
}
