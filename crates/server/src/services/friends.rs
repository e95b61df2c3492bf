//! The symmetric friend graph layered over user records.
//!
//! An edge lives on both users' records and is written as two independent
//! set-union updates, requester first. A failure between the two leaves a
//! half-applied edge (A lists B, B does not list A). Because both updates
//! are idempotent, repeating `add_friend` from either side completes it.

use crate::error::{AppError, AppResult};
use crate::models::{parse_id, AuthUser, UserSummary};
use crate::store::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendOutcome {
    Created,
    AlreadyFriends,
}

pub async fn add_friend(
    users: &dyn UserStore,
    requester: &AuthUser,
    target_id: Option<&str>,
) -> AppResult<FriendOutcome> {
    let target_id = match target_id.map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => parse_id(raw, "friend")?,
        None => return Err(AppError::invalid("Invalid friend ID")),
    };
    if target_id == requester.id {
        return Err(AppError::invalid("Invalid friend ID"));
    }

    if users.find_user(&target_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let forward = users.insert_friend_edge(&requester.id, &target_id).await?;
    let backward = users.insert_friend_edge(&target_id, &requester.id).await?;

    if forward != backward {
        tracing::warn!(
            "completed half-applied friend edge between {} and {}",
            requester.id,
            target_id
        );
    }

    if forward || backward {
        tracing::info!("friend edge created: {} <-> {}", requester.id, target_id);
        Ok(FriendOutcome::Created)
    } else {
        Ok(FriendOutcome::AlreadyFriends)
    }
}

/// The user's friends as summaries. Ids that no longer resolve are skipped.
pub async fn list_friends(users: &dyn UserStore, user_id: &str) -> AppResult<Vec<UserSummary>> {
    let ids = users.friend_ids(user_id).await?;

    let mut friends = Vec::with_capacity(ids.len());
    for id in ids {
        match users.find_user(&id).await? {
            Some(user) => friends.push(UserSummary::from(user)),
            None => tracing::warn!("skipping dangling friend reference {} on {}", id, user_id),
        }
    }
    Ok(friends)
}
