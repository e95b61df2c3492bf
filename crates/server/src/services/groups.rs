//! Group registry: creation, membership and lookup.
//!
//! Membership is not checked against the caller for any of these
//! operations; any authenticated user may add members or read details.

use pigeon_shared::validation::validate_group_name;

use crate::error::{AppError, AppResult};
use crate::models::{
    new_id, non_blank, now, parse_id, AuthUser, CreateGroupRequest, Group, GroupDetails,
    UserSummary,
};
use crate::store::{GroupStore, UserStore};

pub async fn create_group(
    users: &dyn UserStore,
    groups: &dyn GroupStore,
    creator: &AuthUser,
    req: CreateGroupRequest,
) -> AppResult<Group> {
    let name = non_blank(req.name.as_deref())
        .ok_or_else(|| AppError::invalid("Group name is required"))?
        .to_string();
    validate_group_name(&name).map_err(AppError::invalid)?;

    // Creator first, then the requested members in first-seen order
    let mut members = vec![creator.id.clone()];
    for raw in &req.members {
        let id = parse_id(raw, "member")?;
        if members.contains(&id) {
            continue;
        }
        if users.find_user(&id).await?.is_none() {
            return Err(AppError::invalid(format!("Unknown member {}", id)));
        }
        members.push(id);
    }

    let created_at = now();
    let group = Group {
        id: new_id(),
        name,
        created_by: creator.id.clone(),
        members,
        created_at,
        updated_at: created_at,
    };
    groups.insert_group(&group).await?;

    tracing::info!(
        "group {} '{}' created by {} with {} members",
        group.id,
        group.name,
        creator.id,
        group.members.len()
    );
    Ok(group)
}

/// Returns whether the user was newly added; an existing member is a no-op.
pub async fn add_member(
    users: &dyn UserStore,
    groups: &dyn GroupStore,
    group_id: &str,
    user_id: Option<&str>,
) -> AppResult<bool> {
    let group_id = parse_id(group_id, "group")?;
    let user_id = match non_blank(user_id) {
        Some(raw) => parse_id(raw, "user")?,
        None => return Err(AppError::invalid("user_id is required")),
    };

    let group = groups
        .find_group(&group_id)
        .await?
        .ok_or_else(|| AppError::not_found("Group not found"))?;
    if group.has_member(&user_id) {
        return Ok(false);
    }
    if users.find_user(&user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let added = groups.add_member(&group_id, &user_id, now()).await?;
    if added {
        tracing::info!("added {} to group {}", user_id, group_id);
    }
    Ok(added)
}

pub async fn group_details(
    users: &dyn UserStore,
    groups: &dyn GroupStore,
    group_id: &str,
) -> AppResult<GroupDetails> {
    let group_id = parse_id(group_id, "group")?;
    let group = groups
        .find_group(&group_id)
        .await?
        .ok_or_else(|| AppError::not_found("Group not found"))?;

    let mut members = Vec::with_capacity(group.members.len());
    for id in &group.members {
        match users.find_user(id).await? {
            Some(user) => members.push(UserSummary::from(user)),
            None => tracing::warn!("skipping dangling member {} of group {}", id, group.id),
        }
    }

    Ok(GroupDetails {
        id: group.id,
        name: group.name,
        created_by: group.created_by,
        members,
        created_at: group.created_at,
        updated_at: group.updated_at,
    })
}

pub async fn list_groups(groups: &dyn GroupStore, user_id: &str) -> AppResult<Vec<Group>> {
    Ok(groups.groups_for_member(user_id).await?)
}
