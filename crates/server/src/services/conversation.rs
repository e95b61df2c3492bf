//! Conversation resolution.
//!
//! Users and groups share one id namespace, so a single target id can name
//! either. Classification is an existence probe against the group registry:
//! if the id resolves as a group the conversation is that group's thread,
//! otherwise it is the private thread between caller and target. The group
//! probe always wins, even when private messages happen to reference the
//! same id as a recipient.
//!
//! Callers that already know what they are addressing may pass an explicit
//! kind, which skips or hardens the probe.

use crate::error::{AppError, AppResult};
use crate::models::{parse_id, ConversationKind, MessageFilter};
use crate::store::GroupStore;

pub async fn resolve(
    groups: &dyn GroupStore,
    caller_id: &str,
    target_id: &str,
    kind: Option<ConversationKind>,
) -> AppResult<MessageFilter> {
    let target_id = parse_id(target_id, "target")?;

    let private = || MessageFilter::Private {
        caller_id: caller_id.to_string(),
        peer_id: target_id.clone(),
    };

    match kind {
        Some(ConversationKind::Private) => Ok(private()),
        Some(ConversationKind::Group) => match groups.find_group(&target_id).await? {
            Some(group) => Ok(MessageFilter::Group { group_id: group.id }),
            None => Err(AppError::not_found("Group not found")),
        },
        None => match groups.find_group(&target_id).await? {
            Some(group) => Ok(MessageFilter::Group { group_id: group.id }),
            None => Ok(private()),
        },
    }
}
