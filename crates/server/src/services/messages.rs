//! Message history and append.

use std::collections::HashMap;

use pigeon_shared::constants::UNKNOWN_SENDER;
use pigeon_shared::validation::{validate_caption, validate_message_content};

use crate::error::{AppError, AppResult};
use crate::models::{
    new_id, non_blank, now, parse_id, Addressee, AuthUser, ConversationKind, MessageView,
    NewMessage, SendMessageRequest,
};
use crate::services::conversation;
use crate::store::Stores;

/// Derive the single addressing target from a request body.
fn addressee(req: &SendMessageRequest) -> AppResult<Addressee> {
    match (
        non_blank(req.group_id.as_deref()),
        non_blank(req.recipient_id.as_deref()),
    ) {
        (Some(group_id), None) => Ok(Addressee::Group {
            group_id: parse_id(group_id, "group")?,
        }),
        (None, Some(recipient_id)) => Ok(Addressee::Private {
            recipient_id: parse_id(recipient_id, "recipient")?,
        }),
        (Some(_), Some(_)) => Err(AppError::invalid(
            "Specify either recipient_id or group_id, not both",
        )),
        (None, None) => Err(AppError::invalid("Recipient or group ID required")),
    }
}

/// Persist a new message from `sender`. Not idempotent: every call inserts.
///
/// Neither group membership nor recipient existence is checked.
pub async fn append_message(
    stores: &Stores,
    sender: &AuthUser,
    req: SendMessageRequest,
) -> AppResult<MessageView> {
    let content = req.content.clone().unwrap_or_default();
    validate_message_content(&content).map_err(AppError::invalid)?;
    let caption = non_blank(req.caption.as_deref()).map(str::to_string);
    if let Some(caption) = &caption {
        validate_caption(caption).map_err(AppError::invalid)?;
    }
    let addressee = addressee(&req)?;

    let message = NewMessage {
        id: new_id(),
        sender_id: sender.id.clone(),
        addressee,
        content,
        media_url: non_blank(req.media_url.as_deref()).map(str::to_string),
        caption,
        timestamp: now(),
    };
    let stored = stores.messages.insert_message(&message).await?;

    tracing::info!(
        "{} message {} appended by {}",
        stored.kind(),
        stored.id,
        sender.id
    );
    Ok(MessageView::new(stored, sender.username.clone()))
}

/// The ordered history of the conversation `target_id` names for `caller`.
pub async fn list_messages(
    stores: &Stores,
    caller: &AuthUser,
    target_id: &str,
    kind: Option<ConversationKind>,
) -> AppResult<Vec<MessageView>> {
    let filter =
        conversation::resolve(stores.groups.as_ref(), &caller.id, target_id, kind).await?;
    let messages = stores.messages.find_messages(&filter).await?;

    let mut names: HashMap<String, String> = HashMap::new();
    names.insert(caller.id.clone(), caller.username.clone());

    let mut views = Vec::with_capacity(messages.len());
    for message in messages {
        let sender_name = match names.get(&message.sender_id) {
            Some(name) => name.clone(),
            None => {
                let name = stores
                    .users
                    .find_user(&message.sender_id)
                    .await?
                    .map(|u| u.username)
                    .unwrap_or_else(|| UNKNOWN_SENDER.to_string());
                names.insert(message.sender_id.clone(), name.clone());
                name
            }
        };
        views.push(MessageView::new(message, sender_name));
    }

    tracing::debug!(
        "listed {} {} messages for {}",
        views.len(),
        filter.kind(),
        caller.id
    );
    Ok(views)
}
