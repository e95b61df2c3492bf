use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use pigeon_shared::constants::ABSENT_ID;

/// Discriminator tag stored on every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    Private,
    Group,
}

impl ConversationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "private" => Ok(Self::Private),
            "group" => Ok(Self::Group),
            other => Err(format!("unknown conversation kind '{}'", other)),
        }
    }
}

/// Where a message goes. Exactly one addressing field exists per message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressee {
    Private { recipient_id: String },
    Group { group_id: String },
}

impl Addressee {
    pub fn kind(&self) -> ConversationKind {
        match self {
            Self::Private { .. } => ConversationKind::Private,
            Self::Group { .. } => ConversationKind::Group,
        }
    }

    pub fn recipient_id(&self) -> Option<&str> {
        match self {
            Self::Private { recipient_id } => Some(recipient_id),
            Self::Group { .. } => None,
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        match self {
            Self::Group { group_id } => Some(group_id),
            Self::Private { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: String,
    pub sender_id: String,
    pub addressee: Addressee,
    pub content: String,
    pub media_url: Option<String>,
    pub caption: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A persisted message. `seq` is the store's insertion counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub seq: i64,
    pub id: String,
    pub sender_id: String,
    pub addressee: Addressee,
    pub content: String,
    pub media_url: Option<String>,
    pub caption: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn from_new(message: NewMessage, seq: i64) -> Self {
        Self {
            seq,
            id: message.id,
            sender_id: message.sender_id,
            addressee: message.addressee,
            content: message.content,
            media_url: message.media_url,
            caption: message.caption,
            timestamp: message.timestamp,
        }
    }

    pub fn kind(&self) -> ConversationKind {
        self.addressee.kind()
    }
}

/// Selects the messages of one conversation thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFilter {
    Group { group_id: String },
    /// Both directions between the two participants.
    Private { caller_id: String, peer_id: String },
}

impl MessageFilter {
    pub fn kind(&self) -> ConversationKind {
        match self {
            Self::Group { .. } => ConversationKind::Group,
            Self::Private { .. } => ConversationKind::Private,
        }
    }

    pub fn matches(&self, message: &Message) -> bool {
        match (self, &message.addressee) {
            (Self::Group { group_id }, Addressee::Group { group_id: target }) => group_id == target,
            (Self::Private { caller_id, peer_id }, Addressee::Private { recipient_id }) => {
                (&message.sender_id == caller_id && recipient_id == peer_id)
                    || (&message.sender_id == peer_id && recipient_id == caller_id)
            }
            _ => false,
        }
    }
}

/// Client-facing message record with a uniform shape for both kinds.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConversationKind,
    pub sender_id: String,
    pub sender_name: String,
    pub recipient_id: String,
    pub group_id: String,
    pub content: String,
    pub media_url: Option<String>,
    pub caption: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl MessageView {
    pub fn new(message: Message, sender_name: String) -> Self {
        let kind = message.kind();
        let recipient_id = message
            .addressee
            .recipient_id()
            .unwrap_or(ABSENT_ID)
            .to_string();
        let group_id = message.addressee.group_id().unwrap_or(ABSENT_ID).to_string();
        Self {
            id: message.id,
            kind,
            sender_id: message.sender_id,
            sender_name,
            recipient_id,
            group_id,
            content: message.content,
            media_url: message.media_url,
            caption: message.caption,
            timestamp: message.timestamp,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub caption: Option<String>,
    pub group_id: Option<String>,
    pub recipient_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub message: &'static str,
    pub data: MessageView,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub kind: Option<String>,
}
