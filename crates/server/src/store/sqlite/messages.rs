use async_trait::async_trait;

use super::{decode_timestamp, SqliteStore};
use crate::models::{format_timestamp, Addressee, Message, MessageFilter, NewMessage};
use crate::store::{MessageStore, StoreError, StoreResult};

#[derive(sqlx::FromRow)]
struct MessageRow {
    seq: i64,
    id: String,
    kind: String,
    sender_id: String,
    recipient_id: Option<String>,
    group_id: Option<String>,
    content: String,
    media_url: Option<String>,
    caption: Option<String>,
    timestamp: String,
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let addressee = match (row.kind.as_str(), row.recipient_id, row.group_id) {
            ("private", Some(recipient_id), None) => Addressee::Private { recipient_id },
            ("group", None, Some(group_id)) => Addressee::Group { group_id },
            (kind, _, _) => {
                return Err(StoreError::Corrupt(format!(
                    "message {} has inconsistent addressing for kind '{}'",
                    row.id, kind
                )))
            }
        };

        Ok(Message {
            timestamp: decode_timestamp(&row.timestamp, "messages.timestamp")?,
            seq: row.seq,
            id: row.id,
            sender_id: row.sender_id,
            addressee,
            content: row.content,
            media_url: row.media_url,
            caption: row.caption,
        })
    }
}

const MESSAGE_COLUMNS: &str =
    "seq, id, kind, sender_id, recipient_id, group_id, content, media_url, caption, timestamp";

#[async_trait]
impl MessageStore for SqliteStore {
    async fn insert_message(&self, message: &NewMessage) -> StoreResult<Message> {
        let result = sqlx::query(
            r#"INSERT INTO "messages" (id, kind, sender_id, recipient_id, group_id, content, media_url, caption, timestamp)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&message.id)
        .bind(message.addressee.kind().as_str())
        .bind(&message.sender_id)
        .bind(message.addressee.recipient_id())
        .bind(message.addressee.group_id())
        .bind(&message.content)
        .bind(&message.media_url)
        .bind(&message.caption)
        .bind(format_timestamp(message.timestamp))
        .execute(self.pool())
        .await?;

        Ok(Message::from_new(message.clone(), result.last_insert_rowid()))
    }

    async fn find_messages(&self, filter: &MessageFilter) -> StoreResult<Vec<Message>> {
        let rows = match filter {
            MessageFilter::Group { group_id } => {
                let sql = format!(
                    r#"SELECT {} FROM "messages"
                       WHERE kind = 'group' AND group_id = ?
                       ORDER BY timestamp ASC, seq ASC"#,
                    MESSAGE_COLUMNS
                );
                sqlx::query_as::<_, MessageRow>(&sql)
                    .bind(group_id)
                    .fetch_all(self.pool())
                    .await?
            }
            MessageFilter::Private { caller_id, peer_id } => {
                let sql = format!(
                    r#"SELECT {} FROM "messages"
                       WHERE kind = 'private'
                         AND ((sender_id = ? AND recipient_id = ?) OR (sender_id = ? AND recipient_id = ?))
                       ORDER BY timestamp ASC, seq ASC"#,
                    MESSAGE_COLUMNS
                );
                sqlx::query_as::<_, MessageRow>(&sql)
                    .bind(caller_id)
                    .bind(peer_id)
                    .bind(peer_id)
                    .bind(caller_id)
                    .fetch_all(self.pool())
                    .await?
            }
        };

        rows.into_iter().map(Message::try_from).collect()
    }
}
