//! Persistence ports.
//!
//! Every service receives the stores it needs as trait objects, so the same
//! logic runs against SQLite in production and against [`memory::MemoryStore`]
//! in tests. Each method is a single atomic store call; nothing here spans
//! more than one record unless stated.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::models::{
    AuthUser, Credential, Group, Message, MessageFilter, NewMessage, NewSession, NewUser, User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Duplicate(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when the username or email is taken.
    async fn insert_user(&self, user: &NewUser) -> StoreResult<User>;

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>>;

    /// Look up by username, or by email compared case-insensitively.
    async fn find_credential(&self, identifier: &str) -> StoreResult<Option<Credential>>;

    async fn username_or_email_taken(&self, username: &str, email: &str) -> StoreResult<bool>;

    /// Add `friend_id` to the friend set stored on `user_id`'s record.
    /// Returns whether the edge was newly inserted.
    async fn insert_friend_edge(&self, user_id: &str, friend_id: &str) -> StoreResult<bool>;

    /// Friend ids stored on `user_id`'s record, oldest edge first.
    async fn friend_ids(&self, user_id: &str) -> StoreResult<Vec<String>>;

    /// Case-insensitive username substring match, ordered by username.
    async fn search_users(&self, fragment: &str, exclude_id: &str) -> StoreResult<Vec<User>>;

    async fn insert_session(&self, session: &NewSession) -> StoreResult<()>;

    /// Resolve a session token that has not expired at `now`.
    async fn resolve_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<AuthUser>>;
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Persist a group together with its initial member set.
    async fn insert_group(&self, group: &Group) -> StoreResult<()>;

    async fn find_group(&self, id: &str) -> StoreResult<Option<Group>>;

    /// Conditional append to the member set. Returns whether the member was added.
    async fn add_member(
        &self,
        group_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    async fn groups_for_member(&self, user_id: &str) -> StoreResult<Vec<Group>>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message; the store assigns its insertion sequence.
    async fn insert_message(&self, message: &NewMessage) -> StoreResult<Message>;

    /// All messages matching `filter`, ordered by timestamp then insertion sequence.
    async fn find_messages(&self, filter: &MessageFilter) -> StoreResult<Vec<Message>>;
}

/// The three collections handed to every operation.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub groups: Arc<dyn GroupStore>,
    pub messages: Arc<dyn MessageStore>,
}

impl Stores {
    pub fn sqlite(pool: sqlx::SqlitePool) -> Self {
        Self::from_shared(Arc::new(sqlite::SqliteStore::new(pool)))
    }

    pub fn memory() -> Self {
        Self::from_shared(Arc::new(memory::MemoryStore::default()))
    }

    /// Build the bundle from one value implementing all three ports.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: UserStore + GroupStore + MessageStore + 'static,
    {
        Self {
            users: store.clone(),
            groups: store.clone(),
            messages: store,
        }
    }
}
