//! In-memory implementation of every store port.
//!
//! Collections live behind `tokio::sync::RwLock`s; each trait method takes
//! one lock for its duration, which gives the same per-record atomicity the
//! SQLite adapter relies on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{GroupStore, MessageStore, StoreError, StoreResult, UserStore};
use crate::models::{
    AuthUser, Credential, Group, Message, MessageFilter, NewMessage, NewSession, NewUser, User,
};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, Credential>>,
    /// user id -> friend ids in insertion order
    friends: RwLock<HashMap<String, Vec<String>>>,
    sessions: RwLock<HashMap<String, NewSession>>,
    groups: RwLock<HashMap<String, Group>>,
    messages: RwLock<Vec<Message>>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let taken = users.values().any(|c| {
            c.user.username == user.username || c.user.email == user.email
        });
        if taken || users.contains_key(&user.id) {
            return Err(StoreError::Duplicate("Username or email".into()));
        }

        let record = User {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_photo: None,
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        users.insert(
            user.id.clone(),
            Credential {
                user: record.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(record)
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(id).map(|c| c.user.clone()))
    }

    async fn find_credential(&self, identifier: &str) -> StoreResult<Option<Credential>> {
        let email = identifier.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|c| c.user.username == identifier || c.user.email == email)
            .cloned())
    }

    async fn username_or_email_taken(&self, username: &str, email: &str) -> StoreResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|c| c.user.username == username || c.user.email == email))
    }

    async fn insert_friend_edge(&self, user_id: &str, friend_id: &str) -> StoreResult<bool> {
        let mut friends = self.friends.write().await;
        let edges = friends.entry(user_id.to_string()).or_default();
        if edges.iter().any(|f| f == friend_id) {
            return Ok(false);
        }
        edges.push(friend_id.to_string());
        Ok(true)
    }

    async fn friend_ids(&self, user_id: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .friends
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn search_users(&self, fragment: &str, exclude_id: &str) -> StoreResult<Vec<User>> {
        let needle = fragment.to_lowercase();
        let mut matches: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|c| c.user.id != exclude_id)
            .filter(|c| c.user.username.to_lowercase().contains(&needle))
            .map(|c| c.user.clone())
            .collect();
        matches.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(matches)
    }

    async fn insert_session(&self, session: &NewSession) -> StoreResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn resolve_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<AuthUser>> {
        let user_id = match self.sessions.read().await.get(token) {
            Some(session) if session.expires_at > now => session.user_id.clone(),
            _ => return Ok(None),
        };
        Ok(self.users.read().await.get(&user_id).map(|c| AuthUser {
            id: c.user.id.clone(),
            username: c.user.username.clone(),
        }))
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn insert_group(&self, group: &Group) -> StoreResult<()> {
        let mut groups = self.groups.write().await;
        if groups.contains_key(&group.id) {
            return Err(StoreError::Duplicate("Group".into()));
        }
        let mut record = group.clone();
        let mut seen = Vec::with_capacity(record.members.len());
        record.members.retain(|m| {
            if seen.contains(m) {
                false
            } else {
                seen.push(m.clone());
                true
            }
        });
        groups.insert(record.id.clone(), record);
        Ok(())
    }

    async fn find_group(&self, id: &str) -> StoreResult<Option<Group>> {
        Ok(self.groups.read().await.get(id).cloned())
    }

    async fn add_member(
        &self,
        group_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut groups = self.groups.write().await;
        let group = match groups.get_mut(group_id) {
            Some(g) => g,
            None => return Ok(false),
        };
        if group.has_member(user_id) {
            return Ok(false);
        }
        group.members.push(user_id.to_string());
        group.updated_at = at;
        Ok(true)
    }

    async fn groups_for_member(&self, user_id: &str) -> StoreResult<Vec<Group>> {
        let mut groups: Vec<Group> = self
            .groups
            .read()
            .await
            .values()
            .filter(|g| g.has_member(user_id))
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(groups)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: &NewMessage) -> StoreResult<Message> {
        let mut messages = self.messages.write().await;
        if messages.iter().any(|m| m.id == message.id) {
            return Err(StoreError::Duplicate("Message".into()));
        }
        let seq = messages.len() as i64 + 1;
        let stored = Message::from_new(message.clone(), seq);
        messages.push(stored.clone());
        Ok(stored)
    }

    async fn find_messages(&self, filter: &MessageFilter) -> StoreResult<Vec<Message>> {
        let mut found: Vec<Message> = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.seq.cmp(&b.seq)));
        Ok(found)
    }
}
