use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{decode_timestamp, is_unique_violation, SqliteStore};
use crate::models::{format_timestamp, AuthUser, Credential, NewSession, NewUser, User};
use crate::store::{StoreError, StoreResult, UserStore};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    profile_photo: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            created_at: decode_timestamp(&row.created_at, "user.created_at")?,
            updated_at: decode_timestamp(&row.updated_at, "user.updated_at")?,
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            profile_photo: row.profile_photo,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password: String,
}

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, profile_photo, created_at, updated_at";

/// Escape LIKE wildcards so a search fragment matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        let created_at = format_timestamp(user.created_at);
        let result = sqlx::query(
            r#"INSERT INTO "user" (id, username, email, password, first_name, last_name, profile_photo, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, NULL, ?, ?)"#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&created_at)
        .bind(&created_at)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(User {
                id: user.id.clone(),
                username: user.username.clone(),
                email: user.email.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                profile_photo: None,
                created_at: user.created_at,
                updated_at: user.created_at,
            }),
            Err(e) if is_unique_violation(&e) => {
                Err(StoreError::Duplicate("Username or email".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        let sql = format!(r#"SELECT {} FROM "user" WHERE id = ?"#, USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_credential(&self, identifier: &str) -> StoreResult<Option<Credential>> {
        let sql = format!(
            r#"SELECT {}, password FROM "user" WHERE username = ? OR email = ? LIMIT 1"#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, CredentialRow>(&sql)
            .bind(identifier)
            .bind(identifier.to_lowercase())
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(Credential {
                user: row.user.try_into()?,
                password_hash: row.password,
            })),
            None => Ok(None),
        }
    }

    async fn username_or_email_taken(&self, username: &str, email: &str) -> StoreResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM "user" WHERE username = ? OR email = ?"#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(self.pool())
        .await?;
        Ok(count > 0)
    }

    async fn insert_friend_edge(&self, user_id: &str, friend_id: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO "friendships" (user_id, friend_id, created_at) VALUES (?, ?, ?)"#,
        )
        .bind(user_id)
        .bind(friend_id)
        .bind(format_timestamp(Utc::now()))
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn friend_ids(&self, user_id: &str) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"SELECT friend_id FROM "friendships" WHERE user_id = ? ORDER BY rowid ASC"#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(ids)
    }

    async fn search_users(&self, fragment: &str, exclude_id: &str) -> StoreResult<Vec<User>> {
        // LIKE is case-insensitive for ASCII in SQLite
        let sql = format!(
            r#"SELECT {} FROM "user"
               WHERE username LIKE ? ESCAPE '\' AND id <> ?
               ORDER BY username ASC"#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(like_pattern(fragment))
            .bind(exclude_id)
            .fetch_all(self.pool())
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn insert_session(&self, session: &NewSession) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO "session" (id, user_id, token, expires_at, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.token)
        .bind(format_timestamp(session.expires_at))
        .bind(format_timestamp(session.created_at))
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn resolve_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<AuthUser>> {
        let row = sqlx::query_as::<_, (String, String)>(
            r#"SELECT u.id, u.username
               FROM "session" s
               JOIN "user" u ON u.id = s.user_id
               WHERE s.token = ? AND s.expires_at > ?"#,
        )
        .bind(token)
        .bind(format_timestamp(now))
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|(id, username)| AuthUser { id, username }))
    }
}
