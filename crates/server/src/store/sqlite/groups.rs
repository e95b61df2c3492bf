use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{decode_timestamp, SqliteStore};
use crate::models::{format_timestamp, Group};
use crate::store::{GroupStore, StoreResult};

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: String,
    name: String,
    created_by: String,
    created_at: String,
    updated_at: String,
}

impl SqliteStore {
    async fn member_ids(&self, group_id: &str) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"SELECT user_id FROM "group_members" WHERE group_id = ? ORDER BY position ASC"#,
        )
        .bind(group_id)
        .fetch_all(self.pool())
        .await?;
        Ok(ids)
    }

    async fn hydrate_group(&self, row: GroupRow) -> StoreResult<Group> {
        let members = self.member_ids(&row.id).await?;
        Ok(Group {
            created_at: decode_timestamp(&row.created_at, "groups.created_at")?,
            updated_at: decode_timestamp(&row.updated_at, "groups.updated_at")?,
            id: row.id,
            name: row.name,
            created_by: row.created_by,
            members,
        })
    }
}

#[async_trait]
impl GroupStore for SqliteStore {
    async fn insert_group(&self, group: &Group) -> StoreResult<()> {
        let created_at = format_timestamp(group.created_at);
        let updated_at = format_timestamp(group.updated_at);

        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"INSERT INTO "groups" (id, name, created_by, created_at, updated_at) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(&group.created_by)
        .bind(&created_at)
        .bind(&updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, user_id) in group.members.iter().enumerate() {
            sqlx::query(
                r#"INSERT OR IGNORE INTO "group_members" (group_id, user_id, position, joined_at) VALUES (?, ?, ?, ?)"#,
            )
            .bind(&group.id)
            .bind(user_id)
            .bind(position as i64)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_group(&self, id: &str) -> StoreResult<Option<Group>> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"SELECT id, name, created_by, created_at, updated_at FROM "groups" WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate_group(row).await?)),
            None => Ok(None),
        }
    }

    async fn add_member(
        &self,
        group_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let at = format_timestamp(at);
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO "group_members" (group_id, user_id, position, joined_at)
               VALUES (?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM "group_members" WHERE group_id = ?), ?)"#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(group_id)
        .bind(&at)
        .execute(self.pool())
        .await?;

        let added = result.rows_affected() == 1;
        if added {
            sqlx::query(r#"UPDATE "groups" SET updated_at = ? WHERE id = ?"#)
                .bind(&at)
                .bind(group_id)
                .execute(self.pool())
                .await?;
        }
        Ok(added)
    }

    async fn groups_for_member(&self, user_id: &str) -> StoreResult<Vec<Group>> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"SELECT g.id, g.name, g.created_by, g.created_at, g.updated_at
               FROM "group_members" m
               INNER JOIN "groups" g ON g.id = m.group_id
               WHERE m.user_id = ?
               ORDER BY g.created_at ASC, g.rowid ASC"#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            groups.push(self.hydrate_group(row).await?);
        }
        Ok(groups)
    }
}
