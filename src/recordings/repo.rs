use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::recordings::repo_types::Recording;

#[async_trait]
pub trait RecordingRepo: Send + Sync {
    async fn insert(&self, user_id: i64, filepath: &str) -> anyhow::Result<Recording>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Recording>>;
    /// Newest first.
    async fn list_by_user(&self, user_id: i64) -> anyhow::Result<Vec<Recording>>;
    /// Returns `false` when no row was deleted.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgRecordingRepo {
    db: PgPool,
}

impl PgRecordingRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordingRepo for PgRecordingRepo {
    async fn insert(&self, user_id: i64, filepath: &str) -> anyhow::Result<Recording> {
        let row = sqlx::query_as::<_, Recording>(
            r#"
            INSERT INTO recordings (user_id, filepath)
            VALUES ($1, $2)
            RETURNING id, user_id, filepath, created_at
            "#,
        )
        .bind(user_id)
        .bind(filepath)
        .fetch_one(&self.db)
        .await
        .context("insert recording")?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Recording>> {
        let row = sqlx::query_as::<_, Recording>(
            r#"
            SELECT id, user_id, filepath, created_at
              FROM recordings
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find recording")?;
        Ok(row)
    }

    async fn list_by_user(&self, user_id: i64) -> anyhow::Result<Vec<Recording>> {
        let rows = sqlx::query_as::<_, Recording>(
            r#"
            SELECT id, user_id, filepath, created_at
              FROM recordings
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list recordings by user")?;
        Ok(rows)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM recordings WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete recording")?;
        Ok(res.rows_affected() > 0)
    }
}
