use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Metadata row for one stored recording. `filepath` is the storage key.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Recording {
    pub id: i64,
    pub user_id: i64,
    pub filepath: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
