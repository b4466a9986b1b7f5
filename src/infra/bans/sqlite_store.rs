// SQLite implementation of the BanStore trait.
//
// Bans live in their own database file, separate from the score ledgers.

use crate::core::bans::{BanError, BanRecord, BanStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use std::str::FromStr;

#[derive(Clone)]
pub struct SqliteBanStore {
    pool: Pool<Sqlite>,
}

impl SqliteBanStore {
    /// Open (or create) the ban database at the given path.
    pub async fn new(database_path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", database_path))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create the bannedIDs table and its unique index. Fatal on failure.
    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bannedIDs (
                id TEXT PRIMARY KEY,
                banDate DATE
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_bannedIDs_id ON bannedIDs (id);")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl BanStore for SqliteBanStore {
    async fn check_ban(&self, user_id: &str) -> Result<Option<BanRecord>, BanError> {
        let row = sqlx::query("SELECT id, banDate FROM bannedIDs WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BanError::StorageError(e.to_string()))?;

        Ok(row.map(|row| {
            let ban_date_str: String = row.get("banDate");
            let ban_date = DateTime::parse_from_rfc3339(&ban_date_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());

            BanRecord {
                user_id: row.get("id"),
                ban_date,
            }
        }))
    }

    async fn ban(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), BanError> {
        sqlx::query(
            r#"
            INSERT INTO bannedIDs (id, banDate)
            VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET
                banDate = excluded.banDate
            "#,
        )
        .bind(user_id)
        .bind(at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| BanError::StorageError(e.to_string()))?;

        Ok(())
    }

    async fn unban(&self, user_id: &str) -> Result<bool, BanError> {
        let result = sqlx::query("DELETE FROM bannedIDs WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| BanError::StorageError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::NamedTempFile;

    async fn temp_store() -> SqliteBanStore {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap().to_owned();
        drop(tmp);
        SqliteBanStore::new(&path).await.unwrap()
    }

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 14, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn ban_check_unban_round_trip() {
        let store = temp_store().await;

        store.ban("123", when()).await.unwrap();
        let record = store.check_ban("123").await.unwrap().unwrap();
        assert_eq!(record.user_id, "123");
        assert_eq!(record.ban_date, when());

        assert!(store.unban("123").await.unwrap());
        assert!(store.check_ban("123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unban_of_absent_id_is_a_noop() {
        let store = temp_store().await;
        assert!(!store.unban("999").await.unwrap());
    }

    #[tokio::test]
    async fn reban_replaces_the_date() {
        let store = temp_store().await;
        let later = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();

        store.ban("123", when()).await.unwrap();
        store.ban("123", later).await.unwrap();

        let record = store.check_ban("123").await.unwrap().unwrap();
        assert_eq!(record.ban_date, later);
    }
}
