// SQLite implementation of the ScoreStore trait.
//
// Tables:
// - overallScores: all-time points and last submission per user
// - monthlyScores: current-month points per user, plus the sentinel row
//   keyed by the reserved "MONTH" id whose points column holds the month
//   number the table represents

use crate::core::scores::{
    MonthlyRecord, ScoreError, ScoreRecord, ScoreStore, MONTH_SENTINEL_ID,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use std::str::FromStr;

const CREATE_MONTHLY_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS monthlyScores (id TEXT PRIMARY KEY, points INTEGER);";
const CREATE_MONTHLY_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_monthlyScores_id ON monthlyScores (id);";

#[derive(Clone)]
pub struct SqliteScoreStore {
    pool: Pool<Sqlite>,
}

impl SqliteScoreStore {
    /// Open (or create) the score database at the given path.
    ///
    /// WAL journaling with synchronous=NORMAL: a crash may lose the most
    /// recent commit but cannot corrupt the store. The options are set per
    /// connection so every pooled connection carries them.
    pub async fn new(database_path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", database_path))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations to create tables and unique indexes.
    /// A failure here is fatal: the bot must not accept commands against
    /// a half-created schema.
    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS overallScores (
                id TEXT PRIMARY KEY,
                points INTEGER,
                lastSubmit DATE
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(CREATE_MONTHLY_TABLE).execute(&self.pool).await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_overallScores_id ON overallScores (id);",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(CREATE_MONTHLY_INDEX).execute(&self.pool).await?;

        Ok(())
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn get_score(&self, user_id: &str) -> Result<Option<ScoreRecord>, ScoreError> {
        let row = sqlx::query("SELECT id, points, lastSubmit FROM overallScores WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        Ok(row.map(|row| row_to_score(&row)))
    }

    async fn set_score(
        &self,
        user_id: &str,
        points: i64,
        last_submit: DateTime<Utc>,
    ) -> Result<(), ScoreError> {
        sqlx::query(
            r#"
            INSERT INTO overallScores (id, points, lastSubmit)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                points = excluded.points,
                lastSubmit = excluded.lastSubmit
            "#,
        )
        .bind(user_id)
        .bind(points)
        .bind(last_submit.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        Ok(())
    }

    async fn get_monthly_score(&self, user_id: &str) -> Result<Option<MonthlyRecord>, ScoreError> {
        let row = sqlx::query("SELECT id, points FROM monthlyScores WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        Ok(row.map(|row| MonthlyRecord {
            user_id: row.get("id"),
            points: row.get("points"),
        }))
    }

    async fn set_monthly_score(&self, user_id: &str, points: i64) -> Result<(), ScoreError> {
        sqlx::query(
            r#"
            INSERT INTO monthlyScores (id, points)
            VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET
                points = excluded.points
            "#,
        )
        .bind(user_id)
        .bind(points)
        .execute(&self.pool)
        .await
        .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        Ok(())
    }

    async fn overall_leaderboard(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError> {
        let rows = sqlx::query(
            "SELECT id, points, lastSubmit FROM overallScores ORDER BY points DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        Ok(rows.iter().map(row_to_score).collect())
    }

    async fn monthly_leaderboard(&self, limit: usize) -> Result<Vec<MonthlyRecord>, ScoreError> {
        let rows = sqlx::query(
            "SELECT id, points FROM monthlyScores WHERE id != ? ORDER BY points DESC LIMIT ?",
        )
        .bind(MONTH_SENTINEL_ID)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| MonthlyRecord {
                user_id: row.get("id"),
                points: row.get("points"),
            })
            .collect())
    }

    async fn get_month_sentinel(&self) -> Result<Option<u32>, ScoreError> {
        let row = sqlx::query("SELECT points FROM monthlyScores WHERE id = ?")
            .bind(MONTH_SENTINEL_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        Ok(row.map(|row| row.get::<i64, _>("points") as u32))
    }

    async fn set_month_sentinel(&self, month: u32) -> Result<(), ScoreError> {
        self.set_monthly_score(MONTH_SENTINEL_ID, month as i64).await
    }

    async fn reset_monthly(&self, month: u32) -> Result<(), ScoreError> {
        // Drop, recreate and re-seed inside one transaction so command
        // handlers running on other pool connections never observe the
        // table mid-recreation.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        sqlx::query("DROP TABLE monthlyScores;")
            .execute(&mut *tx)
            .await
            .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        sqlx::query(CREATE_MONTHLY_TABLE)
            .execute(&mut *tx)
            .await
            .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        sqlx::query(CREATE_MONTHLY_INDEX)
            .execute(&mut *tx)
            .await
            .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        sqlx::query("INSERT INTO monthlyScores (id, points) VALUES (?, ?)")
            .bind(MONTH_SENTINEL_ID)
            .bind(month as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| ScoreError::StorageError(e.to_string()))?;

        Ok(())
    }
}

fn row_to_score(row: &sqlx::sqlite::SqliteRow) -> ScoreRecord {
    let last_submit_str: String = row.get("lastSubmit");
    let last_submit = DateTime::parse_from_rfc3339(&last_submit_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    ScoreRecord {
        user_id: row.get("id"),
        points: row.get("points"),
        last_submit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::NamedTempFile;

    async fn temp_store() -> SqliteScoreStore {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap().to_owned();
        drop(tmp);
        SqliteScoreStore::new(&path).await.unwrap()
    }

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 14, 8, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn upsert_round_trip() {
        let store = temp_store().await;

        store.set_score("123", 42, when()).await.unwrap();

        let record = store.get_score("123").await.unwrap().unwrap();
        assert_eq!(record.user_id, "123");
        assert_eq!(record.points, 42);
        assert_eq!(record.last_submit, when());
    }

    #[tokio::test]
    async fn second_set_replaces_first() {
        let store = temp_store().await;

        store.set_score("123", 42, when()).await.unwrap();
        store.set_score("123", 7, when()).await.unwrap();

        let record = store.get_score("123").await.unwrap().unwrap();
        assert_eq!(record.points, 7);
    }

    #[tokio::test]
    async fn read_miss_is_none_not_error() {
        let store = temp_store().await;
        assert!(store.get_score("nope").await.unwrap().is_none());
        assert!(store.get_monthly_score("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn monthly_upsert_and_leaderboard_skip_sentinel() {
        let store = temp_store().await;

        store.set_month_sentinel(5).await.unwrap();
        store.set_monthly_score("1", 10).await.unwrap();
        store.set_monthly_score("2", 30).await.unwrap();
        store.set_monthly_score("1", 20).await.unwrap();

        let board = store.monthly_leaderboard(10).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "2");
        assert_eq!(board[1].points, 20);
    }

    #[tokio::test]
    async fn reset_monthly_wipes_rows_and_reseeds_sentinel() {
        let store = temp_store().await;

        store.set_month_sentinel(5).await.unwrap();
        store.set_monthly_score("1", 10).await.unwrap();
        store.set_monthly_score("2", 30).await.unwrap();

        store.reset_monthly(6).await.unwrap();

        assert_eq!(store.get_month_sentinel().await.unwrap(), Some(6));
        assert!(store.monthly_leaderboard(10).await.unwrap().is_empty());
        assert!(store.get_monthly_score("1").await.unwrap().is_none());

        // Unique index survives the recreate: upserts still replace.
        store.set_monthly_score("1", 5).await.unwrap();
        store.set_monthly_score("1", 9).await.unwrap();
        assert_eq!(
            store.get_monthly_score("1").await.unwrap().unwrap().points,
            9
        );
    }

    #[tokio::test]
    async fn overall_leaderboard_orders_and_limits() {
        let store = temp_store().await;

        store.set_score("1", 50, when()).await.unwrap();
        store.set_score("2", 90, when()).await.unwrap();
        store.set_score("3", 20, when()).await.unwrap();

        let board = store.overall_leaderboard(2).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "2");
        assert_eq!(board[1].user_id, "1");
    }

    #[tokio::test]
    async fn scores_survive_reopen() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap().to_owned();
        drop(tmp);

        {
            let store = SqliteScoreStore::new(&path).await.unwrap();
            store.set_score("123", 42, when()).await.unwrap();
        }

        let store = SqliteScoreStore::new(&path).await.unwrap();
        let record = store.get_score("123").await.unwrap().unwrap();
        assert_eq!(record.points, 42);
    }
}
