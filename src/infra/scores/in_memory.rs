// In-memory implementation of ScoreStore.
//
// Used by the core service and rollover tests; mirrors the SQLite layout,
// including the sentinel living in the monthly map under its reserved id.

use crate::core::scores::{
    MonthlyRecord, ScoreError, ScoreRecord, ScoreStore, MONTH_SENTINEL_ID,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// DashMap-backed store, cloneable so the score service and the rollover
/// service can share one ledger the way they share a SQLite pool.
#[derive(Clone, Default)]
pub struct InMemoryScoreStore {
    overall: Arc<DashMap<String, ScoreRecord>>,
    monthly: Arc<DashMap<String, i64>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn get_score(&self, user_id: &str) -> Result<Option<ScoreRecord>, ScoreError> {
        Ok(self.overall.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn set_score(
        &self,
        user_id: &str,
        points: i64,
        last_submit: DateTime<Utc>,
    ) -> Result<(), ScoreError> {
        self.overall.insert(
            user_id.to_string(),
            ScoreRecord {
                user_id: user_id.to_string(),
                points,
                last_submit,
            },
        );
        Ok(())
    }

    async fn get_monthly_score(&self, user_id: &str) -> Result<Option<MonthlyRecord>, ScoreError> {
        Ok(self.monthly.get(user_id).map(|entry| MonthlyRecord {
            user_id: user_id.to_string(),
            points: *entry,
        }))
    }

    async fn set_monthly_score(&self, user_id: &str, points: i64) -> Result<(), ScoreError> {
        self.monthly.insert(user_id.to_string(), points);
        Ok(())
    }

    async fn overall_leaderboard(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError> {
        let mut records: Vec<ScoreRecord> =
            self.overall.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| b.points.cmp(&a.points));
        records.truncate(limit);
        Ok(records)
    }

    async fn monthly_leaderboard(&self, limit: usize) -> Result<Vec<MonthlyRecord>, ScoreError> {
        let mut records: Vec<MonthlyRecord> = self
            .monthly
            .iter()
            .filter(|entry| entry.key() != MONTH_SENTINEL_ID)
            .map(|entry| MonthlyRecord {
                user_id: entry.key().clone(),
                points: *entry.value(),
            })
            .collect();
        records.sort_by(|a, b| b.points.cmp(&a.points));
        records.truncate(limit);
        Ok(records)
    }

    async fn get_month_sentinel(&self) -> Result<Option<u32>, ScoreError> {
        Ok(self
            .monthly
            .get(MONTH_SENTINEL_ID)
            .map(|entry| *entry as u32))
    }

    async fn set_month_sentinel(&self, month: u32) -> Result<(), ScoreError> {
        self.monthly
            .insert(MONTH_SENTINEL_ID.to_string(), month as i64);
        Ok(())
    }

    async fn reset_monthly(&self, month: u32) -> Result<(), ScoreError> {
        self.monthly.clear();
        self.monthly
            .insert(MONTH_SENTINEL_ID.to_string(), month as i64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 14, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = InMemoryScoreStore::new();

        store.set_score("123", 10, when()).await.unwrap();
        let record = store.get_score("123").await.unwrap().unwrap();
        assert_eq!(record.points, 10);
        assert_eq!(record.last_submit, when());
    }

    #[tokio::test]
    async fn set_replaces_rather_than_accumulates() {
        let store = InMemoryScoreStore::new();

        store.set_score("123", 10, when()).await.unwrap();
        store.set_score("123", 3, when()).await.unwrap();

        let record = store.get_score("123").await.unwrap().unwrap();
        assert_eq!(record.points, 3);
    }

    #[tokio::test]
    async fn monthly_leaderboard_excludes_sentinel() {
        let store = InMemoryScoreStore::new();

        store.set_month_sentinel(5).await.unwrap();
        store.set_monthly_score("1", 30).await.unwrap();
        store.set_monthly_score("2", 60).await.unwrap();

        let board = store.monthly_leaderboard(10).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "2");
        assert!(board.iter().all(|r| r.user_id != MONTH_SENTINEL_ID));
    }
}
