// This is the scores module - it contains the business logic for the
// exercise point ledger. Notice how this module has NO Discord-specific
// code (no serenity, no poise imports). It works with primitive types
// (String ids, i64 points) so it could be driven by any frontend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// Reserved id for the sentinel row in the monthly ledger. Discord user ids
/// are numeric snowflakes, so this can never collide with a real user.
pub const MONTH_SENTINEL_ID: &str = "MONTH";

/// A user's all-time point total.
///
/// One row per user, created on the first award and replaced on every
/// subsequent one. Rows are never deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub user_id: String,
    pub points: i64,
    /// When the user last submitted an exercise.
    pub last_submit: DateTime<Utc>,
}

/// A user's point total for the current month only.
///
/// Same lifecycle as [`ScoreRecord`] except the whole monthly ledger is
/// wiped when the calendar month rolls over.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRecord {
    pub user_id: String,
    pub points: i64,
}

/// New totals after an award, returned so the command layer can show them.
#[derive(Debug, Clone, Copy)]
pub struct AwardOutcome {
    pub earned: i64,
    pub overall_total: i64,
    pub monthly_total: i64,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("\"{0}\" is a reserved identifier")]
    ReservedId(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================
// The core defines WHAT it needs from storage, not HOW it's implemented.
// The infra layer provides the actual implementations (SQLite, in-memory).

/// Trait for persisting the overall and monthly point ledgers.
///
/// Both `set_*` operations are upserts with replace semantics: the stored
/// row ends up with exactly the given points, never a sum. Accumulation is
/// the service's job (see [`ScoreService::award_points`]).
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Look up a user's all-time record. `None` means "no score yet".
    async fn get_score(&self, user_id: &str) -> Result<Option<ScoreRecord>, ScoreError>;

    /// Insert or replace a user's all-time record.
    async fn set_score(
        &self,
        user_id: &str,
        points: i64,
        last_submit: DateTime<Utc>,
    ) -> Result<(), ScoreError>;

    /// Look up a user's record for the current month.
    async fn get_monthly_score(&self, user_id: &str) -> Result<Option<MonthlyRecord>, ScoreError>;

    /// Insert or replace a user's record for the current month.
    async fn set_monthly_score(&self, user_id: &str, points: i64) -> Result<(), ScoreError>;

    /// Top all-time records, highest points first.
    async fn overall_leaderboard(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError>;

    /// Top records for the current month, highest points first.
    /// The sentinel row is never included.
    async fn monthly_leaderboard(&self, limit: usize) -> Result<Vec<MonthlyRecord>, ScoreError>;

    /// Which calendar month (1-12) the monthly ledger currently represents,
    /// or `None` if the sentinel has not been seeded yet.
    async fn get_month_sentinel(&self) -> Result<Option<u32>, ScoreError>;

    /// Insert or replace the sentinel row.
    async fn set_month_sentinel(&self, month: u32) -> Result<(), ScoreError>;

    /// Wipe the monthly ledger and re-seed the sentinel with `month`.
    /// Must be atomic: no reader may observe the ledger mid-reset.
    async fn reset_monthly(&self, month: u32) -> Result<(), ScoreError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Orchestrates the point ledgers on behalf of the command layer.
///
/// The store contract is replace-on-conflict, so this service owns the
/// read-add-write sequence that turns awards into running totals.
pub struct ScoreService<S: ScoreStore> {
    store: S,
}

impl<S: ScoreStore> ScoreService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Award points to a user, updating both the overall and monthly ledgers.
    pub async fn award_points(
        &self,
        user_id: &str,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<AwardOutcome, ScoreError> {
        Self::reject_reserved(user_id)?;

        let overall_total = self
            .store
            .get_score(user_id)
            .await?
            .map(|r| r.points)
            .unwrap_or(0)
            .saturating_add(amount);
        self.store.set_score(user_id, overall_total, now).await?;

        let monthly_total = self
            .store
            .get_monthly_score(user_id)
            .await?
            .map(|r| r.points)
            .unwrap_or(0)
            .saturating_add(amount);
        self.store.set_monthly_score(user_id, monthly_total).await?;

        Ok(AwardOutcome {
            earned: amount,
            overall_total,
            monthly_total,
        })
    }

    /// Overwrite a user's all-time total (admin correction). The monthly
    /// ledger is left untouched.
    pub async fn set_points(
        &self,
        user_id: &str,
        points: i64,
        now: DateTime<Utc>,
    ) -> Result<(), ScoreError> {
        Self::reject_reserved(user_id)?;
        self.store.set_score(user_id, points, now).await
    }

    /// Both records for a user, for display. Either may be absent.
    pub async fn get_user_scores(
        &self,
        user_id: &str,
    ) -> Result<(Option<ScoreRecord>, Option<MonthlyRecord>), ScoreError> {
        let overall = self.store.get_score(user_id).await?;
        let monthly = self.store.get_monthly_score(user_id).await?;
        Ok((overall, monthly))
    }

    pub async fn overall_leaderboard(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError> {
        self.store.overall_leaderboard(limit).await
    }

    pub async fn monthly_leaderboard(&self, limit: usize) -> Result<Vec<MonthlyRecord>, ScoreError> {
        self.store.monthly_leaderboard(limit).await
    }

    fn reject_reserved(user_id: &str) -> Result<(), ScoreError> {
        if user_id == MONTH_SENTINEL_ID {
            return Err(ScoreError::ReservedId(user_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::scores::InMemoryScoreStore;
    use chrono::TimeZone;

    fn service() -> ScoreService<InMemoryScoreStore> {
        ScoreService::new(InMemoryScoreStore::new())
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 14, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn award_accumulates_across_both_ledgers() {
        let svc = service();

        let first = svc.award_points("100", 10, at(8)).await.unwrap();
        assert_eq!(first.overall_total, 10);
        assert_eq!(first.monthly_total, 10);

        let second = svc.award_points("100", 5, at(9)).await.unwrap();
        assert_eq!(second.earned, 5);
        assert_eq!(second.overall_total, 15);
        assert_eq!(second.monthly_total, 15);

        let (overall, monthly) = svc.get_user_scores("100").await.unwrap();
        assert_eq!(overall.unwrap().points, 15);
        assert_eq!(monthly.unwrap().points, 15);
    }

    #[tokio::test]
    async fn award_updates_last_submit() {
        let svc = service();

        svc.award_points("100", 10, at(8)).await.unwrap();
        svc.award_points("100", 10, at(12)).await.unwrap();

        let (overall, _) = svc.get_user_scores("100").await.unwrap();
        assert_eq!(overall.unwrap().last_submit, at(12));
    }

    #[tokio::test]
    async fn set_points_overwrites_without_touching_monthly() {
        let svc = service();

        svc.award_points("100", 40, at(8)).await.unwrap();
        svc.set_points("100", 7, at(9)).await.unwrap();

        let (overall, monthly) = svc.get_user_scores("100").await.unwrap();
        assert_eq!(overall.unwrap().points, 7);
        assert_eq!(monthly.unwrap().points, 40);
    }

    #[tokio::test]
    async fn unknown_user_has_no_scores() {
        let svc = service();
        let (overall, monthly) = svc.get_user_scores("999").await.unwrap();
        assert!(overall.is_none());
        assert!(monthly.is_none());
    }

    #[tokio::test]
    async fn sentinel_id_is_rejected() {
        let svc = service();

        let err = svc.award_points(MONTH_SENTINEL_ID, 10, at(8)).await;
        assert!(matches!(err, Err(ScoreError::ReservedId(_))));

        let err = svc.set_points(MONTH_SENTINEL_ID, 10, at(8)).await;
        assert!(matches!(err, Err(ScoreError::ReservedId(_))));
    }

    #[tokio::test]
    async fn leaderboards_order_by_points() {
        let svc = service();

        svc.award_points("1", 50, at(8)).await.unwrap();
        svc.award_points("2", 90, at(8)).await.unwrap();
        svc.award_points("3", 20, at(8)).await.unwrap();

        let overall = svc.overall_leaderboard(10).await.unwrap();
        let ids: Vec<&str> = overall.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);

        let monthly = svc.monthly_leaderboard(2).await.unwrap();
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].user_id, "2");
        assert_eq!(monthly[1].user_id, "1");
    }
}
