// Monthly rollover logic for the monthly point ledger.
//
// The ledger carries a sentinel row recording which calendar month its
// rows belong to. A periodic check compares that month against the wall
// clock and wipes the ledger when they disagree. The check is idempotent,
// so running it every second is safe and the next tick is the retry unit
// when one tick fails.

use crate::core::scores::{ScoreError, ScoreStore};
use chrono::{DateTime, Datelike, Utc};

/// What a single rollover check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// Sentinel month matches the real month; nothing to do.
    Current,
    /// No sentinel existed yet; one was seeded with the current month.
    Seeded { month: u32 },
    /// Month changed; the monthly ledger was wiped and re-seeded.
    Reset { from: u32, to: u32 },
}

pub struct RolloverService<S: ScoreStore> {
    store: S,
}

impl<S: ScoreStore> RolloverService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Seed the sentinel on startup if the monthly ledger is brand new.
    /// Safe to call when the sentinel already exists.
    pub async fn ensure_sentinel(&self, now: DateTime<Utc>) -> Result<(), ScoreError> {
        if self.store.get_month_sentinel().await?.is_none() {
            let month = now.month();
            self.store.set_month_sentinel(month).await?;
            tracing::info!("Seeded monthly ledger sentinel with month {:02}", month);
        }
        Ok(())
    }

    /// Run one rollover check against the given wall-clock time.
    ///
    /// Comparison is by month number only; the year is not tracked, so a
    /// downtime gap of twelve whole months lands back on the same month and
    /// skips the reset. Known limitation, accepted.
    pub async fn run_check(&self, now: DateTime<Utc>) -> Result<RolloverOutcome, ScoreError> {
        let real_month = now.month();

        let ledger_month = match self.store.get_month_sentinel().await? {
            Some(month) => month,
            None => {
                self.store.set_month_sentinel(real_month).await?;
                return Ok(RolloverOutcome::Seeded { month: real_month });
            }
        };

        if ledger_month == real_month {
            return Ok(RolloverOutcome::Current);
        }

        tracing::info!(
            "The monthly leaderboard has expired ({:02} -> {:02}), resetting for the new month",
            ledger_month,
            real_month
        );
        self.store.reset_monthly(real_month).await?;
        tracing::info!("The monthly leaderboard has been reset");

        Ok(RolloverOutcome::Reset {
            from: ledger_month,
            to: real_month,
        })
    }
}
