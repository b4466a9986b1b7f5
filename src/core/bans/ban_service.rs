// Submission bans - domain logic for keeping users out of the score ledger.
//
// A ban only blocks score submissions; it has nothing to do with Discord's
// own guild bans.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A user barred from submitting scores.
#[derive(Debug, Clone, PartialEq)]
pub struct BanRecord {
    pub user_id: String,
    pub ban_date: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum BanError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Trait for persisting submission bans.
#[async_trait]
pub trait BanStore: Send + Sync {
    /// Look up a ban. `None` means the user is not banned.
    async fn check_ban(&self, user_id: &str) -> Result<Option<BanRecord>, BanError>;

    /// Insert or replace a ban for the user.
    async fn ban(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), BanError>;

    /// Remove a ban. Returns `true` if a ban existed; removing an absent
    /// id is a no-op, not an error.
    async fn unban(&self, user_id: &str) -> Result<bool, BanError>;
}

pub struct BanService<S: BanStore> {
    store: S,
}

impl<S: BanStore> BanService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn check_ban(&self, user_id: &str) -> Result<Option<BanRecord>, BanError> {
        self.store.check_ban(user_id).await
    }

    pub async fn is_banned(&self, user_id: &str) -> Result<bool, BanError> {
        Ok(self.store.check_ban(user_id).await?.is_some())
    }

    pub async fn ban(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), BanError> {
        self.store.ban(user_id, at).await
    }

    pub async fn unban(&self, user_id: &str) -> Result<bool, BanError> {
        self.store.unban(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Simple in-memory store for testing
    struct InMemoryBanStore {
        bans: Mutex<HashMap<String, BanRecord>>,
    }

    impl InMemoryBanStore {
        fn new() -> Self {
            Self {
                bans: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl BanStore for InMemoryBanStore {
        async fn check_ban(&self, user_id: &str) -> Result<Option<BanRecord>, BanError> {
            Ok(self.bans.lock().unwrap().get(user_id).cloned())
        }

        async fn ban(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), BanError> {
            self.bans.lock().unwrap().insert(
                user_id.to_string(),
                BanRecord {
                    user_id: user_id.to_string(),
                    ban_date: at,
                },
            );
            Ok(())
        }

        async fn unban(&self, user_id: &str) -> Result<bool, BanError> {
            Ok(self.bans.lock().unwrap().remove(user_id).is_some())
        }
    }

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 14, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn ban_then_check_returns_record() {
        let svc = BanService::new(InMemoryBanStore::new());

        svc.ban("100", when()).await.unwrap();

        let record = svc.check_ban("100").await.unwrap().unwrap();
        assert_eq!(record.user_id, "100");
        assert_eq!(record.ban_date, when());
        assert!(svc.is_banned("100").await.unwrap());
    }

    #[tokio::test]
    async fn unban_clears_the_record() {
        let svc = BanService::new(InMemoryBanStore::new());

        svc.ban("100", when()).await.unwrap();
        assert!(svc.unban("100").await.unwrap());

        assert!(svc.check_ban("100").await.unwrap().is_none());
        assert!(!svc.is_banned("100").await.unwrap());
    }

    #[tokio::test]
    async fn unban_of_never_banned_id_is_a_noop() {
        let svc = BanService::new(InMemoryBanStore::new());
        assert!(!svc.unban("999").await.unwrap());
    }
}
