// Scores module - domain logic for the exercise point ledgers.

mod score_service;
pub mod point_scheme;

pub use point_scheme::PointScheme;
pub use score_service::{
    AwardOutcome, MonthlyRecord, ScoreError, ScoreRecord, ScoreService, ScoreStore,
    MONTH_SENTINEL_ID,
};
