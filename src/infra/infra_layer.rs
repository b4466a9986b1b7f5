// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "scores/score_store.rs"]
pub mod scores;

#[path = "bans/ban_store.rs"]
pub mod bans;
