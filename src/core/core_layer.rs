// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "scores/mod.rs"]
pub mod scores;

#[path = "rollover/rollover_service.rs"]
pub mod rollover;

#[path = "bans/ban_service.rs"]
pub mod bans;
