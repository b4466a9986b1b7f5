// Discord commands module.
// Each feature gets its own command file.

#[path = "scores.rs"]
pub mod scores;

#[path = "bans.rs"]
pub mod bans;

#[path = "info.rs"]
pub mod info;

#[path = "presence.rs"]
pub mod presence;
