// Discord layer - commands and presence glue.

#[path = "commands/command_catalog.rs"]
pub mod commands;

// Re-export command types for convenience
pub use commands::scores::{Data, Error};
