// Implementations for the score ledgers.

#[path = "in_memory.rs"]
pub mod in_memory;
#[path = "sqlite_store.rs"]
pub mod sqlite_store;

// Re-export for convenience
pub use in_memory::InMemoryScoreStore;
pub use sqlite_store::SqliteScoreStore;
