//! # Radar Store
//!
//! Persistence layer for Issue Radar: the territory-directory and
//! ticket-store ports, a SQLite document-style backend, an in-memory
//! backend for tests and embedding, and an explicit TTL cache decorator.

pub mod cache;
pub mod memory;
pub mod ports;
pub mod sqlite;

pub use cache::CachedDirectory;
pub use memory::MemoryStore;
pub use ports::{TerritoryDirectory, TicketStore};
pub use sqlite::SqliteStore;

/// Store version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
