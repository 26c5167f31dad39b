//! # Radar Utils
//!
//! Shared configuration and logging setup for Issue Radar binaries.

pub mod config;
pub mod logging;

pub use config::{Config, DatabaseConfig, LoggingConfig};

/// Utils version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
