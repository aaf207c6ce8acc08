//! Database backup library
//!
//! Exports a hosted relational database to local files for disaster
//! recovery. Two independent paths: a REST-API exporter that serializes
//! every configured resource to JSON and CSV, and a native `pg_dump`
//! invocation that produces a full SQL dump.

pub mod api;
pub mod config;
pub mod dump;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use utils::errors::BackupError;
pub type Result<T> = std::result::Result<T, BackupError>;
