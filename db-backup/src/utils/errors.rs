//! Custom error types for the backup tool.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),

    #[error("CSV export error: {0}")]
    CsvExport(String),

    #[error("Password prompt error: {0}")]
    Prompt(String),

    #[error("Dump tool error: {0}")]
    DumpTool(String),
}

pub type Result<T> = std::result::Result<T, BackupError>;
