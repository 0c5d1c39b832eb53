//! hookscan utilities
//!
//! Shared plumbing for the extraction workspace: logging setup,
//! configuration loading and the JSON output sink.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
pub mod file;
pub mod logging;

pub use config::{merge_configs, ConfigLoader, ExtractConfig};
pub use file::{normalize_path, write_json_pretty};

/// Result type used throughout hookscan utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path operation error
    #[error("Path operation error: {0}")]
    PathOperation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}
