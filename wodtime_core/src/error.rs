//! Error types for the wodtime_core library.
//!
//! The duration engine itself never fails; these errors come from loading,
//! resolving and saving the data it runs on.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wodtime_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Library lookup or resolution error
    #[error("Library error: {0}")]
    Library(String),

    /// Library validation failed
    #[error("Library validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}
