//! Error types for tsweave
//!
//! Generation itself never fails. Errors only come from loading declarative
//! configuration and compiling import grouping patterns.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// tsweave errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid module pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
