//! Error types
//!
//! None of these escape capture/restore: store failures are logged at the
//! repository boundary. Catalog and config errors surface at load time to
//! the host that builds them.

use std::path::PathBuf;

/// Errors raised by a record store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Encoding a record set or the store contents failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A write returned but the key is not readable afterwards.
    #[error("write to '{key}' not visible after set")]
    WriteNotVisible { key: String },

    /// The platform storage rejected the operation.
    #[error("platform storage error: {detail}")]
    Platform { detail: String },
}

/// Errors raised while building a template catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog source is not valid JSON for a template list.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two templates share a name; lookup is by exact name.
    #[error("duplicate template '{name}'")]
    DuplicateTemplate { name: String },
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config source is not valid JSON.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A tolerance is negative or not finite.
    #[error("invalid tolerance '{field}': {value}")]
    InvalidTolerance { field: &'static str, value: f32 },
}
