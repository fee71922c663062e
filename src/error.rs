//! Error types for configuration and history persistence

use std::path::PathBuf;

/// Invalid timer configuration, rejected before any countdown is built.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A countdown cannot run for a negative amount of time.
    #[error("countdown duration must be non-negative, got {0} ms")]
    NegativeDuration(i64),

    /// The tick source needs a non-zero cadence.
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,
}

/// Failure talking to the key-value persistence backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem error on a specific path.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// History snapshot could not be encoded.
    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
