use std::path::PathBuf;
use thiserror::Error;

/// Reasons an export or import is rejected. Live state is never touched
/// when one of these is returned.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Malformed text, unparsable JSON or a bad color code
    #[error("format error: {0}")]
    Format(String),
    /// Well-formed JSON that lacks the expected structure
    #[error("schema error: {0}")]
    Schema(String),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
