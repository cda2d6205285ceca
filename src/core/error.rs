//! Error types for chunk streaming

use thiserror::Error;

use crate::streaming::coord::ChunkCoord;

/// Failure of a single chunk load.
///
/// Loader failures are isolated per coordinate: they are collected into an
/// [`EnsureReport`](crate::streaming::EnsureReport) rather than aborting the
/// batch they were issued in.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Malformed chunk data: {0}")]
    Malformed(String),

    #[error("Loader returned chunk {found:?} for requested {requested:?}")]
    CoordMismatch {
        requested: ChunkCoord,
        found: ChunkCoord,
    },

    #[error("Load task panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Main error type for the chunk store
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid viewport padding: {0}")]
    InvalidPadding(f32),

    #[error("{} chunk load(s) failed", failed.len())]
    Load { failed: Vec<(ChunkCoord, LoadError)> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LoadError = io.into();
        assert!(matches!(err, LoadError::Io(ref msg) if msg.contains("denied")));
    }

    #[test]
    fn test_aggregate_message_counts_failures() {
        let err = Error::Load {
            failed: vec![
                (ChunkCoord::new(0, 0), LoadError::Other("a".into())),
                (ChunkCoord::new(1, 0), LoadError::Other("b".into())),
            ],
        };
        assert_eq!(err.to_string(), "2 chunk load(s) failed");
    }
}
