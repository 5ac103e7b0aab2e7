use std::io;
use std::path::PathBuf;

use capture_core::{ErrorMetadata, LogLevel};
use thiserror::Error;

/// Staging operation errors
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Source unreadable: {origin}: {error}")]
    SourceUnreadable {
        origin: String,
        #[source]
        error: io::Error,
    },

    #[error("Destination unwritable: {}: {error}", path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("Copy failed into {}: {error}", path.display())]
    CopyFailed {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

/// Result type for staging operations
pub type StagingResult<T> = Result<T, StagingError>;

impl ErrorMetadata for StagingError {
    fn error_code(&self) -> &'static str {
        match self {
            StagingError::SourceUnreadable { .. } => "SOURCE_UNREADABLE",
            StagingError::DestinationUnwritable { .. } => "DESTINATION_UNWRITABLE",
            StagingError::CopyFailed { .. } => "COPY_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // The source stream is read-once, so only destination problems can be retried.
        matches!(self, StagingError::DestinationUnwritable { .. })
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StagingError::SourceUnreadable { .. } => LogLevel::Warn,
            StagingError::CopyFailed { .. } => LogLevel::Warn,
            StagingError::DestinationUnwritable { .. } => LogLevel::Error,
        }
    }
}
