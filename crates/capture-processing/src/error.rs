use capture_core::{ErrorMetadata, LogLevel};

/// Why an attachment was not eligible for staging
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("Unknown content type: {}", mime.as_deref().unwrap_or("<absent>"))]
    Unknown { mime: Option<String> },

    #[error("Unsupported file extension: {extension}")]
    Unsupported { extension: String },
}

impl ErrorMetadata for ClassificationError {
    fn error_code(&self) -> &'static str {
        match self {
            ClassificationError::Unknown { .. } => "CLASSIFICATION_UNKNOWN",
            ClassificationError::Unsupported { .. } => "UNSUPPORTED_TYPE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}
