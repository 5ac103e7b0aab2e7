//! Error metadata shared by every error type in the workspace.
//!
//! Share intake never surfaces attachment failures to its caller. Errors are
//! absorbed where they happen and reported through `tracing`, so each error
//! type describes how loudly it should be logged rather than how it should be
//! rendered to a client.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected outcomes like an unsupported attachment
    Debug,
    /// Warning level - for recoverable issues like an unreadable source
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an absorbed error should be reported
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "COPY_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether the same operation could succeed if attempted again
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Emit a tracing event for an absorbed error at the level it asks for.
///
/// `context` names what was being attempted, e.g. "Dropping shared attachment".
pub fn log_absorbed<E>(err: &E, context: &str)
where
    E: ErrorMetadata + std::fmt::Display,
{
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error = %err, error_code = code, "{}", context),
        LogLevel::Warn => tracing::warn!(error = %err, error_code = code, "{}", context),
        LogLevel::Error => tracing::error!(error = %err, error_code = code, "{}", context),
    }
}
