//! Method-channel surface exposed to the consumer
//!
//! The consumer talks to the bridge over a named local channel: it calls
//! `fetchSharedData` to pull the pending payload and receives
//! `onSharedDataReceived` pushes. `getSharedData` is still answered for
//! consumers built against the first version of the channel.

use capture_core::{ErrorMetadata, LogLevel};
use serde_json::Value as JsonValue;

use crate::bridge::IntakeBridge;

pub const CHANNEL_NAME: &str = "app.quick.capture/share";
pub const FETCH_METHOD: &str = "fetchSharedData";
pub const LEGACY_FETCH_METHOD: &str = "getSharedData";
pub const PUSH_METHOD: &str = "onSharedDataReceived";

#[derive(Debug, thiserror::Error)]
pub enum MethodError {
    #[error("Method not implemented: {0}")]
    NotImplemented(String),

    #[error("Failed to serialize share payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ErrorMetadata for MethodError {
    fn error_code(&self) -> &'static str {
        match self {
            MethodError::NotImplemented(_) => "NOT_IMPLEMENTED",
            MethodError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn log_level(&self) -> LogLevel {
        match self {
            MethodError::NotImplemented(_) => LogLevel::Debug,
            MethodError::Serialization(_) => LogLevel::Error,
        }
    }
}

impl IntakeBridge {
    /// Answer a consumer call on the share channel.
    ///
    /// A fetch returns `{ "text", "url", "filePaths" }` and resets the pending
    /// payload. Unknown methods leave pending state untouched.
    pub fn handle_method_call(&self, method: &str) -> Result<JsonValue, MethodError> {
        match method {
            FETCH_METHOD | LEGACY_FETCH_METHOD => {
                let payload = self.fetch();
                Ok(serde_json::to_value(&payload)?)
            }
            other => {
                tracing::debug!(channel = CHANNEL_NAME, method = other, "Unknown channel method");
                Err(MethodError::NotImplemented(other.to_string()))
            }
        }
    }
}
