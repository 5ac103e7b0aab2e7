//! Quick Capture Core Library
//!
//! Domain models, error metadata and configuration shared by the share-intake
//! crates: the staging layer, the payload builder and the bridge itself.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{IntakeConfig, LogFormat};
pub use error::{ErrorMetadata, LogLevel};
pub use models::{MediaKind, SharePayload};
