//! Quick Capture Processing Library
//!
//! Turns raw share events into the normalized [`SharePayload`] a consumer
//! receives: classifying the trigger, resolving attachment types against the
//! allow-list, staging accepted attachments and extracting URLs from text.
//!
//! [`SharePayload`]: capture_core::SharePayload

pub mod builder;
pub mod classifier;
pub mod error;
pub mod event;

// Re-export commonly used types
pub use builder::{AttachmentOutcome, PayloadBuilder};
pub use classifier::TypeClassifier;
pub use error::ClassificationError;
pub use event::{Attachment, IntakeEvent, RawShareIntent, ShareAction};
