//! Quick Capture Bridge
//!
//! The stateful half of share intake. [`IntakeBridge`] owns the single pending
//! [`SharePayload`], accepts share events from the host, and hands the payload
//! to one consumer either on request (`fetch`) or by push to an attached
//! [`ShareSubscription`].
//!
//! [`SharePayload`]: capture_core::SharePayload

pub mod bridge;
pub mod channel;
pub mod notify;

// Re-export commonly used types
pub use bridge::IntakeBridge;
pub use channel::{MethodError, CHANNEL_NAME, FETCH_METHOD, LEGACY_FETCH_METHOD, PUSH_METHOD};
pub use notify::{ShareSubscription, SharedDataEvent};

pub use capture_core::SharePayload;
pub use capture_processing::{Attachment, IntakeEvent, RawShareIntent};
