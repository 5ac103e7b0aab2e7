pub mod media;
pub mod share;

pub use media::MediaKind;
pub use share::SharePayload;
