//! Quick Capture Storage Library
//!
//! Staging of externally-owned share content into a private, process-owned
//! directory.
//!
//! # Staged file layout
//!
//! Every staged attachment lands directly inside the staging directory as
//! `{uuid}.{extension}` (or `{uuid}` when no extension is known). Bytes are
//! written to a hidden `.{uuid}.partial` file first and renamed once the copy
//! is complete, so a reported path always refers to a fully written file.

pub mod error;
pub mod source;
pub mod stager;

// Re-export commonly used types
pub use error::{StagingError, StagingResult};
pub use source::{BytesSource, FileSource, ReaderSource, SourceHandle, SourceReader};
pub use stager::ContentStager;
