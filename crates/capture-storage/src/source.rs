//! Externally-owned share sources
//!
//! A share event hands the core opaque references to content owned by another
//! application. The core reads each one exactly once while staging it.

use std::io::Cursor;
use std::path::PathBuf;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncRead;

/// Byte stream produced by opening a source
pub type SourceReader = Pin<Box<dyn AsyncRead + Send>>;

/// Read-once handle to externally-owned content.
///
/// `open` consumes the handle: once the stream has been taken the handle is
/// gone, so the core never outlives its single read.
#[async_trait]
pub trait SourceHandle: Send {
    /// Open the underlying stream for reading
    async fn open(self: Box<Self>) -> std::io::Result<SourceReader>;

    /// Short description used in logs (never the content itself)
    fn describe(&self) -> String;
}

/// Content held by another process and exposed as a file path
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceHandle for FileSource {
    async fn open(self: Box<Self>) -> std::io::Result<SourceReader> {
        let file = tokio::fs::File::open(&self.path).await?;
        Ok(Box::pin(file))
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Content that was handed over in memory
#[derive(Debug, Clone)]
pub struct BytesSource {
    data: Bytes,
}

impl BytesSource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
impl SourceHandle for BytesSource {
    async fn open(self: Box<Self>) -> std::io::Result<SourceReader> {
        Ok(Box::pin(Cursor::new(self.data)))
    }

    fn describe(&self) -> String {
        format!("bytes:{}", self.data.len())
    }
}

/// Any already-open async reader
pub struct ReaderSource {
    reader: SourceReader,
    label: String,
}

impl ReaderSource {
    pub fn new(reader: impl AsyncRead + Send + 'static, label: impl Into<String>) -> Self {
        Self {
            reader: Box::pin(reader),
            label: label.into(),
        }
    }
}

#[async_trait]
impl SourceHandle for ReaderSource {
    async fn open(self: Box<Self>) -> std::io::Result<SourceReader> {
        Ok(self.reader)
    }

    fn describe(&self) -> String {
        format!("reader:{}", self.label)
    }
}
