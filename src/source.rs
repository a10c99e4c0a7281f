//! Where the image to ingest comes from.
//!
//! An [`ImageSource`] is either an [`Upload`] (bytes received from an
//! untrusted client, with the filename and size the client declared) or a
//! path on the local filesystem. Uploads go through the configured limits
//! before decoding; local files are trusted and skip them.

use std::path::{Path, PathBuf};

use crate::naming;

/// In-memory upload with the metadata the client declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    bytes: Vec<u8>,
    filename: String,
    size: u64,
}

impl Upload {
    /// Upload whose declared size is the buffer length.
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        let size = bytes.len() as u64;
        Self {
            bytes,
            filename: filename.into(),
            size,
        }
    }

    /// Override the declared size (e.g. the transport's `Content-Length`).
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Filename as sent by the client. Only its extension is ever checked.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Declared size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// The input of one intake run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Untrusted upload; limits apply.
    Buffer(Upload),
    /// Trusted local file; limits are skipped.
    File(PathBuf),
}

impl ImageSource {
    pub fn from_buffer(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self::Buffer(Upload::new(bytes, filename))
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// True for an upload with no bytes or a file source with an empty path.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Buffer(upload) => upload.bytes.is_empty(),
            Self::File(path) => path.as_os_str().is_empty(),
        }
    }

    /// Uploads are untrusted; local files are not.
    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Buffer(_))
    }

    /// Default output filename: the declared name of an upload, or the
    /// final path component of a local file.
    pub fn filename(&self) -> Option<String> {
        match self {
            Self::Buffer(upload) => naming::file_name_of(Path::new(upload.filename())),
            Self::File(path) => naming::file_name_of(path),
        }
    }
}
