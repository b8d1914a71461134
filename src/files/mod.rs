//! File descriptors registered for upload.
//!
//! A descriptor pairs a report label with a [`ContentSource`]. Path sources
//! are read lazily when the upload reaches them, so a file that disappears
//! between registration and upload becomes a per-file failure rather than a
//! failed submission.

use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::Serialize;

use crate::error::{MossError, Result};

/// Where a file's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// File on local disk, read at upload time
    Path(PathBuf),
    /// Content already in memory
    Bytes(Bytes),
}

impl ContentSource {
    /// Load the raw, unsanitized content.
    pub async fn load(&self) -> std::io::Result<Bytes> {
        match self {
            Self::Path(path) => tokio::fs::read(path).await.map(Bytes::from),
            Self::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    /// Path, if this source is on disk
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Bytes(_) => None,
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Bytes(bytes) => write!(f, "<{} bytes in memory>", bytes.len()),
        }
    }
}

/// Role of a registered file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    /// Shared code, never reported as a match
    Base,
    /// Compared against every other file
    Submission,
}

/// A file registered for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Label shown in the report
    pub description: String,
    /// Content source
    pub source: ContentSource,
    /// Role in the submission
    pub role: FileRole,
}

impl FileDescriptor {
    /// Create a descriptor, checking the label fits on a header line.
    pub fn new(
        description: impl Into<String>,
        source: ContentSource,
        role: FileRole,
    ) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(MossError::Config(format!(
                "File description for {} must not be empty",
                source
            )));
        }
        if description.contains(['\n', '\r']) {
            return Err(MossError::Config(format!(
                "File description {:?} must not contain line breaks",
                description
            )));
        }
        Ok(Self {
            description,
            source,
            role,
        })
    }

    /// Base file read from `path`
    pub fn base(path: impl Into<PathBuf>, description: impl Into<String>) -> Result<Self> {
        Self::new(description, ContentSource::Path(path.into()), FileRole::Base)
    }

    /// Submission file read from `path`
    pub fn submission(path: impl Into<PathBuf>, description: impl Into<String>) -> Result<Self> {
        Self::new(
            description,
            ContentSource::Path(path.into()),
            FileRole::Submission,
        )
    }

    /// Submission file with in-memory content
    pub fn raw(content: impl Into<Bytes>, description: impl Into<String>) -> Result<Self> {
        Self::new(
            description,
            ContentSource::Bytes(content.into()),
            FileRole::Submission,
        )
    }
}

/// A file that could not be uploaded; the rest of the batch went ahead.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    /// Label the file was registered with
    pub description: String,
    /// Role the file was registered with
    pub role: FileRole,
    /// Why it was skipped
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_description_validation() {
        assert!(FileDescriptor::raw("x", "").unwrap_err().is_config());
        assert!(FileDescriptor::raw("x", "a\nb").unwrap_err().is_config());
        let desc = FileDescriptor::raw("x", "alice hw1").unwrap();
        assert_eq!(desc.description, "alice hw1");
        assert_eq!(desc.role, FileRole::Submission);
    }

    #[tokio::test]
    async fn test_load_path_and_bytes() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"print('hi')\n").unwrap();

        let desc = FileDescriptor::base(tmp.path(), "base").unwrap();
        assert_eq!(desc.role, FileRole::Base);
        assert_eq!(desc.source.path(), Some(tmp.path()));
        assert_eq!(desc.source.load().await.unwrap().as_ref(), b"print('hi')\n");

        let raw = ContentSource::Bytes(Bytes::from_static(b"abc"));
        assert_eq!(raw.load().await.unwrap().as_ref(), b"abc");
        assert_eq!(raw.to_string(), "<3 bytes in memory>");
    }

    #[tokio::test]
    async fn test_load_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ContentSource::Path(dir.path().join("nope.py"));
        assert!(missing.load().await.is_err());
    }
}
