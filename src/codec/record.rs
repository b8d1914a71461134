//! `file` record encoding.

use std::borrow::Cow;

use bytes::{BufMut, Bytes, BytesMut};

use super::sanitize::sanitize;
use crate::protocol::Command;

/// Sanitized file body, ready to be framed by a `file` header.
///
/// The declared length is always taken from the sanitized bytes, never from
/// an earlier size probe of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    body: Bytes,
}

impl FileRecord {
    /// Sanitize raw file content.
    pub fn from_raw(raw: Bytes) -> Self {
        let cleaned = match sanitize(&raw) {
            Cow::Owned(clean) => Some(clean),
            Cow::Borrowed(_) => None,
        };
        Self {
            body: cleaned.map_or(raw, Bytes::from),
        }
    }

    /// Byte length of the sanitized body
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// True if nothing survived sanitization
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Sanitized body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Header line immediately followed by the body.
    pub fn encode(&self, header: &Command) -> Bytes {
        let line = header.encode();
        let mut buf = BytesMut::with_capacity(line.len() + self.body.len());
        buf.put_slice(line.as_bytes());
        buf.put_slice(&self.body);
        buf.freeze()
    }
}
