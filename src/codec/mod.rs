//! Payload encoding for `file` records.
//!
//! File bodies travel inline after their header line, so they are first
//! reduced to the byte alphabet the server accepts ([`sanitize`]) and then
//! framed with a header whose declared length matches the sanitized body
//! ([`FileRecord`]).
//!
//! ```text
//! file <id> <language> <byteLength> <description>\n
//! <byteLength sanitized bytes>
//! ```

mod record;
mod sanitize;

pub use record::FileRecord;
pub use sanitize::{is_allowed, sanitize, ALLOWED_PUNCTUATION};
