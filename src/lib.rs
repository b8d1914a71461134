//! # MOSS client
//!
//! Async client for the MOSS ("Measure Of Software Similarity") service.
//! It authenticates with a registered user id, negotiates submission
//! options, uploads base and submission files over the MOSS line protocol,
//! and returns the location of the generated report.
//!
//! ## Protocol Overview
//!
//! ```text
//! moss <userId>
//! directory <0|1>
//! X <0|1>
//! maxmatches <int>
//! show <int>
//! language <languageTag>
//!                                     <- yes | no
//! file <fileId> <languageTag> <byteLength> <description>
//! <raw sanitized bytes, byteLength long>
//! ...
//! query 0 <comment>
//!                                     <- http://moss.stanford.edu/results/...
//! end
//! ```
//!
//! Base files are all sent with id 0; submission files are numbered from 1
//! in registration order. A file that cannot be read at upload time is
//! skipped without consuming an id, and shows up in
//! [`Submission::skipped`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use moss::MossClient;
//!
//! let mut client = MossClient::new("python", "123456789")?;
//! client.set_comment("project1");
//! client.add_base_file("submissions/base.py", "base")?;
//! client.add_file("submissions/sub1.py", "sub1")?;
//! client.add_raw_file(std::fs::read("submissions/sub2.py")?, "sub2")?;
//!
//! let submission = client.process().await?;
//! println!("{}", submission.url);
//! ```
//!
//! ## Modules
//!
//! - [`client`]: Registration API and submission driver
//! - [`protocol`]: Wire messages, option set and session state machine
//! - [`codec`]: Body sanitization and `file` record framing
//! - [`files`]: File descriptors and content sources
//! - [`transport`]: Connection backends
//! - [`config`]: Configuration management
//! - [`error`]: Error types and result aliases

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod files;
pub mod protocol;
pub mod transport;

// Re-exports for convenience
pub use client::{MossClient, Submission};
pub use config::ClientConfig;
pub use error::{MossError, Result};
pub use files::{ContentSource, FileDescriptor, FileRole, SkippedFile};
pub use protocol::{Language, Session, SessionState, SubmissionOptions};
pub use transport::{TcpTransport, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
