//! MOSS client error types.
//!
//! Errors are split by where the submission failed so callers can tell
//! "service reachable but declined" ([`MossError::Rejected`]) apart from
//! "service unreachable" ([`MossError::Network`]).
//!
//! Per-file read failures during upload are not errors at this level; they
//! are collected into [`crate::client::Submission::skipped`].

use thiserror::Error;

/// MOSS client errors.
#[derive(Error, Debug)]
pub enum MossError {
    /// Invalid configuration or option value, raised before any network I/O.
    #[error("Config error: {0}")]
    Config(String),

    /// The remote endpoint could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered `no` to the submission preamble.
    #[error("Submission rejected by server: {0}")]
    Rejected(String),

    /// The service sent a signal that is not valid in the current state,
    /// or closed the connection before producing a result.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// No recognized response arrived within the response timeout.
    #[error("Timed out after {secs}s waiting for {waiting_for}")]
    Timeout {
        /// What the session was waiting for.
        waiting_for: String,
        /// Configured timeout in seconds.
        secs: u64,
    },

    /// I/O error on an established connection.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for MOSS operations
pub type Result<T> = std::result::Result<T, MossError>;

impl From<toml::de::Error> for MossError {
    fn from(err: toml::de::Error) -> Self {
        MossError::Config(err.to_string())
    }
}

impl MossError {
    /// True for errors raised before a connection was attempted.
    pub fn is_config(&self) -> bool {
        matches!(self, MossError::Config(_))
    }
}
