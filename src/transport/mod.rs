//! Transport layer abstraction for MOSS submissions.
//!
//! The client only needs an ordered, bidirectional byte stream. The
//! [`Transport`] trait hands one out per submission; [`TcpTransport`] is the
//! production backend, and tests plug in in-memory streams.

mod tcp;

pub use tcp::TcpTransport;

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;

/// Transport trait for pluggable connection backends.
pub trait Transport: Send + Sync {
    /// Stream produced by a successful connect.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Open a fresh connection to the service.
    ///
    /// Failures must surface as [`crate::MossError::Network`] so callers can
    /// tell an unreachable service from a declined submission.
    fn connect(&self) -> Pin<Box<dyn Future<Output = Result<Self::Stream>> + Send + '_>>;

    /// Get the transport name for logging.
    fn name(&self) -> &'static str;

    /// Get the remote address as a string.
    fn remote_addr(&self) -> String;
}
