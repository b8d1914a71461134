//! TCP transport for the MOSS line protocol.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::net::TcpStream;

use super::Transport;
use crate::config::{ServerConfig, TimeoutConfig, DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{MossError, Result};

/// Plain TCP connection to a MOSS server.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    /// Host name or address
    host: String,
    /// TCP port
    port: u16,
    /// Maximum time to establish the connection
    connect_timeout: Duration,
}

impl TcpTransport {
    /// Create a new TCP transport.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: TimeoutConfig::default().connect(),
        }
    }

    /// Create from configuration sections.
    pub fn from_config(server: &ServerConfig, timeouts: &TimeoutConfig) -> Self {
        Self::new(server.host.clone(), server.port).with_connect_timeout(timeouts.connect())
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl Transport for TcpTransport {
    type Stream = TcpStream;

    fn connect(&self) -> Pin<Box<dyn Future<Output = Result<TcpStream>> + Send + '_>> {
        Box::pin(async move {
            let addr = self.remote_addr();
            tracing::debug!("Connecting to MOSS server at {}", addr);

            let stream = tokio::time::timeout(
                self.connect_timeout,
                TcpStream::connect((self.host.as_str(), self.port)),
            )
            .await
            .map_err(|_| {
                MossError::Network(format!(
                    "Timed out connecting to {} after {}s",
                    addr,
                    self.connect_timeout.as_secs()
                ))
            })?
            .map_err(|e| MossError::Network(format!("Failed to connect to {}: {}", addr, e)))?;

            stream.set_nodelay(true)?;
            Ok(stream)
        })
    }

    fn name(&self) -> &'static str {
        "TCP"
    }

    fn remote_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
