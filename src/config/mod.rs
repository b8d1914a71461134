//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables
//! - CLI arguments (for the `moss` binary)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MossError, Result};

/// Public MOSS host
pub const DEFAULT_HOST: &str = "moss.stanford.edu";

/// Public MOSS port
pub const DEFAULT_PORT: u16 = 7690;

/// Prefix of every result location the public service returns
pub const DEFAULT_RESULT_PREFIX: &str = "http://moss.stanford.edu";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Registered MOSS user id
    #[serde(default)]
    pub user_id: Option<String>,

    /// Remote endpoint
    #[serde(default)]
    pub server: ServerConfig,

    /// Timeouts
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            MossError::Config(format!("Failed to read config file {:?}: {e}", path))
        })?;

        toml::from_str(&content)
            .map_err(|e| MossError::Config(format!("Failed to parse config: {e}")))
    }

    /// Default config file location (`<config dir>/moss/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("moss").join("config.toml"))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(id) = std::env::var("MOSS_ID") {
            if !id.trim().is_empty() {
                config.user_id = Some(id.trim().to_string());
            }
        }
        if let Ok(host) = std::env::var("MOSS_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("MOSS_PORT") {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Ok(secs) = std::env::var("MOSS_RESPONSE_TIMEOUT") {
            if let Ok(secs) = secs.parse() {
                config.timeouts.response_secs = secs;
            }
        }

        config
    }

    /// Merge with another config (other takes precedence where it differs
    /// from the defaults)
    pub fn merge(self, other: Self) -> Self {
        let server_defaults = ServerConfig::default();
        let timeout_defaults = TimeoutConfig::default();

        Self {
            user_id: other.user_id.or(self.user_id),
            server: ServerConfig {
                host: if other.server.host != server_defaults.host {
                    other.server.host
                } else {
                    self.server.host
                },
                port: if other.server.port != server_defaults.port {
                    other.server.port
                } else {
                    self.server.port
                },
                result_prefix: if other.server.result_prefix != server_defaults.result_prefix {
                    other.server.result_prefix
                } else {
                    self.server.result_prefix
                },
            },
            timeouts: TimeoutConfig {
                connect_secs: if other.timeouts.connect_secs != timeout_defaults.connect_secs {
                    other.timeouts.connect_secs
                } else {
                    self.timeouts.connect_secs
                },
                response_secs: if other.timeouts.response_secs != timeout_defaults.response_secs
                {
                    other.timeouts.response_secs
                } else {
                    self.timeouts.response_secs
                },
            },
        }
    }
}

/// Remote endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name
    pub host: String,

    /// TCP port
    pub port: u16,

    /// Inbound lines starting with this are result locations
    pub result_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            result_prefix: DEFAULT_RESULT_PREFIX.to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port` form for connecting
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Timeout configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Maximum time to establish the connection
    pub connect_secs: u64,

    /// Maximum time to wait for each recognized response. The server can
    /// take several minutes on large batches.
    pub response_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 30,
            response_secs: 600,
        }
    }
}

impl TimeoutConfig {
    /// Connect timeout as a Duration
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    /// Response timeout as a Duration
    pub fn response(&self) -> Duration {
        Duration::from_secs(self.response_secs)
    }

    /// Both timeouts must be at least one second.
    pub fn validate(&self) -> Result<()> {
        if self.connect_secs == 0 {
            return Err(MossError::Config(
                "Connect timeout must be at least 1 second".to_string(),
            ));
        }
        if self.response_secs == 0 {
            return Err(MossError::Config(
                "Response timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server.host, "moss.stanford.edu");
        assert_eq!(config.server.port, 7690);
        assert_eq!(config.server.addr(), "moss.stanford.edu:7690");
        assert_eq!(config.timeouts.response(), Duration::from_secs(600));
        assert!(config.user_id.is_none());
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            user_id = "123456789"

            [server]
            host = "localhost"
            port = 17690

            [timeouts]
            response_secs = 5
        "#;

        let config: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.user_id.as_deref(), Some("123456789"));
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 17690);
        assert_eq!(config.server.result_prefix, DEFAULT_RESULT_PREFIX);
        assert_eq!(config.timeouts.connect_secs, 30);
        assert_eq!(config.timeouts.response_secs, 5);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.server.port, 9000);

        std::fs::write(&path, "[server\nport = ").unwrap();
        assert!(ClientConfig::from_file(&path).unwrap_err().is_config());
        assert!(ClientConfig::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        assert!(TimeoutConfig::default().validate().is_ok());

        let zero_response = TimeoutConfig {
            response_secs: 0,
            ..Default::default()
        };
        assert!(zero_response.validate().unwrap_err().is_config());

        let zero_connect = TimeoutConfig {
            connect_secs: 0,
            ..Default::default()
        };
        assert!(zero_connect.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = ClientConfig {
            user_id: Some("42".to_string()),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_merge_prefers_non_default() {
        let file = ClientConfig {
            server: ServerConfig {
                host: "moss.example.org".to_string(),
                ..Default::default()
            },
            user_id: Some("file-id".to_string()),
            ..Default::default()
        };
        let env = ClientConfig {
            timeouts: TimeoutConfig {
                response_secs: 42,
                ..Default::default()
            },
            user_id: Some("env-id".to_string()),
            ..Default::default()
        };

        let merged = file.merge(env);
        assert_eq!(merged.server.host, "moss.example.org");
        assert_eq!(merged.timeouts.response_secs, 42);
        assert_eq!(merged.user_id.as_deref(), Some("env-id"));
    }
}
