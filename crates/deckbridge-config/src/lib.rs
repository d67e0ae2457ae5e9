//! Shared configuration for the deckbridge host daemon.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults, then an
//! optional TOML file (`--config-path`), then `DECKBRIDGE_*` environment
//! variables, then command-line flags. The resolved [`Config`] tells the daemon
//! where to listen, how to log, and which collection snapshot to serve.

mod defaults;
mod logging;
mod socket;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_TCP_PORT, default_log_filter, default_log_filter_string,
    default_log_format, default_socket_endpoint,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Resolved runtime configuration for the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "DECKBRIDGE")]
pub struct Config {
    /// Socket the daemon listens on.
    #[ortho_config(default = default_socket_endpoint())]
    pub daemon_socket: SocketEndpoint,
    /// `tracing` filter expression, for example `info` or `deckbridged=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for structured logs.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Optional JSON collection snapshot served by the daemon.
    ///
    /// The file is read once at startup and never written back; changes made
    /// by scripts last until the daemon stops.
    pub collection_path: Option<Utf8PathBuf>,
}

impl Config {
    /// Socket the daemon listens on.
    #[must_use]
    pub const fn daemon_socket(&self) -> &SocketEndpoint {
        &self.daemon_socket
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Path of the collection snapshot, when one is configured.
    #[must_use]
    pub fn collection_path(&self) -> Option<&Utf8Path> {
        self.collection_path.as_deref()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_socket: default_socket_endpoint(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            collection_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_library_defaults() {
        let config = Config::default();
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(config.collection_path().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn default_socket_is_unix_and_namespaced() {
        let config = Config::default();
        let path = config
            .daemon_socket()
            .unix_path()
            .expect("unix platforms default to a unix socket");
        assert_eq!(path.file_name(), Some("deckbridged.sock"));
        assert!(path.as_str().contains("deckbridge"));
    }
}
