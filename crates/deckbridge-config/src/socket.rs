use std::fmt;
use std::fs::DirBuilder;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;

/// Declarative configuration for daemon sockets.
///
/// Deserializes from either a tagged table
/// (`{ transport = "tcp", host = "127.0.0.1", port = 9787 }`) or a URL string
/// (`tcp://127.0.0.1:9787`, `unix:///run/deckbridge.sock`), so environment
/// variables and configuration files can use whichever form is convenient.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum SocketEndpoint {
    /// Unix domain socket endpoint.
    Unix {
        /// Filesystem path of the socket.
        path: Utf8PathBuf,
    },
    /// TCP socket endpoint.
    Tcp {
        /// Host name or address to bind.
        host: String,
        /// TCP port to bind.
        port: u16,
    },
}

#[derive(Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
enum TaggedEndpoint {
    Unix { path: Utf8PathBuf },
    Tcp { host: String, port: u16 },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EndpointRepr {
    Url(String),
    Tagged(TaggedEndpoint),
}

impl<'de> Deserialize<'de> for SocketEndpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match EndpointRepr::deserialize(deserializer)? {
            EndpointRepr::Url(text) => text.parse().map_err(serde::de::Error::custom),
            EndpointRepr::Tagged(TaggedEndpoint::Unix { path }) => Ok(Self::Unix { path }),
            EndpointRepr::Tagged(TaggedEndpoint::Tcp { host, port }) => Ok(Self::Tcp { host, port }),
        }
    }
}

impl SocketEndpoint {
    /// Builds a Unix domain socket endpoint.
    #[must_use]
    pub fn unix(path: impl Into<Utf8PathBuf>) -> Self {
        Self::Unix { path: path.into() }
    }

    /// Builds a TCP socket endpoint.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Returns the Unix socket path when the endpoint uses the Unix transport.
    #[must_use]
    pub fn unix_path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Unix { path } => Some(path.as_ref()),
            Self::Tcp { .. } => None,
        }
    }

    /// Ensures the socket's parent directory exists with restrictive permissions.
    ///
    /// # Errors
    ///
    /// Returns [`SocketPreparationError`] when the path has no parent or the
    /// directory cannot be created.
    pub fn prepare_filesystem(&self) -> Result<(), SocketPreparationError> {
        let Some(path) = self.unix_path() else {
            return Ok(());
        };
        let Some(parent) = path.parent() else {
            return Err(SocketPreparationError::MissingParent {
                path: path.to_path_buf(),
            });
        };

        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }

        if let Err(source) = builder.create(parent.as_std_path())
            && source.kind() != std::io::ErrorKind::AlreadyExists
        {
            return Err(SocketPreparationError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            });
        }

        Ok(())
    }
}

impl fmt::Display for SocketEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix { path } => write!(formatter, "unix://{path}"),
            Self::Tcp { host, port } => write!(formatter, "tcp://{host}:{port}"),
        }
    }
}

impl FromStr for SocketEndpoint {
    type Err = SocketParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input)?;
        match url.scheme() {
            "unix" => {
                let path = url.path();
                if path.is_empty() {
                    return Err(SocketParseError::MissingUnixPath(input.to_owned()));
                }
                Ok(Self::unix(path))
            }
            "tcp" => {
                let host = url
                    .host_str()
                    .ok_or_else(|| SocketParseError::MissingHost(input.to_owned()))?;
                let port = url
                    .port()
                    .ok_or_else(|| SocketParseError::MissingPort(input.to_owned()))?;
                Ok(Self::tcp(host, port))
            }
            other => Err(SocketParseError::UnsupportedScheme(other.to_owned())),
        }
    }
}

/// Errors encountered while parsing a [`SocketEndpoint`] from text.
#[derive(Debug, Error)]
pub enum SocketParseError {
    /// Scheme was not recognised.
    #[error("unsupported socket scheme '{0}'")]
    UnsupportedScheme(String),
    /// TCP host name was missing.
    #[error("missing TCP host in '{0}'")]
    MissingHost(String),
    /// TCP port was missing from the address.
    #[error("missing TCP port in '{0}'")]
    MissingPort(String),
    /// Unix socket path was absent.
    #[error("missing Unix socket path in '{0}'")]
    MissingUnixPath(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

/// Errors raised when preparing socket directories.
#[derive(Debug, Error)]
pub enum SocketPreparationError {
    /// Parent directory is missing when creating a Unix socket path.
    #[error("socket path '{path}' has no parent directory")]
    MissingParent {
        /// Socket path lacking a parent.
        path: Utf8PathBuf,
    },
    /// Failed to create or adjust socket directories.
    #[error("failed to create socket directory '{path}': {source}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn display_unix_socket() {
        let endpoint = SocketEndpoint::unix(Utf8PathBuf::from("/tmp/deckbridge.sock"));
        assert_eq!(endpoint.to_string(), "unix:///tmp/deckbridge.sock");
    }

    #[test]
    fn parse_tcp_socket() {
        let endpoint: SocketEndpoint = "tcp://127.0.0.1:9000".parse().expect("valid tcp url");
        assert!(matches!(endpoint, SocketEndpoint::Tcp { port: 9000, .. }));
    }

    #[rstest]
    #[case("http://localhost:80")]
    #[case("tcp://127.0.0.1")]
    #[case("not a url")]
    fn rejects_unusable_socket_urls(#[case] input: &str) {
        assert!(input.parse::<SocketEndpoint>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let endpoint = SocketEndpoint::tcp("localhost", 4242);
        let parsed: SocketEndpoint = endpoint.to_string().parse().expect("parse display");
        assert_eq!(parsed, endpoint);
    }

    #[test]
    fn prepare_filesystem_creates_parent_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let socket = dir.path().join("nested").join("deckbridged.sock");
        let endpoint = SocketEndpoint::unix(socket.to_str().expect("utf8 path"));
        endpoint.prepare_filesystem().expect("prepare filesystem");
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn prepare_filesystem_ignores_tcp() {
        let endpoint = SocketEndpoint::tcp("127.0.0.1", 0);
        assert!(endpoint.prepare_filesystem().is_ok());
    }
}
