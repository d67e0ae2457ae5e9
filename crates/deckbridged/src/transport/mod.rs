//! Socket listener for the daemon endpoint.
//!
//! The listener binds the configured TCP or Unix socket and accepts
//! connections on a background thread, handing each to a
//! [`ConnectionHandler`] on its own thread.

mod errors;
mod handler;
mod listener;
#[cfg(test)]
mod listener_tests;

pub use self::errors::ListenerError;
pub(crate) use self::handler::{ConnectionHandler, ConnectionStream};
pub(crate) use self::listener::{ListenerHandle, SocketListener};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
