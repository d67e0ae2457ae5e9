//! JSONL bridge between socket connections and the template API.
//!
//! ## Protocol
//!
//! A client sends one request line naming the API path, the script's request
//! body, and the card currently on screen:
//!
//! ```json
//! {"path":"/jsapi/card/get-id","body":{"developer":"dev@example.com","version":"1.0.0"},"current_card":42}
//! ```
//!
//! The body may also be sent as the raw JSON text the script produced. The
//! daemon answers with exactly one line and closes the connection:
//!
//! ```json
//! {"kind":"response","body":{"success":true,"value":42}}
//! {"kind":"not_found","path":"/jsapi/card/bogus"}
//! {"kind":"error","message":"malformed JSONL: ..."}
//! ```

mod errors;
mod handler;
mod request;
mod response;

pub use self::errors::DispatchError;
pub(crate) use self::handler::DispatchConnectionHandler;
pub use self::request::HostRequest;
pub use self::response::{HostMessage, ResponseWriter};

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
