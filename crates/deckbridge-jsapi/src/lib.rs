//! JavaScript API dispatcher for flashcard card templates.
//!
//! Card templates embed scripts that call back into the host through a small,
//! versioned HTTP-style API: a request to `/jsapi/{group}/{operation}` carries
//! a JSON body naming the template developer, the API version the script was
//! written against, and optional operation arguments. This crate turns such a
//! call into exactly one operation on the flashcard collection or the speech
//! engine and answers with a two-shape JSON envelope.
//!
//! The pipeline is:
//!
//! 1. [`EndpointCatalog`] resolves the request path to an [`Endpoint`].
//! 2. [`JsApiRequest`] decodes the body and [`validate_contract`] checks the
//!    developer contact and API version.
//! 3. [`JsApi`] routes the call to its group handler, reading and mutating the
//!    collection through a [`CollectionManager`] so every mutation is one undo
//!    step.
//! 4. [`Response`] encodes the outcome.
//!
//! Failures a script can act on become failure envelopes with an
//! [`ErrorCode`]; anything else propagates as a [`JsApiError`] to the host.

pub mod collection;
mod contract;
mod dispatch;
pub mod endpoint;
mod errors;
mod messages;
mod request;
mod response;
pub mod speech;

pub use collection::{CardId, CollectionManager};
pub use contract::{CURRENT_VERSION, ContractError, validate_contract};
pub use dispatch::{JSAPI_TARGET, JsApi};
pub use endpoint::{Endpoint, EndpointCatalog, REQUEST_PREFIX};
pub use errors::{ErrorCode, JsApiError, UNSUPPORTED_METHOD_MESSAGE};
pub use messages::{ContractMessages, build_localizer};
pub use request::{JsApiRequest, Payload};
pub use response::Response;
pub use speech::{QueueMode, Speech, SpeechError};

#[cfg(test)]
mod tests;
