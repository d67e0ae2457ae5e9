//! Routing of validated calls to per-group handlers.
//!
//! [`JsApi`] owns the endpoint catalog and the collaborators every handler
//! needs. It is built once at startup and shared by reference; each call is
//! independent and carries its ambient subject, the card currently on screen,
//! as an explicit [`CardId`].

mod card;
mod collection;
mod deck;
mod note;
mod note_type;
mod tts;

use std::sync::Arc;

use tracing::{debug, info};

use crate::collection::{CardId, CollectionManager};
use crate::endpoint::{Endpoint, EndpointCatalog};
use crate::errors::JsApiError;
use crate::messages::ContractMessages;
use crate::request::{JsApiRequest, Payload};
use crate::response::Response;
use crate::speech::Speech;

/// Tracing target for dispatch events.
pub const JSAPI_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::jsapi");

/// Everything a handler may consult for one call.
struct Context<'a> {
    col: &'a CollectionManager,
    speech: &'a dyn Speech,
    data: Option<&'a Payload>,
    current_card: CardId,
}

impl Context<'_> {
    fn long(&self, key: &str) -> Option<i64> {
        self.data.and_then(|data| data.long(key))
    }

    fn double(&self, key: &str) -> Option<f64> {
        self.data.and_then(|data| data.double(key))
    }

    fn string(&self, key: &str) -> Option<&str> {
        self.data.and_then(|data| data.string(key))
    }

    fn require_long(&self, key: &str, missing: &str) -> Result<i64, JsApiError> {
        self.long(key)
            .ok_or_else(|| JsApiError::invalid_input(missing))
    }

    fn require_double(&self, key: &str, missing: &str) -> Result<f64, JsApiError> {
        self.double(key)
            .ok_or_else(|| JsApiError::invalid_input(missing))
    }

    fn require_string(&self, key: &str, missing: &str) -> Result<&str, JsApiError> {
        self.string(key)
            .ok_or_else(|| JsApiError::invalid_input(missing))
    }
}

/// Endpoint dispatcher for card template scripts.
pub struct JsApi {
    catalog: EndpointCatalog,
    collection: CollectionManager,
    speech: Arc<dyn Speech>,
    messages: ContractMessages,
}

impl JsApi {
    /// Builds a dispatcher over the given collaborators.
    #[must_use]
    pub fn new(
        collection: CollectionManager,
        speech: Arc<dyn Speech>,
        messages: ContractMessages,
    ) -> Self {
        Self {
            catalog: EndpointCatalog::new(),
            collection,
            speech,
            messages,
        }
    }

    /// Collection handle shared with the host.
    #[must_use]
    pub const fn collection(&self) -> &CollectionManager {
        &self.collection
    }

    /// Resolves a request URI to an endpoint.
    #[must_use]
    pub fn endpoint(&self, uri: &str) -> Option<Endpoint> {
        self.catalog.resolve(uri)
    }

    /// Parses a request body and validates its contract.
    ///
    /// # Errors
    ///
    /// Returns [`JsApiError::Malformed`] for bodies that are not JSON objects
    /// and [`JsApiError::Contract`] when the contract is rejected.
    pub fn parse_request(body: &[u8]) -> Result<Option<Payload>, JsApiError> {
        JsApiRequest::parse(body)?.into_validated_data()
    }

    /// Executes one endpoint and returns its envelope.
    ///
    /// Errors in the script-facing taxonomy become failure envelopes.
    ///
    /// # Errors
    ///
    /// Returns errors outside that taxonomy, such as backend failures or a
    /// poisoned collection lock.
    pub fn handle_endpoint_request(
        &self,
        endpoint: Endpoint,
        data: Option<&Payload>,
        current_card: CardId,
    ) -> Result<Response, JsApiError> {
        debug!(
            target: JSAPI_TARGET,
            %endpoint,
            current_card = current_card.get(),
            "dispatching call"
        );
        let ctx = Context {
            col: &self.collection,
            speech: self.speech.as_ref(),
            data,
            current_card,
        };
        let outcome = match endpoint {
            Endpoint::Card(op) => card::handle(&ctx, op),
            Endpoint::Collection(op) => collection::handle(&ctx, op),
            Endpoint::Deck(op) => deck::handle(&ctx, op),
            Endpoint::Note(op) => note::handle(&ctx, op),
            Endpoint::NoteType(op) => note_type::handle(&ctx, op),
            Endpoint::Tts(op) => tts::handle(&ctx, op),
            Endpoint::Android(_) | Endpoint::StudyScreen(_) => {
                Err(JsApiError::unsupported(endpoint))
            }
        };
        self.recover(endpoint, outcome)
    }

    /// Runs the full pipeline for one call: resolve, validate, dispatch.
    ///
    /// Returns `Ok(None)` when `uri` names no endpoint, so the host can answer
    /// with its own "not found" response.
    ///
    /// # Errors
    ///
    /// Returns [`JsApiError::Malformed`] for unusable bodies and any error
    /// [`JsApi::handle_endpoint_request`] propagates.
    pub fn handle(
        &self,
        uri: &str,
        body: &[u8],
        current_card: CardId,
    ) -> Result<Option<Response>, JsApiError> {
        let Some(endpoint) = self.endpoint(uri) else {
            debug!(target: JSAPI_TARGET, uri, "no endpoint for request path");
            return Ok(None);
        };
        match Self::parse_request(body) {
            Ok(data) => self
                .handle_endpoint_request(endpoint, data.as_ref(), current_card)
                .map(Some),
            Err(error) => self.recover(endpoint, Err(error)).map(Some),
        }
    }

    fn recover(
        &self,
        endpoint: Endpoint,
        outcome: Result<Response, JsApiError>,
    ) -> Result<Response, JsApiError> {
        let error = match outcome {
            Ok(response) => return Ok(response),
            Err(error) => error,
        };
        let response = error.into_failure(&self.messages)?;
        if let Response::Failure { code, message } = &response {
            info!(
                target: JSAPI_TARGET,
                %endpoint,
                code = code.value(),
                message = message.as_str(),
                "call failed"
            );
        }
        Ok(response)
    }
}

impl std::fmt::Debug for JsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsApi")
            .field("endpoints", &self.catalog.len())
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}
