//! Lookup table from `(base, value)` pairs to endpoints.

use std::collections::HashMap;

use super::Endpoint;

/// Prefix stripped from request URIs before resolution.
pub const REQUEST_PREFIX: &str = "/jsapi/";

/// Index of every endpoint keyed by its `(base, value)` pair.
///
/// Built once at startup and shared by the dispatcher.
#[derive(Debug, Clone)]
pub struct EndpointCatalog {
    groups: HashMap<&'static str, HashMap<&'static str, Endpoint>>,
}

impl EndpointCatalog {
    /// Indexes every endpoint group.
    #[must_use]
    pub fn new() -> Self {
        let mut groups: HashMap<&'static str, HashMap<&'static str, Endpoint>> = HashMap::new();
        for endpoint in Endpoint::all() {
            groups
                .entry(endpoint.base())
                .or_default()
                .insert(endpoint.value(), endpoint);
        }
        Self { groups }
    }

    /// Looks up an endpoint by group and operation name.
    #[must_use]
    pub fn get(&self, base: &str, value: &str) -> Option<Endpoint> {
        self.groups.get(base)?.get(value).copied()
    }

    /// Resolves a request URI such as `/jsapi/card/get-id`.
    ///
    /// The prefix is optional. The remainder is split on the first `/` only,
    /// so a value containing further slashes never matches. Returns `None` when
    /// no catalog entry matches.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> Option<Endpoint> {
        let path = uri.strip_prefix(REQUEST_PREFIX).unwrap_or(uri);
        let (base, value) = path.split_once('/')?;
        self.get(base, value)
    }

    /// Number of indexed endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(HashMap::is_empty)
    }
}

impl Default for EndpointCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::endpoint::{CardEndpoint, CollectionEndpoint, NoteTypeEndpoint};

    #[fixture]
    fn catalog() -> EndpointCatalog {
        EndpointCatalog::new()
    }

    #[rstest]
    fn every_endpoint_resolves_to_itself(catalog: EndpointCatalog) {
        for endpoint in Endpoint::all() {
            assert_eq!(
                catalog.get(endpoint.base(), endpoint.value()),
                Some(endpoint),
                "{endpoint} should resolve from its own pair"
            );
        }
    }

    #[rstest]
    fn pairs_are_unique(catalog: EndpointCatalog) {
        assert_eq!(catalog.len(), Endpoint::all().count());
    }

    #[rstest]
    #[case("/jsapi/card/get-id", Some(Endpoint::Card(CardEndpoint::GetId)))]
    #[case("card/get-id", Some(Endpoint::Card(CardEndpoint::GetId)))]
    #[case(
        "/jsapi/collection/find-cards",
        Some(Endpoint::Collection(CollectionEndpoint::FindCards))
    )]
    #[case(
        "/jsapi/note-type/get-field-names",
        Some(Endpoint::NoteType(NoteTypeEndpoint::GetFieldNames))
    )]
    #[case("/jsapi/card/get-id/extra", None)]
    #[case("/jsapi/card", None)]
    #[case("/jsapi/", None)]
    #[case("/jsapi/cards/get-id", None)]
    #[case("/jsapi/card/GET-ID", None)]
    fn resolves_request_paths(
        catalog: EndpointCatalog,
        #[case] uri: &str,
        #[case] expected: Option<Endpoint>,
    ) {
        assert_eq!(catalog.resolve(uri), expected);
    }
}
