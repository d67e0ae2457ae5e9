//! A small collection and request builders.

use std::sync::Arc;

use serde_json::{Value, json};

use deckbridge_jsapi::collection::{
    Card, CardId, CollectionSnapshot, Deck, DeckId, MemoryCollection, Note, NoteId, NoteType,
    NoteTypeId, NoteTypeKind,
};
use deckbridge_jsapi::{CollectionManager, ContractMessages, JsApi};

use crate::speech::TracingSpeech;

pub(crate) const DEVELOPER: &str = "templates@example.com";

/// One deck, one note, three cards (ids 42, 43, 44).
pub(crate) fn sample_snapshot() -> CollectionSnapshot {
    CollectionSnapshot {
        decks: vec![Deck {
            id: DeckId(1),
            name: "Spanish".to_owned(),
            filtered: false,
        }],
        note_types: vec![NoteType {
            id: NoteTypeId(10),
            name: "Basic (and reversed card)".to_owned(),
            kind: NoteTypeKind::Standard,
            image_occlusion: false,
            field_names: vec!["Front".to_owned(), "Back".to_owned()],
        }],
        notes: vec![Note {
            id: NoteId(100),
            note_type_id: NoteTypeId(10),
            fields: vec!["hola".to_owned(), "hello".to_owned()],
            tags: vec!["greetings".to_owned()],
            modified: 0,
        }],
        cards: [42, 43, 44]
            .into_iter()
            .map(|id| Card::new(CardId(id), NoteId(100), DeckId(1)))
            .collect(),
        review_logs: Vec::new(),
    }
}

pub(crate) fn sample_api() -> Arc<JsApi> {
    let collection = CollectionManager::new(MemoryCollection::from_snapshot(sample_snapshot()));
    Arc::new(JsApi::new(
        collection,
        Arc::new(TracingSpeech::new()),
        ContractMessages::english(),
    ))
}

/// Script request body declaring [`DEVELOPER`] and `version`.
pub(crate) fn contract_body(version: &str, data: Option<Value>) -> Value {
    let mut body = json!({ "developer": DEVELOPER, "version": version });
    if let (Some(fields), Some(object)) = (data, body.as_object_mut()) {
        object.insert("data".to_owned(), fields);
    }
    body
}

/// Request line for `path` with a contract at `version`.
pub(crate) fn api_call(path: &str, version: &str, data: Option<Value>, current_card: i64) -> String {
    json!({
        "path": path,
        "body": contract_body(version, data),
        "current_card": current_card,
    })
    .to_string()
}
