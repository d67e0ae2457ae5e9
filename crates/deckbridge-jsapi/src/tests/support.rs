//! Shared fixtures: a small collection, a recording speech engine, and a
//! harness that dispatches calls and decodes the encoded envelopes.

use std::sync::{Arc, Mutex};

use rstest::fixture;
use serde_json::{Value, json};

use crate::collection::{
    Card, CardId, CardQueue, CardType, CollectionManager, Deck, DeckId, MemoryCollection,
    MemoryState, Note, NoteId, NoteType, NoteTypeId, NoteTypeKind, ReviewLog,
};
use crate::speech::{QueueMode, Speech, SpeechError};
use crate::{ContractMessages, Endpoint, JsApi, Payload, Response};

pub(crate) const DEVELOPER: &str = "templates@example.com";
pub(crate) const CURRENT_CARD: CardId = CardId(42);

pub(crate) fn sample_collection() -> MemoryCollection {
    let mut collection = MemoryCollection::default();
    for (id, name, filtered) in [
        (1, "Default", false),
        (2, "Spanish::Verbs", false),
        (3, "Leeches", true),
    ] {
        collection.add_deck(Deck {
            id: DeckId(id),
            name: name.to_owned(),
            filtered,
        });
    }
    collection.add_note_type(NoteType {
        id: NoteTypeId(10),
        name: "Basic".to_owned(),
        kind: NoteTypeKind::Standard,
        image_occlusion: false,
        field_names: vec!["Front".to_owned(), "Back".to_owned()],
    });
    collection.add_note_type(NoteType {
        id: NoteTypeId(11),
        name: "Image Occlusion".to_owned(),
        kind: NoteTypeKind::Cloze,
        image_occlusion: true,
        field_names: vec![
            "Occlusion".to_owned(),
            "Image".to_owned(),
            "Header".to_owned(),
        ],
    });
    collection.add_note(Note {
        id: NoteId(100),
        note_type_id: NoteTypeId(10),
        fields: vec!["hablar".to_owned(), "to speak".to_owned()],
        tags: vec!["verbs".to_owned()],
        modified: 0,
    });
    collection.add_note(Note {
        id: NoteId(101),
        note_type_id: NoteTypeId(11),
        fields: vec!["{{c1::image-occlusion:rect}}".to_owned(), "map.png".to_owned()],
        tags: vec!["geography".to_owned(), "marked".to_owned()],
        modified: 0,
    });

    let mut reviewed = Card::new(CardId(42), NoteId(100), DeckId(2));
    reviewed.card_type = CardType::Review;
    reviewed.queue = CardQueue::Review;
    reviewed.due = 120;
    reviewed.interval = 10;
    reviewed.ease_factor = 2500;
    reviewed.reps = 6;
    reviewed.lapses = 1;
    reviewed.modified = 1_700_000_000;
    collection.insert_card(reviewed);

    let mut reverse = Card::new(CardId(43), NoteId(100), DeckId(2));
    reverse.ordinal = 1;
    reverse.due = 5;
    collection.insert_card(reverse);

    let mut filtered = Card::new(CardId(50), NoteId(101), DeckId(3));
    filtered.original_deck_id = DeckId(1);
    filtered.original_due = 7;
    filtered.due = -100_000;
    collection.insert_card(filtered);

    collection.add_review_log(
        CardId(42),
        ReviewLog {
            time: 1_699_000_000_000,
            review_kind: 0,
            button_chosen: 3,
            interval: -600,
            ease: 0,
            taken_secs: 8,
            memory_state: None,
        },
    );
    collection.add_review_log(
        CardId(42),
        ReviewLog {
            time: 1_699_500_000_000,
            review_kind: 1,
            button_chosen: 3,
            interval: 10,
            ease: 2500,
            taken_secs: 5,
            memory_state: Some(MemoryState {
                stability: 10.5,
                difficulty: 4.25,
            }),
        },
    );
    collection
}

/// A speech call observed by [`RecordingSpeech`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SpeechCall {
    Speak(String, QueueMode),
    Language(String),
    Pitch(f64),
    Rate(f64),
    Stop,
}

/// Speech engine that records calls and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct RecordingSpeech {
    calls: Mutex<Vec<SpeechCall>>,
    failure: Mutex<Option<SpeechError>>,
}

impl RecordingSpeech {
    pub(crate) fn calls(&self) -> Vec<SpeechCall> {
        self.calls.lock().expect("speech calls lock").clone()
    }

    pub(crate) fn fail_with(&self, error: SpeechError) {
        *self.failure.lock().expect("speech failure lock") = Some(error);
    }

    fn record(&self, call: SpeechCall) -> Result<(), SpeechError> {
        self.calls.lock().expect("speech calls lock").push(call);
        match *self.failure.lock().expect("speech failure lock") {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Speech for RecordingSpeech {
    fn speak(&self, text: &str, mode: QueueMode) -> Result<(), SpeechError> {
        self.record(SpeechCall::Speak(text.to_owned(), mode))
    }

    fn set_language(&self, locale: &str) -> i32 {
        self.calls
            .lock()
            .expect("speech calls lock")
            .push(SpeechCall::Language(locale.to_owned()));
        if locale.starts_with("es") { 1 } else { -2 }
    }

    fn set_pitch(&self, pitch: f64) -> Result<(), SpeechError> {
        self.record(SpeechCall::Pitch(pitch))
    }

    fn set_speech_rate(&self, rate: f64) -> Result<(), SpeechError> {
        self.record(SpeechCall::Rate(rate))
    }

    fn is_speaking(&self) -> bool {
        self.calls
            .lock()
            .expect("speech calls lock")
            .iter()
            .any(|call| matches!(call, SpeechCall::Speak(..)))
    }

    fn stop(&self) -> Result<(), SpeechError> {
        self.record(SpeechCall::Stop)
    }
}

/// Dispatcher wired to [`sample_collection`] and [`RecordingSpeech`].
pub(crate) struct Harness {
    pub(crate) api: JsApi,
    pub(crate) speech: Arc<RecordingSpeech>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let speech = Arc::new(RecordingSpeech::default());
        let api = JsApi::new(
            CollectionManager::new(sample_collection()),
            speech.clone(),
            ContractMessages::english(),
        );
        Self { api, speech }
    }

    /// Dispatches `endpoint` with `data` and returns the decoded envelope.
    pub(crate) fn call(&self, endpoint: Endpoint, data: Value) -> Value {
        let payload = match data {
            Value::Object(map) => Some(Payload::new(map)),
            Value::Null => None,
            other => panic!("payload must be an object or null, got {other}"),
        };
        let response = self
            .api
            .handle_endpoint_request(endpoint, payload.as_ref(), CURRENT_CARD)
            .expect("dispatch should not propagate");
        decode(&response)
    }

    /// Runs the full pipeline for `path` with a raw request body.
    pub(crate) fn request(&self, path: &str, body: &Value) -> Option<Value> {
        let bytes = serde_json::to_vec(body).expect("serialize body");
        self.api
            .handle(path, &bytes, CURRENT_CARD)
            .expect("pipeline should not propagate")
            .map(|response| decode(&response))
    }

    /// Reads the current state of a card.
    pub(crate) fn card(&self, id: i64) -> Card {
        self.api
            .collection()
            .with_col(|col| col.card(CardId(id)))
            .expect("card exists")
    }

    /// Reads the current state of a note.
    pub(crate) fn note(&self, id: i64) -> Note {
        self.api
            .collection()
            .with_col(|col| col.note(NoteId(id)))
            .expect("note exists")
    }
}

pub(crate) fn decode(response: &Response) -> Value {
    let bytes = response.encode().expect("encode response");
    serde_json::from_slice(&bytes).expect("envelope is JSON")
}

pub(crate) fn success(value: Value) -> Value {
    json!({"success": true, "value": value})
}

pub(crate) fn failure(code: i32, message: &str) -> Value {
    json!({"success": false, "code": code, "message": message})
}

pub(crate) fn body(data: Value) -> Value {
    json!({"developer": DEVELOPER, "version": "1.0.0", "data": data})
}

#[fixture]
pub(crate) fn harness() -> Harness {
    Harness::new()
}
