//! In-memory collection with snapshot-based undo.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::model::{
    Card, CardId, CardQueue, CardType, Deck, DeckId, Flag, Note, NoteId, NoteType, NoteTypeId,
    ReviewLog,
};
use super::search::{SearchQuery, SearchSubject};
use super::{Collection, CollectionError};

/// Number of undo steps retained.
pub const UNDO_LIMIT: usize = 30;

/// Serialisable contents of a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSnapshot {
    /// Decks.
    #[serde(default)]
    pub decks: Vec<Deck>,
    /// Note types.
    #[serde(default)]
    pub note_types: Vec<NoteType>,
    /// Notes.
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Cards.
    #[serde(default)]
    pub cards: Vec<Card>,
    /// Review history entries.
    #[serde(default)]
    pub review_logs: Vec<RevlogEntry>,
}

/// A review log together with the card it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevlogEntry {
    /// Reviewed card.
    pub card_id: CardId,
    /// Review details.
    #[serde(flatten)]
    pub log: ReviewLog,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct State {
    decks: BTreeMap<DeckId, Deck>,
    note_types: BTreeMap<NoteTypeId, NoteType>,
    notes: BTreeMap<NoteId, Note>,
    cards: BTreeMap<CardId, Card>,
    review_logs: BTreeMap<CardId, Vec<ReviewLog>>,
}

#[derive(Debug, Clone)]
struct UndoStep {
    label: String,
    state: State,
}

/// A complete [`Collection`] held in memory.
///
/// Each undo step stores a copy of the state it replaced, which keeps undo and
/// redo exact at the cost of memory proportional to [`UNDO_LIMIT`].
#[derive(Debug, Default)]
pub struct MemoryCollection {
    state: State,
    undo: VecDeque<UndoStep>,
    redo: Vec<UndoStep>,
    pending: Option<UndoStep>,
}

impl MemoryCollection {
    /// Builds a collection from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: CollectionSnapshot) -> Self {
        let mut collection = Self::default();
        for deck in snapshot.decks {
            collection.add_deck(deck);
        }
        for note_type in snapshot.note_types {
            collection.add_note_type(note_type);
        }
        for note in snapshot.notes {
            collection.add_note(note);
        }
        for card in snapshot.cards {
            collection.insert_card(card);
        }
        for entry in snapshot.review_logs {
            collection.add_review_log(entry.card_id, entry.log);
        }
        collection
    }

    /// Adds or replaces a deck.
    pub fn add_deck(&mut self, deck: Deck) {
        self.state.decks.insert(deck.id, deck);
    }

    /// Adds or replaces a note type.
    pub fn add_note_type(&mut self, note_type: NoteType) {
        self.state.note_types.insert(note_type.id, note_type);
    }

    /// Adds or replaces a note.
    pub fn add_note(&mut self, note: Note) {
        self.state.notes.insert(note.id, note);
    }

    /// Adds or replaces a card.
    pub fn insert_card(&mut self, card: Card) {
        self.state.cards.insert(card.id, card);
    }

    /// Appends a review to a card's history, keeping it ordered by time.
    pub fn add_review_log(&mut self, card_id: CardId, log: ReviewLog) {
        let logs = self.state.review_logs.entry(card_id).or_default();
        logs.push(log);
        logs.sort_by_key(|entry| entry.time);
    }

    fn note_ref(&self, id: NoteId) -> Result<&Note, CollectionError> {
        self.state
            .notes
            .get(&id)
            .ok_or_else(|| CollectionError::note_not_found(id))
    }

    fn ensure_cards(&self, ids: &[CardId]) -> Result<(), CollectionError> {
        match ids.iter().find(|id| !self.state.cards.contains_key(id)) {
            Some(missing) => Err(CollectionError::card_not_found(*missing)),
            None => Ok(()),
        }
    }

    /// Applies `change` to every card in `ids` and counts the cards it
    /// reports as changed. Unknown ids fail before anything is modified.
    fn update_cards<F>(&mut self, ids: &[CardId], mut change: F) -> Result<usize, CollectionError>
    where
        F: FnMut(&mut Card) -> bool,
    {
        self.ensure_cards(ids)?;
        let modified = now_secs();
        let mut count = 0;
        for id in ids {
            if let Some(card) = self.state.cards.get_mut(id)
                && change(card)
            {
                card.modified = modified;
                count += 1;
            }
        }
        Ok(count)
    }

    fn cards_of_notes(&self, ids: &[NoteId]) -> Result<Vec<CardId>, CollectionError> {
        let mut cards = Vec::new();
        for id in ids {
            cards.extend(self.note_card_ids(*id)?);
        }
        Ok(cards)
    }

    fn restore(&mut self, from_undo: bool) -> Result<String, CollectionError> {
        let step = if from_undo {
            self.undo.pop_back()
        } else {
            self.redo.pop()
        };
        let Some(UndoStep { label, state }) = step else {
            let action = if from_undo { "undo" } else { "redo" };
            return Err(CollectionError::backend(format!("nothing to {action}")));
        };
        let replaced = UndoStep {
            label: label.clone(),
            state: std::mem::replace(&mut self.state, state),
        };
        if from_undo {
            self.redo.push(replaced);
        } else {
            self.push_undo(replaced);
        }
        Ok(label)
    }

    fn push_undo(&mut self, step: UndoStep) {
        if self.undo.len() == UNDO_LIMIT {
            self.undo.pop_front();
        }
        self.undo.push_back(step);
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}

impl Collection for MemoryCollection {
    fn card(&self, id: CardId) -> Result<Card, CollectionError> {
        self.state
            .cards
            .get(&id)
            .cloned()
            .ok_or_else(|| CollectionError::card_not_found(id))
    }

    fn note(&self, id: NoteId) -> Result<Note, CollectionError> {
        self.note_ref(id).cloned()
    }

    fn note_type(&self, id: NoteTypeId) -> Option<NoteType> {
        self.state.note_types.get(&id).cloned()
    }

    fn deck(&self, id: DeckId) -> Option<Deck> {
        self.state.decks.get(&id).cloned()
    }

    fn render_question(&self, card: &Card) -> Result<String, CollectionError> {
        let note = self.note_ref(card.note_id)?;
        Ok(note.fields.first().cloned().unwrap_or_default())
    }

    fn render_answer(&self, card: &Card) -> Result<String, CollectionError> {
        let note = self.note_ref(card.note_id)?;
        let question = note.fields.first().map_or("", String::as_str);
        let back = note.fields.get(1).map_or("", String::as_str);
        Ok(format!("{question}\n\n<hr id=answer>\n\n{back}"))
    }

    fn note_card_ids(&self, id: NoteId) -> Result<Vec<CardId>, CollectionError> {
        self.note_ref(id)?;
        Ok(self
            .state
            .cards
            .values()
            .filter(|card| card.note_id == id)
            .map(|card| card.id)
            .collect())
    }

    fn review_logs(&self, id: CardId) -> Result<Vec<ReviewLog>, CollectionError> {
        Ok(self.state.review_logs.get(&id).cloned().unwrap_or_default())
    }

    fn find_cards(&self, query: &str) -> Result<Vec<CardId>, CollectionError> {
        let search = SearchQuery::parse(query)?;
        let match_all = search.is_match_all();
        Ok(self
            .state
            .cards
            .values()
            .filter(|card| {
                self.state.notes.get(&card.note_id).is_some_and(|note| {
                    match_all
                        || search.matches(&SearchSubject {
                            card,
                            note,
                            note_type: self.state.note_types.get(&note.note_type_id),
                            deck: self.state.decks.get(&card.deck_id),
                            original_deck: self.state.decks.get(&card.original_deck_id),
                        })
                })
            })
            .map(|card| card.id)
            .collect())
    }

    fn find_notes(&self, query: &str) -> Result<Vec<NoteId>, CollectionError> {
        let card_ids = self.find_cards(query)?;
        let notes: BTreeSet<NoteId> = card_ids
            .iter()
            .filter_map(|id| self.state.cards.get(id).map(|card| card.note_id))
            .collect();
        Ok(notes.into_iter().collect())
    }

    fn undo_available(&self) -> bool {
        !self.undo.is_empty()
    }

    fn redo_available(&self) -> bool {
        !self.redo.is_empty()
    }

    fn undo(&mut self) -> Result<String, CollectionError> {
        self.restore(true)
    }

    fn redo(&mut self) -> Result<String, CollectionError> {
        self.restore(false)
    }

    fn bury_cards(&mut self, ids: &[CardId]) -> Result<usize, CollectionError> {
        self.update_cards(ids, |card| {
            if card.queue.is_buried() {
                return false;
            }
            card.queue = CardQueue::ManuallyBuried;
            true
        })
    }

    fn suspend_cards(&mut self, ids: &[CardId]) -> Result<usize, CollectionError> {
        self.update_cards(ids, |card| {
            if card.queue == CardQueue::Suspended {
                return false;
            }
            card.queue = CardQueue::Suspended;
            true
        })
    }

    fn unbury_cards(&mut self, ids: &[CardId]) -> Result<(), CollectionError> {
        self.update_cards(ids, |card| {
            if !card.queue.is_buried() {
                return false;
            }
            card.queue = card.card_type.natural_queue();
            true
        })
        .map(drop)
    }

    fn unsuspend_cards(&mut self, ids: &[CardId]) -> Result<(), CollectionError> {
        self.update_cards(ids, |card| {
            if card.queue != CardQueue::Suspended {
                return false;
            }
            card.queue = card.card_type.natural_queue();
            true
        })
        .map(drop)
    }

    fn forget_cards(
        &mut self,
        ids: &[CardId],
        restore_position: bool,
        reset_counts: bool,
    ) -> Result<(), CollectionError> {
        let mut next_position = self
            .state
            .cards
            .values()
            .filter(|card| card.card_type == CardType::New)
            .map(|card| card.due)
            .max()
            .map_or(0, |due| due.saturating_add(1));
        self.update_cards(ids, |card| {
            let position = match card.original_position {
                Some(original) if restore_position => original,
                _ => {
                    let assigned = next_position;
                    next_position = next_position.saturating_add(1);
                    assigned
                }
            };
            if card.original_deck_id != DeckId::default() {
                card.deck_id = card.original_deck_id;
                card.original_deck_id = DeckId::default();
                card.original_due = 0;
            }
            card.card_type = CardType::New;
            card.queue = CardQueue::New;
            card.due = position;
            card.interval = 0;
            card.ease_factor = 0;
            card.left = 0;
            if reset_counts {
                card.reps = 0;
                card.lapses = 0;
            }
            true
        })
        .map(drop)
    }

    fn set_user_flag(&mut self, ids: &[CardId], flag: Flag) -> Result<usize, CollectionError> {
        self.update_cards(ids, |card| {
            if card.flag == flag {
                return false;
            }
            card.flag = flag;
            true
        })
    }

    fn bury_notes(&mut self, ids: &[NoteId]) -> Result<usize, CollectionError> {
        let cards = self.cards_of_notes(ids)?;
        self.bury_cards(&cards)
    }

    fn suspend_notes(&mut self, ids: &[NoteId]) -> Result<usize, CollectionError> {
        let cards = self.cards_of_notes(ids)?;
        self.suspend_cards(&cards)
    }

    fn update_note(&mut self, note: &Note) -> Result<(), CollectionError> {
        let stored = self
            .state
            .notes
            .get_mut(&note.id)
            .ok_or_else(|| CollectionError::note_not_found(note.id))?;
        if stored.note_type_id == note.note_type_id
            && stored.fields == note.fields
            && stored.tags == note.tags
        {
            return Ok(());
        }
        *stored = note.clone();
        stored.modified = now_secs();
        Ok(())
    }

    fn begin_undoable(&mut self, label: &str) {
        self.pending = Some(UndoStep {
            label: label.to_owned(),
            state: self.state.clone(),
        });
    }

    /// Records the pending step unless the operation left the state untouched.
    fn commit_undoable(&mut self) {
        if let Some(step) = self.pending.take()
            && step.state != self.state
        {
            self.push_undo(step);
            self.redo.clear();
        }
    }

    fn rollback_undoable(&mut self) {
        if let Some(step) = self.pending.take() {
            self.state = step.state;
        }
    }
}
