//! Access to the flashcard collection backing the dispatcher.
//!
//! The dispatcher never owns collection data. It talks to a [`Collection`]
//! through a [`CollectionManager`], which serialises access and turns each
//! mutation into a single undo step.

mod manager;
mod memory;
mod model;
mod search;

use thiserror::Error;

pub use self::manager::CollectionManager;
pub use self::memory::{CollectionSnapshot, MemoryCollection, RevlogEntry};
pub use self::model::{
    Card, CardId, CardQueue, CardType, Deck, DeckId, Flag, MARKED_TAG, MemoryState, Note, NoteId,
    NoteType, NoteTypeId, NoteTypeKind, ReviewLog, UnknownCode,
};
pub use self::search::{SearchError, SearchQuery};

/// Kinds of entity a lookup can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum EntityKind {
    /// A card.
    #[strum(serialize = "card")]
    Card,
    /// A note.
    #[strum(serialize = "note")]
    Note,
}

/// Errors raised by collection backends.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// No entity exists with the given id.
    #[error("found no {kind} with the id '{id}'")]
    NotFound {
        /// Entity type that was looked up.
        kind: EntityKind,
        /// Identifier that failed to resolve.
        id: i64,
    },

    /// A search query could not be parsed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// The backend failed for reasons outside the caller's control.
    #[error("collection backend failure: {message}")]
    Backend {
        /// Backend diagnostic.
        message: String,
    },

    /// A previous operation panicked while holding the collection lock.
    #[error("collection lock poisoned")]
    Poisoned,
}

impl CollectionError {
    /// Creates a not-found error for a card.
    #[must_use]
    pub const fn card_not_found(id: CardId) -> Self {
        Self::NotFound {
            kind: EntityKind::Card,
            id: id.get(),
        }
    }

    /// Creates a not-found error for a note.
    #[must_use]
    pub const fn note_not_found(id: NoteId) -> Self {
        Self::NotFound {
            kind: EntityKind::Note,
            id: id.get(),
        }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Operations the dispatcher needs from a collection.
///
/// Reads take `&self`; mutations take `&mut self` and are only invoked between
/// [`Collection::begin_undoable`] and either [`Collection::commit_undoable`] or
/// [`Collection::rollback_undoable`]. Callers go through
/// [`CollectionManager`], which enforces that bracketing.
pub trait Collection: Send {
    /// Loads a card.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] for unknown ids.
    fn card(&self, id: CardId) -> Result<Card, CollectionError>;

    /// Loads a note.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] for unknown ids.
    fn note(&self, id: NoteId) -> Result<Note, CollectionError>;

    /// Loads a note type, or `None` when it does not exist.
    fn note_type(&self, id: NoteTypeId) -> Option<NoteType>;

    /// Loads a deck, or `None` when it does not exist.
    fn deck(&self, id: DeckId) -> Option<Deck>;

    /// Renders the question side of `card`.
    ///
    /// # Errors
    ///
    /// Returns an error when the card's note cannot be loaded.
    fn render_question(&self, card: &Card) -> Result<String, CollectionError>;

    /// Renders the answer side of `card`.
    ///
    /// # Errors
    ///
    /// Returns an error when the card's note cannot be loaded.
    fn render_answer(&self, card: &Card) -> Result<String, CollectionError>;

    /// Ids of the cards generated from a note, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] for unknown notes.
    fn note_card_ids(&self, id: NoteId) -> Result<Vec<CardId>, CollectionError>;

    /// Review history of a card, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error when the history cannot be read.
    fn review_logs(&self, id: CardId) -> Result<Vec<ReviewLog>, CollectionError>;

    /// Ids of the cards matching `query`, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Search`] for unparseable queries.
    fn find_cards(&self, query: &str) -> Result<Vec<CardId>, CollectionError>;

    /// Ids of the notes with at least one card matching `query`, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Search`] for unparseable queries.
    fn find_notes(&self, query: &str) -> Result<Vec<NoteId>, CollectionError>;

    /// Whether an operation can be undone.
    fn undo_available(&self) -> bool;

    /// Whether an undone operation can be reapplied.
    fn redo_available(&self) -> bool;

    /// Reverts the most recent undoable operation and returns its label.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Backend`] when nothing can be undone.
    fn undo(&mut self) -> Result<String, CollectionError>;

    /// Reapplies the most recently undone operation and returns its label.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Backend`] when nothing can be redone.
    fn redo(&mut self) -> Result<String, CollectionError>;

    /// Buries cards and returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] when an id is unknown.
    fn bury_cards(&mut self, ids: &[CardId]) -> Result<usize, CollectionError>;

    /// Suspends cards and returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] when an id is unknown.
    fn suspend_cards(&mut self, ids: &[CardId]) -> Result<usize, CollectionError>;

    /// Returns buried cards to their natural queue.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] when an id is unknown.
    fn unbury_cards(&mut self, ids: &[CardId]) -> Result<(), CollectionError>;

    /// Returns suspended cards to their natural queue.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] when an id is unknown.
    fn unsuspend_cards(&mut self, ids: &[CardId]) -> Result<(), CollectionError>;

    /// Resets cards to new.
    ///
    /// `restore_position` keeps each card's original new-queue position;
    /// otherwise cards move to the end of the new queue. `reset_counts`
    /// clears review and lapse counters.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] when an id is unknown.
    fn forget_cards(
        &mut self,
        ids: &[CardId],
        restore_position: bool,
        reset_counts: bool,
    ) -> Result<(), CollectionError>;

    /// Sets the user flag of cards and returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] when an id is unknown.
    fn set_user_flag(&mut self, ids: &[CardId], flag: Flag) -> Result<usize, CollectionError>;

    /// Buries every card of the notes and returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] when an id is unknown.
    fn bury_notes(&mut self, ids: &[NoteId]) -> Result<usize, CollectionError>;

    /// Suspends every card of the notes and returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] when an id is unknown.
    fn suspend_notes(&mut self, ids: &[NoteId]) -> Result<usize, CollectionError>;

    /// Persists changes to a note.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] when the note does not exist.
    fn update_note(&mut self, note: &Note) -> Result<(), CollectionError>;

    /// Opens an undo step named `label`.
    fn begin_undoable(&mut self, label: &str);

    /// Closes the open undo step, keeping its changes.
    fn commit_undoable(&mut self);

    /// Closes the open undo step, discarding its changes.
    fn rollback_undoable(&mut self);
}
