//! The closed set of operations exposed to card template scripts.
//!
//! Every endpoint belongs to a service group (its `base`, for example `card`)
//! and names one operation within that group (its `value`, for example
//! `get-id`). Groups are modelled as separate enums wrapped by [`Endpoint`], so
//! the dispatcher's exhaustive matches fail to compile when an operation is
//! added without a handler.

mod catalog;

use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

pub use self::catalog::{EndpointCatalog, REQUEST_PREFIX};

/// Operations on a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum CardEndpoint {
    /// Card id.
    GetId,
    /// Id of the note that generated the card.
    GetNid,
    /// User flag code (0 to 7).
    GetFlag,
    /// Number of reviews.
    GetReps,
    /// Current interval in days.
    GetInterval,
    /// Ease factor in permille.
    GetFactor,
    /// Last modification time in seconds.
    GetMod,
    /// Card type code.
    GetType,
    /// Deck id.
    GetDid,
    /// Remaining learning steps.
    GetLeft,
    /// Original deck id when the card sits in a filtered deck.
    #[strum(serialize = "get-o-did")]
    GetODid,
    /// Original due value when the card sits in a filtered deck.
    #[strum(serialize = "get-o-due")]
    GetODue,
    /// Queue code.
    GetQueue,
    /// Number of lapses.
    GetLapses,
    /// Due value.
    GetDue,
    /// Rendered question HTML.
    GetQuestion,
    /// Rendered answer HTML.
    GetAnswer,
    /// Buries the card.
    Bury,
    /// Whether the card's note carries the `marked` tag.
    IsMarked,
    /// Suspends the card.
    Suspend,
    /// Unburies the card.
    Unbury,
    /// Unsuspends the card.
    Unsuspend,
    /// Resets the card to new.
    ResetProgress,
    /// Toggles a user flag.
    ToggleFlag,
    /// Review history of the card.
    GetReviewLogs,
}

/// Operations on the collection as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum CollectionEndpoint {
    /// Reverts the last undoable operation.
    Undo,
    /// Reapplies the last undone operation.
    Redo,
    /// Whether an operation can be undone.
    IsUndoAvailable,
    /// Whether an operation can be redone.
    IsRedoAvailable,
    /// Card ids matching a search.
    FindCards,
    /// Note ids matching a search.
    FindNotes,
}

/// Operations on a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum DeckEndpoint {
    /// Deck id.
    GetId,
    /// Full deck name.
    GetName,
    /// Whether the deck is filtered.
    IsFiltered,
}

/// Operations on a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum NoteEndpoint {
    /// Note id.
    GetId,
    /// Note type id.
    GetNoteTypeId,
    /// Ids of the note's cards.
    GetCardIds,
    /// Buries all cards of the note.
    Bury,
    /// Suspends all cards of the note.
    Suspend,
    /// Space separated tags.
    GetTags,
    /// Replaces the note's tags.
    SetTags,
    /// Adds or removes the `marked` tag.
    ToggleMark,
}

/// Operations on a note type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum NoteTypeEndpoint {
    /// Note type id.
    GetId,
    /// Note type name.
    GetName,
    /// Whether the note type is an image occlusion type.
    IsImageOcclusion,
    /// Whether the note type is a cloze type.
    IsCloze,
    /// Field names in order.
    GetFieldNames,
}

/// Text-to-speech operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TtsEndpoint {
    /// Speaks text.
    Speak,
    /// Selects the speech locale.
    SetLanguage,
    /// Sets the speech pitch.
    SetPitch,
    /// Sets the speech rate.
    SetSpeechRate,
    /// Whether speech is in progress.
    IsSpeaking,
    /// Stops speaking.
    Stop,
}

/// Host platform operations. Recognised but not wired to any capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum AndroidEndpoint {
    /// Shows a transient message.
    ShowSnackbar,
    /// Whether the system uses a dark theme.
    IsSystemInDarkMode,
    /// Whether the active network is metered.
    IsNetworkMetered,
}

/// Study screen operations. Recognised but not wired to any capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum StudyScreenEndpoint {
    /// New card count.
    GetNewCount,
    /// Learning card count.
    GetLearnCount,
    /// Review card count.
    GetReviewCount,
    /// Estimated remaining study time.
    GetEta,
    /// Next interval for an answer button.
    GetNextTime,
    /// Whether the answer side is shown.
    IsShowingAnswer,
    /// Reveals the answer side.
    ShowAnswer,
    /// Answers the current card.
    Answer,
    /// Opens the card info screen.
    OpenCardInfo,
    /// Opens the note editor.
    OpenNoteEditor,
    /// Opens the browser with a search.
    Search,
}

/// A single callable operation, tagged by its service group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `card/*`
    Card(CardEndpoint),
    /// `collection/*`
    Collection(CollectionEndpoint),
    /// `deck/*`
    Deck(DeckEndpoint),
    /// `note/*`
    Note(NoteEndpoint),
    /// `note-type/*`
    NoteType(NoteTypeEndpoint),
    /// `tts/*`
    Tts(TtsEndpoint),
    /// `android/*`
    Android(AndroidEndpoint),
    /// `study-screen/*`
    StudyScreen(StudyScreenEndpoint),
}

impl Endpoint {
    /// Service group name.
    #[must_use]
    pub const fn base(&self) -> &'static str {
        match self {
            Self::Card(_) => "card",
            Self::Collection(_) => "collection",
            Self::Deck(_) => "deck",
            Self::Note(_) => "note",
            Self::NoteType(_) => "note-type",
            Self::Tts(_) => "tts",
            Self::Android(_) => "android",
            Self::StudyScreen(_) => "study-screen",
        }
    }

    /// Operation name within the group.
    #[must_use]
    pub fn value(&self) -> &'static str {
        match *self {
            Self::Card(op) => op.into(),
            Self::Collection(op) => op.into(),
            Self::Deck(op) => op.into(),
            Self::Note(op) => op.into(),
            Self::NoteType(op) => op.into(),
            Self::Tts(op) => op.into(),
            Self::Android(op) => op.into(),
            Self::StudyScreen(op) => op.into(),
        }
    }

    /// Every endpoint of every group, in catalog order.
    pub fn all() -> impl Iterator<Item = Self> {
        CardEndpoint::iter()
            .map(Self::Card)
            .chain(CollectionEndpoint::iter().map(Self::Collection))
            .chain(DeckEndpoint::iter().map(Self::Deck))
            .chain(NoteEndpoint::iter().map(Self::Note))
            .chain(NoteTypeEndpoint::iter().map(Self::NoteType))
            .chain(TtsEndpoint::iter().map(Self::Tts))
            .chain(AndroidEndpoint::iter().map(Self::Android))
            .chain(StudyScreenEndpoint::iter().map(Self::StudyScreen))
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base(), self.value())
    }
}
