//! Collection entities as seen by the dispatcher.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Raw identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Card identifier.
    CardId
);
entity_id!(
    /// Note identifier.
    NoteId
);
entity_id!(
    /// Deck identifier.
    DeckId
);
entity_id!(
    /// Note type identifier.
    NoteTypeId
);

/// Tag added by `note/toggle-mark` and read by `card/is-marked`.
pub const MARKED_TAG: &str = "marked";

/// Raised when a stored code does not map to a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    kind: &'static str,
    code: i64,
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $repr:ty {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Stored code of the variant.
            #[must_use]
            pub const fn code(self) -> $repr {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Looks up a variant by its stored code.
            #[must_use]
            pub const fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl TryFrom<i64> for $name {
            type Error = UnknownCode;

            fn try_from(code: i64) -> Result<Self, Self::Error> {
                Self::from_code(code).ok_or(UnknownCode {
                    kind: stringify!($name),
                    code,
                })
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                Self::from(value.code())
            }
        }
    };
}

coded_enum! {
    /// User flag colour.
    Flag as u8 {
        #[default]
        /// No flag.
        None = 0,
        /// Red.
        Red = 1,
        /// Orange.
        Orange = 2,
        /// Green.
        Green = 3,
        /// Blue.
        Blue = 4,
        /// Pink.
        Pink = 5,
        /// Turquoise.
        Turquoise = 6,
        /// Purple.
        Purple = 7,
    }
}

coded_enum! {
    /// Learning stage of a card.
    CardType as i8 {
        #[default]
        /// Never studied.
        New = 0,
        /// In initial learning steps.
        Learn = 1,
        /// Graduated to review.
        Review = 2,
        /// Relearning after a lapse.
        Relearning = 3,
    }
}

coded_enum! {
    /// Scheduling queue of a card.
    CardQueue as i8 {
        /// Buried by the user.
        ManuallyBuried = -3,
        /// Buried automatically because a sibling was studied.
        SiblingBuried = -2,
        /// Suspended.
        Suspended = -1,
        #[default]
        /// Waiting to be introduced.
        New = 0,
        /// Intraday learning.
        Learn = 1,
        /// Due for review.
        Review = 2,
        /// Interday learning.
        DayLearn = 3,
        /// Previewed in a filtered deck.
        Preview = 4,
    }
}

impl CardQueue {
    /// Whether the queue is one of the buried queues.
    #[must_use]
    pub const fn is_buried(self) -> bool {
        matches!(self, Self::ManuallyBuried | Self::SiblingBuried)
    }
}

impl CardType {
    /// Queue a card of this type returns to when unburied or unsuspended.
    #[must_use]
    pub const fn natural_queue(self) -> CardQueue {
        match self {
            Self::New => CardQueue::New,
            Self::Learn | Self::Relearning => CardQueue::Learn,
            Self::Review => CardQueue::Review,
        }
    }
}

/// A single reviewable card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Identifier.
    pub id: CardId,
    /// Note the card was generated from.
    pub note_id: NoteId,
    /// Deck the card currently lives in.
    pub deck_id: DeckId,
    /// Home deck when the card sits in a filtered deck, otherwise 0.
    #[serde(default)]
    pub original_deck_id: DeckId,
    /// Template ordinal.
    #[serde(default)]
    pub ordinal: u16,
    /// Modification time in seconds.
    #[serde(default)]
    pub modified: i64,
    /// Learning stage.
    #[serde(default)]
    pub card_type: CardType,
    /// Scheduling queue.
    #[serde(default)]
    pub queue: CardQueue,
    /// Due position, day, or timestamp depending on the queue.
    #[serde(default)]
    pub due: i64,
    /// Due value before the card moved into a filtered deck.
    #[serde(default)]
    pub original_due: i64,
    /// Interval in days.
    #[serde(default)]
    pub interval: u32,
    /// Ease factor in permille.
    #[serde(default)]
    pub ease_factor: u32,
    /// Number of reviews.
    #[serde(default)]
    pub reps: u32,
    /// Number of lapses.
    #[serde(default)]
    pub lapses: u32,
    /// Remaining learning steps.
    #[serde(default)]
    pub left: u32,
    /// User flag.
    #[serde(default)]
    pub flag: Flag,
    /// New-queue position recorded when the card was first studied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_position: Option<i64>,
}

impl Card {
    /// New card with default scheduling state.
    #[must_use]
    pub fn new(id: CardId, note_id: NoteId, deck_id: DeckId) -> Self {
        Self {
            id,
            note_id,
            deck_id,
            original_deck_id: DeckId::default(),
            ordinal: 0,
            modified: 0,
            card_type: CardType::New,
            queue: CardQueue::New,
            due: 0,
            original_due: 0,
            interval: 0,
            ease_factor: 0,
            reps: 0,
            lapses: 0,
            left: 0,
            flag: Flag::None,
            original_position: None,
        }
    }
}

/// A note: the fields and tags cards are generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Identifier.
    pub id: NoteId,
    /// Note type defining the fields.
    pub note_type_id: NoteTypeId,
    /// Field contents in note type order.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Tags, unique ignoring case.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Modification time in seconds.
    #[serde(default)]
    pub modified: i64,
}

impl Note {
    /// Whether the note carries `tag`, ignoring case.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing.eq_ignore_ascii_case(tag))
    }

    /// Tags joined by single spaces.
    #[must_use]
    pub fn string_tags(&self) -> String {
        self.tags.join(" ")
    }

    /// Replaces the tags with the whitespace separated words of `text`.
    ///
    /// Later duplicates that differ only by case are dropped.
    pub fn set_tags_from_str(&mut self, text: &str) {
        self.tags.clear();
        for tag in text.split_whitespace() {
            self.add_tag(tag);
        }
    }

    /// Adds `tag` unless an equivalent tag is already present.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.has_tag(tag) {
            self.tags.push(tag.to_owned());
        }
    }

    /// Removes every tag equal to `tag`, ignoring case.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|existing| !existing.eq_ignore_ascii_case(tag));
    }
}

/// Template family of a note type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteTypeKind {
    /// One card per template.
    #[default]
    Standard,
    /// One card per cloze deletion.
    Cloze,
}

/// Schema shared by a family of notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteType {
    /// Identifier.
    pub id: NoteTypeId,
    /// Display name.
    pub name: String,
    /// Template family.
    #[serde(default)]
    pub kind: NoteTypeKind,
    /// Whether the note type was created for image occlusion.
    #[serde(default)]
    pub image_occlusion: bool,
    /// Field names in order.
    #[serde(default)]
    pub field_names: Vec<String>,
}

impl NoteType {
    /// Whether cards are generated from cloze deletions.
    #[must_use]
    pub fn is_cloze(&self) -> bool {
        self.kind == NoteTypeKind::Cloze
    }
}

/// A deck of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    /// Identifier.
    pub id: DeckId,
    /// Full name, with `::` separating parent decks.
    pub name: String,
    /// Whether the deck is built from a search.
    #[serde(default)]
    pub filtered: bool,
}

/// FSRS memory estimate attached to a review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    /// Stability in days.
    pub stability: f64,
    /// Difficulty between 1 and 10.
    pub difficulty: f64,
}

/// One entry of a card's review history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLog {
    /// Review time in milliseconds since the epoch.
    pub time: i64,
    /// Review kind code (learning, review, relearning, filtered, manual).
    pub review_kind: i32,
    /// Answer button pressed (1 to 4).
    pub button_chosen: u32,
    /// Interval after the review. Negative values are seconds.
    pub interval: i32,
    /// Ease factor after the review in permille.
    pub ease: u32,
    /// Seconds spent answering.
    pub taken_secs: u32,
    /// Memory estimate, when FSRS was enabled.
    #[serde(default)]
    pub memory_state: Option<MemoryState>,
}
