//! Search language understood by the in-memory collection.
//!
//! Queries are whitespace separated terms that must all match. Double quotes
//! group words containing spaces, a leading `-` negates a term, and `*` is a
//! wildcard inside any value. Supported terms:
//!
//! - `deck:NAME` matches the deck and its children
//! - `tag:NAME` matches the tag and its children
//! - `note:NAME` matches the note type name
//! - `flag:N` matches user flag `N` (0 to 7)
//! - `is:new`, `is:learn`, `is:review`, `is:suspended`, `is:buried`
//! - `cid:1,2,3` and `nid:1,2,3` match ids
//! - anything else matches note field text, ignoring case
//!
//! An empty query or a lone `*` matches every card.

use thiserror::Error;

use super::model::{Card, CardId, CardQueue, CardType, Deck, Flag, Note, NoteId, NoteType};

/// Errors raised while parsing a search query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// `is:` was followed by an unknown state.
    #[error("unknown card state '{0}' in search")]
    UnknownState(String),
    /// `flag:` was not followed by a code between 0 and 7.
    #[error("invalid flag '{0}' in search")]
    InvalidFlag(String),
    /// `cid:` or `nid:` contained something other than integers.
    #[error("invalid id list '{0}' in search")]
    InvalidIds(String),
    /// A quoted term was never closed.
    #[error("unterminated quote in search '{0}'")]
    UnterminatedQuote(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardState {
    New,
    Learn,
    Review,
    Suspended,
    Buried,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    All,
    Deck(String),
    Tag(String),
    NoteType(String),
    Flag(Flag),
    State(CardState),
    CardIds(Vec<CardId>),
    NoteIds(Vec<NoteId>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    negated: bool,
    matcher: Matcher,
}

/// Everything a term may inspect about one card.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchSubject<'a> {
    pub(crate) card: &'a Card,
    pub(crate) note: &'a Note,
    pub(crate) note_type: Option<&'a NoteType>,
    pub(crate) deck: Option<&'a Deck>,
    pub(crate) original_deck: Option<&'a Deck>,
}

/// A parsed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<Term>,
}

impl SearchQuery {
    /// Parses `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] for malformed terms.
    pub fn parse(query: &str) -> Result<Self, SearchError> {
        let terms = tokenize(query)?
            .into_iter()
            .map(|token| parse_term(&token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { terms })
    }

    /// Whether the query matches every card.
    pub(crate) fn is_match_all(&self) -> bool {
        self.terms
            .iter()
            .all(|term| !term.negated && term.matcher == Matcher::All)
    }

    pub(crate) fn matches(&self, subject: &SearchSubject<'_>) -> bool {
        self.terms
            .iter()
            .all(|term| term.matcher.matches(subject) != term.negated)
    }
}

fn tokenize(query: &str) -> Result<Vec<String>, SearchError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in query.chars() {
        match ch {
            '"' => quoted = !quoted,
            _ if ch.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            other => current.push(other),
        }
    }
    if quoted {
        return Err(SearchError::UnterminatedQuote(query.to_owned()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_term(token: &str) -> Result<Term, SearchError> {
    let (negated, body) = match token.strip_prefix('-') {
        Some(rest) if !rest.is_empty() => (true, rest),
        _ => (false, token),
    };
    let matcher = match body.split_once(':') {
        _ if body == "*" => Matcher::All,
        Some(("deck", name)) => Matcher::Deck(name.to_lowercase()),
        Some(("tag", name)) => Matcher::Tag(name.to_lowercase()),
        Some(("note", name)) => Matcher::NoteType(name.to_lowercase()),
        Some(("flag", code)) => code
            .parse::<i64>()
            .ok()
            .and_then(Flag::from_code)
            .map(Matcher::Flag)
            .ok_or_else(|| SearchError::InvalidFlag(code.to_owned()))?,
        Some(("is", state)) => Matcher::State(parse_state(state)?),
        Some(("cid", ids)) => Matcher::CardIds(parse_ids(ids)?),
        Some(("nid", ids)) => Matcher::NoteIds(parse_ids(ids)?),
        _ => Matcher::Text(body.to_lowercase()),
    };
    Ok(Term { negated, matcher })
}

fn parse_state(state: &str) -> Result<CardState, SearchError> {
    match state.to_ascii_lowercase().as_str() {
        "new" => Ok(CardState::New),
        "learn" => Ok(CardState::Learn),
        "review" => Ok(CardState::Review),
        "suspended" => Ok(CardState::Suspended),
        "buried" => Ok(CardState::Buried),
        _ => Err(SearchError::UnknownState(state.to_owned())),
    }
}

fn parse_ids<T: From<i64>>(list: &str) -> Result<Vec<T>, SearchError> {
    list.split(',')
        .map(|id| {
            id.trim()
                .parse::<i64>()
                .map(T::from)
                .map_err(|_| SearchError::InvalidIds(list.to_owned()))
        })
        .collect()
}

impl Matcher {
    fn matches(&self, subject: &SearchSubject<'_>) -> bool {
        let card = subject.card;
        match self {
            Self::All => true,
            Self::Deck(pattern) => [subject.deck, subject.original_deck]
                .into_iter()
                .flatten()
                .any(|deck| matches_hierarchy(pattern, &deck.name)),
            Self::Tag(pattern) => subject
                .note
                .tags
                .iter()
                .any(|tag| matches_hierarchy(pattern, tag)),
            Self::NoteType(pattern) => subject
                .note_type
                .is_some_and(|note_type| wildcard_match(pattern, &note_type.name.to_lowercase())),
            Self::Flag(flag) => card.flag == *flag,
            Self::State(state) => state.matches(card),
            Self::CardIds(ids) => ids.contains(&card.id),
            Self::NoteIds(ids) => ids.contains(&card.note_id),
            Self::Text(text) => {
                let pattern = format!("*{text}*");
                subject
                    .note
                    .fields
                    .iter()
                    .any(|field| wildcard_match(&pattern, &field.to_lowercase()))
            }
        }
    }
}

impl CardState {
    fn matches(self, card: &Card) -> bool {
        match self {
            Self::New => card.card_type == CardType::New,
            Self::Learn => matches!(card.queue, CardQueue::Learn | CardQueue::DayLearn),
            Self::Review => matches!(card.card_type, CardType::Review | CardType::Relearning),
            Self::Suspended => card.queue == CardQueue::Suspended,
            Self::Buried => card.queue.is_buried(),
        }
    }
}

/// Matches `name` or any of its `::` children against a lowercase pattern.
fn matches_hierarchy(pattern: &str, name: &str) -> bool {
    let lowered = name.to_lowercase();
    wildcard_match(pattern, &lowered) || wildcard_match(&format!("{pattern}::*"), &lowered)
}

/// Glob match where `*` stands for any run of characters.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let mut pieces = pattern.split('*');
    let head = pieces.next().unwrap_or_default();
    let Some(mut remaining) = text.strip_prefix(head) else {
        return false;
    };
    let tail: Vec<&str> = pieces.collect();
    let Some((last, middle)) = tail.split_last() else {
        return remaining.is_empty();
    };
    for piece in middle {
        match remaining.split_once(piece) {
            Some((_, after)) => remaining = after,
            None => return false,
        }
    }
    remaining.ends_with(last)
}
