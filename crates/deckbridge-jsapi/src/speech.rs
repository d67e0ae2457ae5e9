//! Text-to-speech collaborator.

use thiserror::Error;

/// Status code reported by engines for a successful call.
pub const STATUS_SUCCESS: i32 = 0;
/// Status code reported by engines for a generic failure.
pub const STATUS_ERROR: i32 = -1;

/// How new speech interacts with speech already queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueMode {
    /// Drop queued speech and speak immediately.
    Flush,
    /// Append to the queue.
    Add,
}

impl QueueMode {
    /// Maps the script-facing code (`0` flush, `1` add).
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Flush),
            1 => Some(Self::Add),
            _ => None,
        }
    }
}

/// Failures reported by a speech engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// The engine reported a generic error.
    #[error("speech engine error")]
    Engine,
    /// The engine returned a status this crate does not recognise.
    #[error("unknown speech engine status {0}")]
    Unknown(i32),
}

impl SpeechError {
    /// Interprets an engine status code. Returns `Ok` for [`STATUS_SUCCESS`].
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::Engine`] for [`STATUS_ERROR`] and
    /// [`SpeechError::Unknown`] for any other code.
    pub const fn check_status(status: i32) -> Result<(), Self> {
        match status {
            STATUS_SUCCESS => Ok(()),
            STATUS_ERROR => Err(Self::Engine),
            other => Err(Self::Unknown(other)),
        }
    }

    /// Message reported to scripts.
    #[must_use]
    pub const fn script_message(&self) -> &'static str {
        match self {
            Self::Engine => "TTS engine error",
            Self::Unknown(_) => "Unknown TTS error",
        }
    }
}

/// Speech engine used by the `tts/*` endpoints.
///
/// Implementations are shared across connections and must synchronise their
/// own state.
pub trait Speech: Send + Sync {
    /// Speaks `text`.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError`] when the engine rejects the utterance.
    fn speak(&self, text: &str, mode: QueueMode) -> Result<(), SpeechError>;

    /// Selects the speech locale and returns the engine's availability code.
    fn set_language(&self, locale: &str) -> i32;

    /// Sets the speech pitch (1.0 is normal).
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError`] when the engine rejects the value.
    fn set_pitch(&self, pitch: f64) -> Result<(), SpeechError>;

    /// Sets the speech rate (1.0 is normal).
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError`] when the engine rejects the value.
    fn set_speech_rate(&self, rate: f64) -> Result<(), SpeechError>;

    /// Whether the engine is currently speaking.
    fn is_speaking(&self) -> bool;

    /// Stops speaking and clears the queue.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError`] when the engine fails to stop.
    fn stop(&self) -> Result<(), SpeechError>;
}
