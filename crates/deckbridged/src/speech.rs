//! Speech engine that narrates through `tracing` instead of audio output.
//!
//! The daemon has no audio device of its own. [`TracingSpeech`] accepts every
//! well-formed call, remembers the voice settings, and logs each utterance so
//! operators can see what a template asked to say.

use std::sync::{Mutex, MutexGuard, PoisonError};

use deckbridge_jsapi::speech::{STATUS_ERROR, STATUS_SUCCESS};
use deckbridge_jsapi::{QueueMode, Speech, SpeechError};

const SPEECH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::speech");

/// Locale is supported.
pub const LANG_AVAILABLE: i32 = 0;
/// Locale is not supported.
pub const LANG_NOT_SUPPORTED: i32 = -2;

/// Voice settings last applied by a script.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Selected locale tag, if any.
    pub locale: Option<String>,
    /// Pitch multiplier.
    pub pitch: f64,
    /// Rate multiplier.
    pub rate: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            locale: None,
            pitch: 1.0,
            rate: 1.0,
        }
    }
}

/// [`Speech`] implementation that logs utterances.
#[derive(Debug, Default)]
pub struct TracingSpeech {
    settings: Mutex<VoiceSettings>,
}

impl TracingSpeech {
    /// Builds an engine with neutral settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current voice settings.
    #[must_use]
    pub fn settings(&self) -> VoiceSettings {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, VoiceSettings> {
        // Settings are plain values; a panic mid-update cannot break them.
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Engine status for a pitch or rate multiplier.
fn multiplier_status(value: f64) -> i32 {
    if value.is_finite() && value > 0.0 {
        STATUS_SUCCESS
    } else {
        STATUS_ERROR
    }
}

impl Speech for TracingSpeech {
    fn speak(&self, text: &str, mode: QueueMode) -> Result<(), SpeechError> {
        let settings = self.lock();
        tracing::info!(
            target: SPEECH_TARGET,
            text,
            ?mode,
            locale = settings.locale.as_deref().unwrap_or("default"),
            pitch = settings.pitch,
            rate = settings.rate,
            "speak"
        );
        Ok(())
    }

    fn set_language(&self, locale: &str) -> i32 {
        let tag = locale.trim();
        if tag.is_empty() {
            return LANG_NOT_SUPPORTED;
        }
        self.lock().locale = Some(tag.to_owned());
        tracing::debug!(target: SPEECH_TARGET, locale = tag, "language selected");
        LANG_AVAILABLE
    }

    fn set_pitch(&self, pitch: f64) -> Result<(), SpeechError> {
        SpeechError::check_status(multiplier_status(pitch))?;
        self.lock().pitch = pitch;
        Ok(())
    }

    fn set_speech_rate(&self, rate: f64) -> Result<(), SpeechError> {
        SpeechError::check_status(multiplier_status(rate))?;
        self.lock().rate = rate;
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        false
    }

    fn stop(&self) -> Result<(), SpeechError> {
        tracing::debug!(target: SPEECH_TARGET, "stop");
        Ok(())
    }
}
