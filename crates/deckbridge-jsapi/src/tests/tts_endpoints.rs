//! `tts/*` endpoints.

use rstest::rstest;
use serde_json::{Value, json};

use super::support::{Harness, SpeechCall, failure, harness, success};
use crate::endpoint::{Endpoint, TtsEndpoint};
use crate::speech::{QueueMode, SpeechError};

fn tts(op: TtsEndpoint) -> Endpoint {
    Endpoint::Tts(op)
}

#[rstest]
fn speak_forwards_text_and_queue_mode(harness: Harness) {
    assert_eq!(
        harness.call(tts(TtsEndpoint::Speak), json!({"text": "hola", "queueMode": 1})),
        success(Value::Null)
    );
    assert_eq!(
        harness.speech.calls(),
        [SpeechCall::Speak("hola".to_owned(), QueueMode::Add)]
    );
    assert_eq!(
        harness.call(tts(TtsEndpoint::IsSpeaking), json!({})),
        success(json!(true))
    );
}

#[rstest]
#[case(json!({"queueMode": 0}), "Missing text")]
#[case(json!({"text": "hola"}), "Missing queueMode")]
#[case(json!({"text": "hola", "queueMode": 2}), "Invalid queueMode")]
fn speak_validates_its_input(harness: Harness, #[case] data: Value, #[case] message: &str) {
    assert_eq!(harness.call(tts(TtsEndpoint::Speak), data), failure(4, message));
    assert!(harness.speech.calls().is_empty());
}

#[rstest]
#[case(TtsEndpoint::SetLanguage, "Missing locale")]
#[case(TtsEndpoint::SetPitch, "Missing pitch")]
#[case(TtsEndpoint::SetSpeechRate, "Missing speechRate")]
fn settings_require_a_value(harness: Harness, #[case] op: TtsEndpoint, #[case] message: &str) {
    assert_eq!(harness.call(tts(op), json!({})), failure(4, message));
}

#[rstest]
fn set_language_returns_availability(harness: Harness) {
    assert_eq!(
        harness.call(tts(TtsEndpoint::SetLanguage), json!({"locale": "es-ES"})),
        success(json!(1))
    );
    assert_eq!(
        harness.call(tts(TtsEndpoint::SetLanguage), json!({"locale": "xx"})),
        success(json!(-2))
    );
}

#[rstest]
fn pitch_and_rate_accept_numbers(harness: Harness) {
    harness.call(tts(TtsEndpoint::SetPitch), json!({"pitch": 1.25}));
    harness.call(tts(TtsEndpoint::SetSpeechRate), json!({"speechRate": 2}));
    assert_eq!(
        harness.speech.calls(),
        [SpeechCall::Pitch(1.25), SpeechCall::Rate(2.0)]
    );
}

#[rstest]
#[case(SpeechError::Engine, "TTS engine error")]
#[case(SpeechError::Unknown(-4), "Unknown TTS error")]
fn engine_failures_become_tts_errors(
    harness: Harness,
    #[case] error: SpeechError,
    #[case] message: &str,
) {
    harness.speech.fail_with(error);
    assert_eq!(harness.call(tts(TtsEndpoint::Stop), json!({})), failure(8, message));
}
