use crate::endpoint::TtsEndpoint;
use crate::errors::JsApiError;
use crate::response::Response;
use crate::speech::QueueMode;

use super::Context;

pub(super) fn handle(ctx: &Context<'_>, op: TtsEndpoint) -> Result<Response, JsApiError> {
    let speech = ctx.speech;
    match op {
        TtsEndpoint::Speak => {
            let text = ctx.require_string("text", "Missing text")?;
            let code = ctx.require_long("queueMode", "Missing queueMode")?;
            let mode = QueueMode::from_code(code)
                .ok_or_else(|| JsApiError::invalid_input("Invalid queueMode"))?;
            speech.speak(text, mode)?;
            Ok(Response::empty())
        }
        TtsEndpoint::SetLanguage => {
            let locale = ctx.require_string("locale", "Missing locale")?;
            Response::success(speech.set_language(locale))
        }
        TtsEndpoint::SetPitch => {
            speech.set_pitch(ctx.require_double("pitch", "Missing pitch")?)?;
            Ok(Response::empty())
        }
        TtsEndpoint::SetSpeechRate => {
            speech.set_speech_rate(ctx.require_double("speechRate", "Missing speechRate")?)?;
            Ok(Response::empty())
        }
        TtsEndpoint::IsSpeaking => Response::success(speech.is_speaking()),
        TtsEndpoint::Stop => {
            speech.stop()?;
            Ok(Response::empty())
        }
    }
}
