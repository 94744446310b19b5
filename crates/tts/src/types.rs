use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{NormalizationError, Result};

pub const DEFAULT_FILE_NAME: &str = "data.mpga";
pub const DEFAULT_FILE_EXTENSION: &str = "mpga";
pub const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

/// Raw body of `POST /api/tts`
///
/// Fields are kept untyped so a non-string value gets a precise
/// validation message instead of a generic parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct SpeechForm {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default, rename = "voiceId")]
    pub voice_id: Option<Value>,
}

/// Validated synthesis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsRequest {
    /// Text to synthesize, never empty
    pub text: String,
    /// Voice identifier, never empty
    pub voice_id: String,
}

impl TtsRequest {
    /// Validate a submitted form
    ///
    /// An empty `voiceId` is replaced by `default_voice_id` when one is given.
    pub fn from_form(form: SpeechForm, default_voice_id: Option<&str>) -> Result<Self> {
        let text = require_string(form.text, "text")?;
        if text.trim().is_empty() {
            return Err(NormalizationError::Validation("text must not be empty".to_string()));
        }

        let voice_id = require_string(form.voice_id, "voiceId")?;
        let voice_id = match (voice_id.trim().is_empty(), default_voice_id) {
            (false, _) => voice_id,
            (true, Some(default)) => default.to_string(),
            (true, None) => {
                return Err(NormalizationError::Validation("voiceId must not be empty".to_string()));
            }
        };

        Ok(Self { text, voice_id })
    }
}

fn require_string(value: Option<Value>, field: &str) -> Result<String> {
    match value {
        None | Some(Value::Null) => Err(NormalizationError::Validation(format!("{field} is required"))),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(NormalizationError::Validation(format!("{field} must be a string"))),
    }
}

/// Canonical description of one synthesized audio file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioResult {
    pub file_name: String,
    pub file_extension: String,
    pub mime_type: String,
    /// Decoded size in bytes; `0` when unknown for URL payloads
    pub file_size: usize,
    #[serde(flatten)]
    pub payload: AudioPayload,
}

/// Where the audio bytes live
///
/// Serialized as a single `audioBase64` or `audioUrl` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AudioPayload {
    #[serde(rename = "audioBase64")]
    Base64(String),
    #[serde(rename = "audioUrl")]
    Url(Url),
}

impl AudioResult {
    /// Base64 audio with the default MPEG naming
    pub fn mpeg_base64(encoded: String) -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            file_size: decoded_len(&encoded),
            payload: AudioPayload::Base64(encoded),
        }
    }
}

/// Decoded byte length of a base64 string, `floor(L * 3 / 4) - P`
///
/// `P` is the number of trailing `=` characters. The string is not
/// validated as base64.
pub fn decoded_len(encoded: &str) -> usize {
    let padding = encoded.bytes().rev().take_while(|&b| b == b'=').count();
    (encoded.len() * 3 / 4).saturating_sub(padding)
}

/// Successful reply of `POST /api/tts`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechReply {
    pub success: bool,
    pub file: AudioResult,
    pub text: String,
    pub voice_id: String,
}

/// Body of `POST /api`
#[derive(Debug, Deserialize)]
pub struct EchoForm {
    #[serde(default)]
    pub text: Option<Value>,
}

/// Reply of `POST /api`
#[derive(Debug, Serialize)]
pub struct EchoReply {
    pub success: bool,
    pub message: &'static str,
    pub text: String,
}

impl EchoReply {
    pub fn from_form(form: EchoForm) -> Result<Self> {
        let text = require_string(form.text, "text")?;
        if text.trim().is_empty() {
            return Err(NormalizationError::Validation("text must not be empty".to_string()));
        }

        Ok(Self {
            success: true,
            message: "Text received",
            text,
        })
    }
}
