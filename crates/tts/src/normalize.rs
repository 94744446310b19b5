//! Webhook response normalization
//!
//! The webhook answers in one of several shapes: raw audio bytes, or JSON
//! carrying base64 audio at varying depths, or a ready-made file envelope.
//! [`normalize`] converges all of them onto [`AudioResult`].
//!
//! JSON shapes are recognized by an ordered list of matchers. Order is the
//! precedence: the first matcher that claims a value decides the result.

use base64::Engine;
use http::StatusCode;
use serde_json::{Map, Value};
use url::Url;

use crate::{
    error::{NormalizationError, Result},
    types::{AudioPayload, AudioResult, DEFAULT_FILE_EXTENSION, DEFAULT_FILE_NAME, DEFAULT_MIME_TYPE, decoded_len},
};

/// Characters of raw JSON kept for diagnostics
const SNIPPET_CHARS: usize = 200;

/// Fully buffered webhook response
#[derive(Debug, Clone)]
pub struct RawWebhookResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Turn a webhook response into the canonical audio description
pub fn normalize(raw: &RawWebhookResponse) -> Result<AudioResult> {
    if !raw.status.is_success() {
        tracing::warn!(
            status = raw.status.as_u16(),
            body = %snippet(&raw.body),
            "webhook rejected synthesis request"
        );

        return Err(NormalizationError::UpstreamRejected {
            status: raw.status.as_u16(),
            status_text: raw.status.canonical_reason().unwrap_or_default().to_string(),
        });
    }

    match raw.content_type.as_deref() {
        Some(content_type) if content_type.starts_with("audio/") => Ok(from_audio_bytes(content_type, &raw.body)),
        _ => from_json(&raw.body),
    }
}

/// Extension for an `audio/*` content type
///
/// Plain substring match, case-sensitive: the webhook sends lowercase MIME
/// strings.
pub fn extension_for(content_type: &str) -> &'static str {
    const TABLE: [(&str, &str); 4] = [("mpeg", "mpga"), ("mp3", "mp3"), ("wav", "wav"), ("ogg", "ogg")];

    TABLE
        .iter()
        .find(|(needle, _)| content_type.contains(needle))
        .map_or(DEFAULT_FILE_EXTENSION, |&(_, extension)| extension)
}

fn from_audio_bytes(content_type: &str, body: &[u8]) -> AudioResult {
    let mime_type = content_type.split(';').next().unwrap_or(content_type).trim();
    let extension = extension_for(mime_type);

    tracing::debug!(mime_type, bytes = body.len(), "webhook returned binary audio");

    AudioResult {
        file_name: format!("data.{extension}"),
        file_extension: extension.to_string(),
        mime_type: mime_type.to_string(),
        file_size: body.len(),
        payload: AudioPayload::Base64(base64::engine::general_purpose::STANDARD.encode(body)),
    }
}

fn from_json(body: &[u8]) -> Result<AudioResult> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| NormalizationError::InvalidUpstreamPayload(format!("body is not valid JSON: {e}")))?;

    for matcher in MATCHERS {
        if let Shape::Matched(result) = matcher.try_match(&value)? {
            tracing::debug!(shape = matcher.name(), "webhook JSON normalized");
            return Ok(result);
        }
    }

    let snippet = snippet(body);
    tracing::error!(%snippet, "webhook JSON matched no known shape");

    Err(NormalizationError::UnrecognizedFormat { snippet })
}

fn snippet(body: &[u8]) -> String {
    String::from_utf8_lossy(body).chars().take(SNIPPET_CHARS).collect()
}

/// Outcome of a single matcher
#[derive(Debug)]
enum Shape {
    Matched(AudioResult),
    Next,
}

/// Recognizer for one webhook JSON shape
///
/// Returns `Shape::Next` when the value is not its shape. An error means the
/// value is its shape but unusable, which stops the search.
trait ShapeMatcher: Sync {
    fn name(&self) -> &'static str;

    fn try_match(&self, value: &Value) -> Result<Shape>;
}

const MATCHERS: &[&dyn ShapeMatcher] = &[&ArrayWrapped, &FileEnvelope, &DataField, &AudioField];

/// `[{ "audio": "<b64>" }]` or `[{ "data": "<b64>" }]`, `audio` first
struct ArrayWrapped;

impl ShapeMatcher for ArrayWrapped {
    fn name(&self) -> &'static str {
        "array"
    }

    fn try_match(&self, value: &Value) -> Result<Shape> {
        let encoded = value
            .as_array()
            .and_then(|items| items.first())
            .and_then(Value::as_object)
            .and_then(|first| string_field(first, "audio").or_else(|| string_field(first, "data")));

        Ok(encoded.map_or(Shape::Next, |encoded| {
            Shape::Matched(AudioResult::mpeg_base64(encoded.to_string()))
        }))
    }
}

/// Object with `audioBase64`, `audioUrl`, or a nested `file` description
struct FileEnvelope;

impl ShapeMatcher for FileEnvelope {
    fn name(&self) -> &'static str {
        "file"
    }

    fn try_match(&self, value: &Value) -> Result<Shape> {
        let Some(object) = value.as_object() else {
            return Ok(Shape::Next);
        };

        // Claimed only by a usable payload or a nested `file` object
        let file = object.get("file").and_then(Value::as_object);
        let has_payload = ["audioBase64", "audioUrl"]
            .iter()
            .any(|key| string_field(object, key).is_some());
        if file.is_none() && !has_payload {
            return Ok(Shape::Next);
        }

        // Fields of `file` win over their top-level counterparts
        let lookup = |key: &str| {
            file.and_then(|f| f.get(key))
                .filter(|v| is_present(v))
                .or_else(|| object.get(key))
        };
        let text = |key: &str| lookup(key).and_then(Value::as_str).filter(|s| !s.is_empty());

        let (payload, file_size) = if let Some(encoded) = text("audioBase64") {
            (AudioPayload::Base64(encoded.to_string()), decoded_len(encoded))
        } else if let Some(url) = text("audioUrl") {
            let url = Url::parse(url)
                .map_err(|e| NormalizationError::InvalidUpstreamPayload(format!("`audioUrl` is not absolute: {e}")))?;
            let size = lookup("fileSize")
                .and_then(Value::as_u64)
                .and_then(|size| usize::try_from(size).ok())
                .unwrap_or(0);
            (AudioPayload::Url(url), size)
        } else {
            return Err(NormalizationError::InvalidUpstreamPayload(
                "file envelope carries neither `audioBase64` nor `audioUrl`".to_string(),
            ));
        };

        Ok(Shape::Matched(AudioResult {
            file_name: text("fileName").unwrap_or(DEFAULT_FILE_NAME).to_string(),
            file_extension: text("fileExtension").unwrap_or(DEFAULT_FILE_EXTENSION).to_string(),
            mime_type: text("mimeType").unwrap_or(DEFAULT_MIME_TYPE).to_string(),
            file_size,
            payload,
        }))
    }
}

/// `{ "data": "<b64>" }`
struct DataField;

impl ShapeMatcher for DataField {
    fn name(&self) -> &'static str {
        "data"
    }

    fn try_match(&self, value: &Value) -> Result<Shape> {
        Ok(object_string(value, "data").map_or(Shape::Next, |encoded| {
            Shape::Matched(AudioResult::mpeg_base64(encoded.to_string()))
        }))
    }
}

/// `{ "audio": "<b64>" }`
struct AudioField;

impl ShapeMatcher for AudioField {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn try_match(&self, value: &Value) -> Result<Shape> {
        Ok(object_string(value, "audio").map_or(Shape::Next, |encoded| {
            Shape::Matched(AudioResult::mpeg_base64(encoded.to_string()))
        }))
    }
}

/// Neither `null` nor an empty string
fn is_present(value: &Value) -> bool {
    !value.is_null() && value.as_str() != Some("")
}

fn object_string<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.as_object().and_then(|object| string_field(object, key))
}

/// Non-empty string field
fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}
