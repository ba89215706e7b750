use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;

use crate::{
    error::{CharagenError, Result},
    models::ArtifactData,
};

/// Maps a successful response body to artifacts.
///
/// The provider's response schema is not pinned down, so the client never
/// assumes field names itself; callers inject one of these. Any
/// `Fn(&[u8]) -> Result<Vec<ArtifactData>>` closure qualifies.
pub trait ResponseParser: Send + Sync {
    fn parse(&self, body: &[u8]) -> Result<Vec<ArtifactData>>;
}

impl<F> ResponseParser for F
where
    F: Fn(&[u8]) -> Result<Vec<ArtifactData>> + Send + Sync,
{
    fn parse(&self, body: &[u8]) -> Result<Vec<ArtifactData>> {
        self(body)
    }
}

/// Reads images from a caller-supplied JSON pointer.
///
/// The pointer may select an array or a single value. Each entry is either a
/// string (http(s) URL, `data:image/...;base64,` URL, or bare base64) or an
/// object, in which case `entry_pointer` selects the string inside it.
#[derive(Debug, Clone)]
pub struct JsonPointerParser {
    pointer: String,
    entry_pointer: Option<String>,
}

impl JsonPointerParser {
    pub fn new(pointer: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            entry_pointer: None,
        }
    }

    pub fn with_entry_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.entry_pointer = Some(pointer.into());
        self
    }

    fn entry_text<'a>(&self, entry: &'a Value) -> Result<&'a str> {
        let target = match &self.entry_pointer {
            Some(pointer) => entry.pointer(pointer).ok_or_else(|| {
                CharagenError::ResponseError(format!("image entry has no value at {}", pointer))
            })?,
            None => entry,
        };

        target.as_str().ok_or_else(|| {
            CharagenError::ResponseError(format!("image entry is not a string: {}", target))
        })
    }
}

impl ResponseParser for JsonPointerParser {
    fn parse(&self, body: &[u8]) -> Result<Vec<ArtifactData>> {
        let json: Value = serde_json::from_slice(body)
            .map_err(|e| CharagenError::ResponseError(format!("body is not JSON: {}", e)))?;

        let selected = json.pointer(&self.pointer).ok_or_else(|| {
            CharagenError::ResponseError(format!("response has no value at {}", self.pointer))
        })?;

        let entries: Vec<&Value> = match selected {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        entries
            .into_iter()
            .map(|entry| decode_image_reference(self.entry_text(entry)?))
            .collect()
    }
}

pub fn decode_image_reference(text: &str) -> Result<ArtifactData> {
    let text = text.trim();

    if text.starts_with("https://") || text.starts_with("http://") {
        return Ok(ArtifactData::Url(text.to_string()));
    }

    let encoded = match text.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .ok_or_else(|| {
                CharagenError::ResponseError("data URL is not base64 encoded".into())
            })?,
        None => text,
    };

    STANDARD
        .decode(encoded)
        .map(ArtifactData::Bytes)
        .map_err(|e| CharagenError::ResponseError(format!("invalid base64 image data: {}", e)))
}
