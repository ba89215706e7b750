use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CharagenError, Result};

pub const MIN_IMAGE_COUNT: u32 = 1;
pub const MAX_IMAGE_COUNT: u32 = 30;
pub const DEFAULT_IMAGE_COUNT: u32 = 4;
pub const DEFAULT_COLLECTION_NAME: &str = "My_New_Character";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:4")]
    StandardPortrait,
    #[serde(rename = "21:9")]
    Cinema,
    #[serde(rename = "5:4")]
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 7] = [
        AspectRatio::Square,
        AspectRatio::Wide,
        AspectRatio::Tall,
        AspectRatio::Standard,
        AspectRatio::StandardPortrait,
        AspectRatio::Cinema,
        AspectRatio::Portrait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
            AspectRatio::Standard => "4:3",
            AspectRatio::StandardPortrait => "3:4",
            AspectRatio::Cinema => "21:9",
            AspectRatio::Portrait => "5:4",
        }
    }

    /// Dropdown label shown next to the ratio.
    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1 (square)",
            AspectRatio::Wide => "16:9 (wide)",
            AspectRatio::Tall => "9:16 (phone portrait)",
            AspectRatio::Standard => "4:3 (standard landscape)",
            AspectRatio::StandardPortrait => "3:4 (standard portrait)",
            AspectRatio::Cinema => "21:9 (cinema wide)",
            AspectRatio::Portrait => "5:4 (portrait)",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = CharagenError;

    fn from_str(value: &str) -> Result<Self> {
        let tag = value.trim();
        AspectRatio::ALL
            .iter()
            .copied()
            .find(|ratio| ratio.as_str() == tag || ratio.label() == tag)
            .ok_or_else(|| {
                CharagenError::validation(format!("unsupported aspect ratio: {:?}", value))
            })
    }
}

/// One generation job, built per button press and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    prompt_text: String,
    image_count: u32,
    aspect_ratio: AspectRatio,
    collection_name: String,
}

impl GenerationRequest {
    /// Validates every field; an invalid aspect-ratio tag is rejected here,
    /// before any client sees the request.
    pub fn new(
        prompt_text: impl Into<String>,
        image_count: u32,
        aspect_ratio: &str,
        collection_name: &str,
    ) -> Result<Self> {
        let aspect_ratio = aspect_ratio.parse::<AspectRatio>()?;
        Self::with_ratio(prompt_text, image_count, aspect_ratio, collection_name)
    }

    pub fn with_ratio(
        prompt_text: impl Into<String>,
        image_count: u32,
        aspect_ratio: AspectRatio,
        collection_name: &str,
    ) -> Result<Self> {
        let prompt_text = prompt_text.into();
        if prompt_text.trim().is_empty() {
            return Err(CharagenError::validation("prompt text is empty"));
        }

        if !(MIN_IMAGE_COUNT..=MAX_IMAGE_COUNT).contains(&image_count) {
            return Err(CharagenError::validation(format!(
                "image count must be between {} and {}, got {}",
                MIN_IMAGE_COUNT, MAX_IMAGE_COUNT, image_count
            )));
        }

        Ok(Self {
            prompt_text,
            image_count,
            aspect_ratio,
            collection_name: normalize_collection_name(collection_name),
        })
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn image_count(&self) -> u32 {
        self.image_count
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }
}

fn normalize_collection_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return DEFAULT_COLLECTION_NAME.to_string();
    }

    trimmed
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
