use crate::models::AspectRatio;

pub const PREAMBLE: &str =
    "High quality, cinematic. A stunning, highly detailed fantasy concept art of a character.";
pub const STYLE_TAGS: &str = "cinematic, volumetric lighting, unreal engine render, 8k.";
pub const NEGATIVE_PROMPT: &str =
    "--negative_prompt low quality, blurry, mutated, duplicated, text, watermark.";

const SUBJECT_LABEL: &str = "Subject: ";
/// Section labels that can follow the subject in a built prompt.
const FOLLOWING_LABELS: [&str; 3] = ["Character ", "Style: ", "Aspect ratio: "];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSlot {
    First,
    Second,
}

impl CharacterSlot {
    pub(crate) fn position(self) -> usize {
        match self {
            CharacterSlot::First => 0,
            CharacterSlot::Second => 1,
        }
    }
}

/// Everything the prompt template needs. Blank fields are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptFields {
    pub scene: String,
    pub poses: [Option<String>; 2],
    pub style_notes: Option<String>,
    pub aspect_ratio: AspectRatio,
    pub negative_prompt: bool,
}

impl PromptFields {
    pub fn new(scene: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self {
            scene: scene.into(),
            poses: [None, None],
            style_notes: None,
            aspect_ratio,
            negative_prompt: true,
        }
    }

    pub fn with_pose(mut self, slot: CharacterSlot, pose: impl Into<String>) -> Self {
        self.poses[slot.position()] = Some(pose.into());
        self
    }

    pub fn with_style_notes(mut self, notes: impl Into<String>) -> Self {
        self.style_notes = Some(notes.into());
        self
    }

    pub fn without_negative_prompt(mut self) -> Self {
        self.negative_prompt = false;
        self
    }
}

fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Assembles the final prompt. Pure: the same fields always give the same
/// string, and section order never changes.
pub fn build_prompt(fields: &PromptFields) -> String {
    let mut sections = vec![PREAMBLE.to_string()];

    if let Some(scene) = present(&fields.scene) {
        sections.push(format!("{}{}", SUBJECT_LABEL, scene));
    }

    for (i, pose) in fields.poses.iter().enumerate() {
        if let Some(pose) = pose.as_deref().and_then(present) {
            sections.push(format!("Character {}: {}", i + 1, pose));
        }
    }

    // One trailing period is dropped since the template supplies its own.
    let notes = fields
        .style_notes
        .as_deref()
        .and_then(present)
        .map(|notes| notes.strip_suffix('.').unwrap_or(notes).trim_end())
        .filter(|notes| !notes.is_empty());
    match notes {
        Some(notes) => sections.push(format!("Style: {}. {}", notes, STYLE_TAGS)),
        None => sections.push(format!("Style: {}", STYLE_TAGS)),
    }

    sections.push(format!("Aspect ratio: {}", fields.aspect_ratio));

    if fields.negative_prompt {
        sections.push(NEGATIVE_PROMPT.to_string());
    }

    sections.join("\n")
}

/// Pulls the subject section back out of a built prompt for short previews.
/// A scene typed over several lines comes back whole.
pub fn prompt_subject(prompt: &str) -> Option<&str> {
    let mut start = None;
    let mut end = prompt.len();
    let mut offset = 0;

    for line in prompt.split_inclusive('\n') {
        match start {
            None if line.starts_with(SUBJECT_LABEL) => {
                start = Some(offset + SUBJECT_LABEL.len());
            }
            Some(_) if FOLLOWING_LABELS.iter().any(|label| line.starts_with(label)) => {
                end = offset;
                break;
            }
            _ => {}
        }
        offset += line.len();
    }

    start.map(|start| prompt[start..end].trim())
}
