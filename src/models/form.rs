use std::path::Path;

use crate::{
    error::{CharagenError, Result},
    models::AspectRatio,
    prompt::{CharacterSlot, PromptFields},
};

pub const SUPPORTED_IMAGE_TYPES: [&str; 3] = ["png", "jpg", "jpeg"];
pub const MAX_TURNAROUND_REFERENCES: usize = 3;
pub const MAX_CHARACTER_REFERENCES: usize = 2;

const TURNAROUND_SCENE: &str =
    "Character turnaround sheet showing the same character from the front, side and back";
const COSTUME_NOTE: &str = "dressed in the outfit from the attached costume image";
const POSE_IMAGE_NOTE: &str = "follow the attached pose image";

/// An uploaded image as the form layer hands it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ReferenceImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let extension = Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !SUPPORTED_IMAGE_TYPES.contains(&extension.as_str()) {
            return Err(CharagenError::validation(format!(
                "{} is not a supported image type (png, jpg, jpeg)",
                file_name
            )));
        }

        Ok(Self { file_name, bytes })
    }

    pub fn mime_type(&self) -> &'static str {
        if self.file_name.to_ascii_lowercase().ends_with(".png") {
            "image/png"
        } else {
            "image/jpeg"
        }
    }
}

/// Three-view sheet mode: front, side and back of one character.
#[derive(Debug, Clone, Default)]
pub struct TurnaroundForm {
    pub reference_images: Vec<ReferenceImage>,
    pub costume_image: Option<ReferenceImage>,
    pub additional_instructions: String,
    pub aspect_ratio: Option<AspectRatio>,
}

impl TurnaroundForm {
    pub const DEFAULT_ASPECT_RATIO: AspectRatio = AspectRatio::Wide;

    pub fn validate(&self) -> Result<()> {
        let count = self.reference_images.len();
        if count == 0 {
            return Err(CharagenError::validation(
                "at least one reference image is required",
            ));
        }
        if count > MAX_TURNAROUND_REFERENCES {
            return Err(CharagenError::validation(format!(
                "at most {} reference images can be uploaded, got {}",
                MAX_TURNAROUND_REFERENCES, count
            )));
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio.unwrap_or(Self::DEFAULT_ASPECT_RATIO)
    }

    pub fn prompt_fields(&self) -> Result<PromptFields> {
        self.validate()?;

        let scene = if self.costume_image.is_some() {
            format!("{}, {}", TURNAROUND_SCENE, COSTUME_NOTE)
        } else {
            TURNAROUND_SCENE.to_string()
        };

        Ok(PromptFields::new(scene, self.aspect_ratio())
            .with_style_notes(self.additional_instructions.clone()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CharacterInput {
    pub reference_images: Vec<ReferenceImage>,
    pub pose_image: Option<ReferenceImage>,
    pub pose_text: String,
}

impl CharacterInput {
    pub fn with_pose_text(pose_text: impl Into<String>) -> Self {
        Self {
            pose_text: pose_text.into(),
            ..Default::default()
        }
    }

    pub fn has_pose(&self) -> bool {
        self.pose_image.is_some() || !self.pose_text.trim().is_empty()
    }

    fn pose_descriptor(&self) -> Option<String> {
        let text = self.pose_text.trim();
        match (text.is_empty(), self.pose_image.is_some()) {
            (false, true) => Some(format!("{}, {}", text, POSE_IMAGE_NOTE)),
            (false, false) => Some(text.to_string()),
            (true, true) => Some(POSE_IMAGE_NOTE.to_string()),
            (true, false) => None,
        }
    }
}

/// Single illustration mode: one scene with up to two characters.
#[derive(Debug, Clone, Default)]
pub struct IllustrationForm {
    pub scene: String,
    pub aspect_ratio: AspectRatio,
    pub characters: [CharacterInput; 2],
}

impl IllustrationForm {
    pub fn new(scene: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self {
            scene: scene.into(),
            aspect_ratio,
            characters: Default::default(),
        }
    }

    pub fn with_character(mut self, slot: CharacterSlot, character: CharacterInput) -> Self {
        self.characters[slot.position()] = character;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.scene.trim().is_empty() {
            return Err(CharagenError::validation("the overall scene text is required"));
        }

        for (i, character) in self.characters.iter().enumerate() {
            if character.reference_images.len() > MAX_CHARACTER_REFERENCES {
                return Err(CharagenError::validation(format!(
                    "character {} has {} reference images, at most {} are allowed",
                    i + 1,
                    character.reference_images.len(),
                    MAX_CHARACTER_REFERENCES
                )));
            }
        }

        if !self.characters.iter().any(CharacterInput::has_pose) {
            return Err(CharagenError::validation(
                "at least one character needs a pose image or pose text",
            ));
        }

        Ok(())
    }

    pub fn prompt_fields(&self) -> Result<PromptFields> {
        self.validate()?;

        let mut fields = PromptFields::new(self.scene.clone(), self.aspect_ratio);
        let slots = [CharacterSlot::First, CharacterSlot::Second];
        for (slot, character) in slots.into_iter().zip(self.characters.iter()) {
            if let Some(pose) = character.pose_descriptor() {
                fields = fields.with_pose(slot, pose);
            }
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::prompt::build_prompt;

    fn png(name: &str) -> ReferenceImage {
        ReferenceImage::new(name, vec![0x89, b'P', b'N', b'G']).unwrap()
    }

    #[test]
    fn test_reference_image_types() {
        assert!(ReferenceImage::new("face.PNG", vec![]).is_ok());
        assert!(ReferenceImage::new("face.jpeg", vec![]).is_ok());
        let err = ReferenceImage::new("face.gif", vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(png("a.png").mime_type(), "image/png");
    }

    #[test]
    fn test_turnaround_requires_one_to_three_references() {
        let mut form = TurnaroundForm::default();
        assert_eq!(form.validate().unwrap_err().kind(), ErrorKind::Validation);

        form.reference_images = vec![png("a.png"), png("b.png"), png("c.png")];
        assert!(form.validate().is_ok());

        form.reference_images.push(png("d.png"));
        assert!(form.prompt_fields().is_err());
    }

    #[test]
    fn test_turnaround_prompt_fields() {
        let form = TurnaroundForm {
            reference_images: vec![png("face.png")],
            costume_image: Some(png("coat.png")),
            additional_instructions: "sad expression, white studio backdrop".into(),
            aspect_ratio: None,
        };
        let prompt = build_prompt(&form.prompt_fields().unwrap());
        assert!(prompt.contains("front, side and back"));
        assert!(prompt.contains("costume"));
        assert!(prompt.contains("sad expression, white studio backdrop"));
        assert!(prompt.contains("Aspect ratio: 16:9"));
    }

    #[test]
    fn test_illustration_requires_scene_and_pose() {
        let form = IllustrationForm::new("", AspectRatio::Wide)
            .with_character(CharacterSlot::First, CharacterInput::with_pose_text("kneels"));
        assert!(form.validate().is_err());

        let form = IllustrationForm::new("a forest clearing", AspectRatio::Wide);
        let err = form.validate().unwrap_err();
        assert!(err.to_string().contains("pose"));

        let form = form.with_character(
            CharacterSlot::Second,
            CharacterInput {
                pose_image: Some(png("pose.png")),
                ..Default::default()
            },
        );
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_illustration_limits_character_references() {
        let character = CharacterInput {
            reference_images: vec![png("a.png"), png("b.png"), png("c.png")],
            pose_text: "waves".into(),
            ..Default::default()
        };
        let form = IllustrationForm::new("a harbor", AspectRatio::Square)
            .with_character(CharacterSlot::First, character);
        assert_eq!(form.validate().unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_illustration_prompt_omits_empty_second_character() {
        let form = IllustrationForm::new("two knights duel at sunset", AspectRatio::Wide)
            .with_character(CharacterSlot::First, CharacterInput::with_pose_text("holds a sword"))
            .with_character(CharacterSlot::Second, CharacterInput::with_pose_text(""));
        let prompt = build_prompt(&form.prompt_fields().unwrap());
        assert!(prompt.contains("Character 1: holds a sword"));
        assert!(!prompt.contains("Character 2"));
    }

    #[test]
    fn test_pose_image_only_is_described() {
        let form = IllustrationForm::new("a market", AspectRatio::Square).with_character(
            CharacterSlot::Second,
            CharacterInput {
                pose_image: Some(png("pose.png")),
                ..Default::default()
            },
        );
        let prompt = build_prompt(&form.prompt_fields().unwrap());
        assert!(prompt.contains("Character 2: follow the attached pose image"));
    }

    #[test]
    fn test_with_character_fills_the_named_slot() {
        let form = IllustrationForm::new("a harbor", AspectRatio::Square)
            .with_character(CharacterSlot::Second, CharacterInput::with_pose_text("waves"));
        assert!(!form.characters[0].has_pose());
        assert!(form.characters[1].has_pose());
    }
}
