pub mod artifacts;
pub mod config;
pub mod error;
pub mod generation;
pub mod logger;
pub mod models;
pub mod prompt;

#[cfg(test)]
mod test_support;

pub use artifacts::{save_artifacts, ArtifactFetcher, HttpFetcher};
pub use config::{Config, GenerationApiConfig, PromptRefinementConfig};
pub use error::{CharagenError, ErrorKind, Result};
pub use generation::{
    ApiImageGenerator, GenerationClient, GenerationMode, ImageGenerator, JsonPointerParser,
    PlaceholderGenerator, ResponseParser,
};
pub use models::*;
pub use prompt::{build_prompt, prompt_subject, CharacterSlot, PromptFields};
