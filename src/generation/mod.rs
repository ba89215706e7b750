pub mod api_client;
pub mod parser;
pub mod placeholder;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::GenerationApiConfig,
    error::{CharagenError, Result},
    logger,
    models::{ArtifactRef, GenerationRequest, GenerationResult},
};

pub use api_client::ApiImageGenerator;
pub use parser::{JsonPointerParser, ResponseParser};
pub use placeholder::PlaceholderGenerator;

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<ArtifactRef>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Live,
    Demo,
}

impl GenerationMode {
    pub fn status_message(&self) -> &'static str {
        match self {
            GenerationMode::Live => {
                "All API integrations are ready; images come from the generation API."
            }
            GenerationMode::Demo => {
                "Image generation is in demo mode; placeholder images are shown."
            }
        }
    }
}

/// Lifecycle of a single generate call. Both end states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallState::Idle => "idle",
            CallState::Requesting => "requesting",
            CallState::Succeeded => "succeeded",
            CallState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Front door for generation. Which backend it drives is decided once, from
/// configuration, when the client is built.
#[derive(Clone)]
pub struct GenerationClient {
    generator: Arc<dyn ImageGenerator>,
    mode: GenerationMode,
}

impl GenerationClient {
    pub fn builder(config: GenerationApiConfig) -> GenerationClientBuilder {
        GenerationClientBuilder {
            config,
            parser: None,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            generator: Arc::new(PlaceholderGenerator::new()),
            mode: GenerationMode::Demo,
        }
    }

    pub fn with_generator(generator: Arc<dyn ImageGenerator>, mode: GenerationMode) -> Self {
        Self { generator, mode }
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn backend_name(&self) -> &str {
        self.generator.name()
    }

    /// Runs one request to completion. Errors come back as
    /// `GenerationResult::Failure`; nothing is retried.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let _timer = logger::timer(&format!("{} generation", self.generator.name()));
        log::debug!("Generation call: {} -> {}", CallState::Idle, CallState::Requesting);

        let result = GenerationResult::from(self.generator.generate(request).await);

        match &result {
            GenerationResult::Success { artifacts } => log::info!(
                "Generation call {}: {} artifact(s) for {}",
                CallState::Succeeded,
                artifacts.len(),
                request.collection_name()
            ),
            GenerationResult::Failure { message, .. } => {
                log::error!("Generation call {}: {}", CallState::Failed, message)
            }
        }

        result
    }
}

pub struct GenerationClientBuilder {
    config: GenerationApiConfig,
    parser: Option<Arc<dyn ResponseParser>>,
}

impl GenerationClientBuilder {
    pub fn with_parser<P>(mut self, parser: P) -> Self
    where
        P: ResponseParser + 'static,
    {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn with_shared_parser(mut self, parser: Arc<dyn ResponseParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Missing credentials degrade to the placeholder backend with a warning.
    /// A real credential without an endpoint or parser is a config error.
    pub fn build(self) -> Result<GenerationClient> {
        if !self.config.has_live_credentials() {
            log::warn!(
                "⚠️  NANOBANANA_API_KEY is not configured; falling back to placeholder images"
            );
            return Ok(GenerationClient::placeholder());
        }

        let parser = self.parser.ok_or_else(|| {
            CharagenError::config(
                "a response parser is required when an image generation key is configured",
            )
        })?;

        let generator = ApiImageGenerator::new(&self.config, parser)?;
        log::info!("Image generation API configured at {}", generator.endpoint());

        Ok(GenerationClient {
            generator: Arc::new(generator),
            mode: GenerationMode::Live,
        })
    }
}
