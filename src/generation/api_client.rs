use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::GenerationApiConfig,
    error::{CharagenError, Result},
    generation::{parser::ResponseParser, ImageGenerator},
    models::{ArtifactRef, GenerationRequest},
};

const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Serialize)]
struct GenerationPayload<'a> {
    prompt: &'a str,
    n_images: u32,
    aspect_ratio: &'static str,
    model: &'a str,
}

/// Talks to the remote image-generation endpoint: one POST per call, no
/// retries.
pub struct ApiImageGenerator {
    http_client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    parser: Arc<dyn ResponseParser>,
}

impl ApiImageGenerator {
    pub fn new(config: &GenerationApiConfig, parser: Arc<dyn ResponseParser>) -> Result<Self> {
        let api_key = config
            .live_api_key()
            .ok_or_else(|| CharagenError::config("image generation API key is required"))?
            .to_string();

        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| CharagenError::config("image generation endpoint is required"))?;

        // No idle pool: each call's connection is closed once the call ends.
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(0);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http_client = builder
            .build()
            .map_err(|e| CharagenError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint,
            api_key,
            model: config.model.clone(),
            parser,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageGenerator for ApiImageGenerator {
    fn name(&self) -> &str {
        "api"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<ArtifactRef>> {
        let payload = GenerationPayload {
            prompt: request.prompt_text(),
            n_images: request.image_count(),
            aspect_ratio: request.aspect_ratio().as_str(),
            model: &self.model,
        };

        log::info!(
            "Requesting {} image(s) at {} from {}",
            payload.n_images,
            payload.aspect_ratio,
            self.endpoint
        );
        log::debug!("Generation payload: {}", serde_json::to_string(&payload)?);

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(http_error(status, &body));
        }

        let data = self.parser.parse(&body)?;
        if data.is_empty() {
            return Err(CharagenError::ResponseError(
                "response contained no images".into(),
            ));
        }
        if data.len() != payload.n_images as usize {
            log::warn!(
                "Requested {} image(s) but the response carried {}",
                payload.n_images,
                data.len()
            );
        }

        Ok(data
            .into_iter()
            .enumerate()
            .map(|(i, data)| ArtifactRef::new(request.collection_name(), i + 1, data))
            .collect())
    }
}

fn http_error(status: StatusCode, body: &[u8]) -> CharagenError {
    let text = String::from_utf8_lossy(body);
    let detail = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .or_else(|| json.get("error"))
                .or_else(|| json.get("message"))
                .or_else(|| json.get("detail"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| text.chars().take(MAX_ERROR_BODY_CHARS).collect());

    CharagenError::api(format!("request failed ({}): {}", status, detail))
}
