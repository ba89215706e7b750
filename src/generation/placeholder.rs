use async_trait::async_trait;

use crate::{
    error::Result,
    generation::ImageGenerator,
    models::{ArtifactData, ArtifactRef, GenerationRequest},
};

const PLACEHOLDER_URL_PREFIX: &str = "https://placehold.jp/2ecc71/ffffff/350x200.png?text=Demo+%23";

/// Stand-in used when no image-generation key is configured. Never touches
/// the network and always returns the same artifacts for the same request.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderGenerator;

impl PlaceholderGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn placeholder_url(index: usize) -> String {
        format!("{}{}", PLACEHOLDER_URL_PREFIX, index)
    }
}

#[async_trait]
impl ImageGenerator for PlaceholderGenerator {
    fn name(&self) -> &str {
        "placeholder"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<ArtifactRef>> {
        let count = request.image_count() as usize;
        log::debug!("Producing {} placeholder artifacts", count);

        Ok((1..=count)
            .map(|i| {
                ArtifactRef::new(
                    request.collection_name(),
                    i,
                    ArtifactData::Url(Self::placeholder_url(i)),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_count_and_names() {
        let generator = PlaceholderGenerator::new();
        for count in 1..=30 {
            let request = GenerationRequest::new("a knight", count, "16:9", "Knights").unwrap();
            let artifacts = generator.generate(&request).await.unwrap();
            assert_eq!(artifacts.len(), count as usize);
            for (i, artifact) in artifacts.iter().enumerate() {
                assert_eq!(artifact.index, i + 1);
                assert_eq!(
                    artifact.suggested_file_name,
                    format!("Knights_result_{}.png", i + 1)
                );
            }
        }
    }

    #[tokio::test]
    async fn test_placeholder_is_idempotent() {
        let generator = PlaceholderGenerator::new();
        let request = GenerationRequest::new("a knight", 3, "1:1", "Knights").unwrap();
        let first = generator.generate(&request).await.unwrap();
        let second = generator.generate(&request).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first[2].url(),
            Some("https://placehold.jp/2ecc71/ffffff/350x200.png?text=Demo+%233")
        );
    }
}
