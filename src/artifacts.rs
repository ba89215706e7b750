use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{CharagenError, Result},
    models::{ArtifactData, ArtifactRef},
};

/// Resolves URL artifacts into bytes before they are written to disk.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `use_system_proxy` mirrors `GenerationApiConfig::use_system_proxy`.
    pub fn new(timeout: Duration, use_system_proxy: bool) -> Result<Self> {
        let mut builder = Client::builder().timeout(timeout);
        if !use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| CharagenError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CharagenError::api(format!(
                "download of {} failed ({})",
                url, status
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Writes every artifact into `dir` under its suggested file name and
/// returns the written paths in artifact order.
pub async fn save_artifacts(
    dir: &Path,
    artifacts: &[ArtifactRef],
    fetcher: &dyn ArtifactFetcher,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let bytes = match &artifact.data {
            ArtifactData::Bytes(bytes) => bytes.clone(),
            ArtifactData::Url(url) => {
                log::debug!("Downloading {}", url);
                fetcher.fetch(url).await?
            }
        };

        let path = dir.join(&artifact.suggested_file_name);
        tokio::fs::write(&path, &bytes).await?;
        log::info!("💾 Saved {} ({} bytes)", path.display(), bytes.len());
        written.push(path);
    }

    Ok(written)
}
