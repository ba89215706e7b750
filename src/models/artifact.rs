use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ArtifactData {
    Url(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub index: usize,
    pub data: ArtifactData,
    pub suggested_file_name: String,
}

impl ArtifactRef {
    /// `index` is 1-based.
    pub fn new(collection_name: &str, index: usize, data: ArtifactData) -> Self {
        Self {
            index,
            data,
            suggested_file_name: Self::file_name_for(collection_name, index),
        }
    }

    pub fn file_name_for(collection_name: &str, index: usize) -> String {
        format!("{}_result_{}.png", collection_name, index)
    }

    pub fn url(&self) -> Option<&str> {
        match &self.data {
            ArtifactData::Url(url) => Some(url),
            ArtifactData::Bytes(_) => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.data {
            ArtifactData::Bytes(bytes) => Some(bytes),
            ArtifactData::Url(_) => None,
        }
    }
}

/// Outcome of one generate call, ready to be rendered by the form layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerationResult {
    Success {
        artifacts: Vec<ArtifactRef>,
    },
    Failure {
        error_kind: ErrorKind,
        message: String,
    },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    pub fn artifacts(&self) -> &[ArtifactRef] {
        match self {
            GenerationResult::Success { artifacts } => artifacts,
            GenerationResult::Failure { .. } => &[],
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            GenerationResult::Failure { error_kind, .. } => Some(*error_kind),
            GenerationResult::Success { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            GenerationResult::Failure { message, .. } => Some(message),
            GenerationResult::Success { .. } => None,
        }
    }
}

impl From<Result<Vec<ArtifactRef>>> for GenerationResult {
    fn from(result: Result<Vec<ArtifactRef>>) -> Self {
        match result {
            Ok(artifacts) => GenerationResult::Success { artifacts },
            Err(err) => GenerationResult::Failure {
                error_kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CharagenError;

    #[test]
    fn test_file_name_uses_collection_and_index() {
        let artifact = ArtifactRef::new("Knights", 3, ArtifactData::Url("https://x".into()));
        assert_eq!(artifact.suggested_file_name, "Knights_result_3.png");
        assert_eq!(artifact.url(), Some("https://x"));
        assert!(artifact.bytes().is_none());
    }

    #[test]
    fn test_failure_from_error_has_no_artifacts() {
        let result: GenerationResult =
            Err::<Vec<ArtifactRef>, _>(CharagenError::api("status 502")).into();
        assert!(!result.is_success());
        assert!(result.artifacts().is_empty());
        assert_eq!(result.error_kind(), Some(ErrorKind::Api));
        assert_eq!(result.message(), Some("API error: status 502"));
    }

    #[test]
    fn test_result_serializes_with_status_tag() {
        let result = GenerationResult::Failure {
            error_kind: ErrorKind::Api,
            message: "timeout".into(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["error_kind"], "api");
    }
}
