use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CharagenError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse category reported back to the form layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Config,
    Api,
}

impl CharagenError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CharagenError::ValidationError(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        CharagenError::ConfigError(msg.into())
    }

    pub fn api(msg: impl Into<String>) -> Self {
        CharagenError::ApiError(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CharagenError::ValidationError(_) => ErrorKind::Validation,
            CharagenError::ConfigError(_) => ErrorKind::Config,
            CharagenError::ApiError(_)
            | CharagenError::ResponseError(_)
            | CharagenError::SerializationError(_)
            | CharagenError::IoError(_) => ErrorKind::Api,
        }
    }
}

impl From<reqwest::Error> for CharagenError {
    fn from(err: reqwest::Error) -> Self {
        let cause = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        CharagenError::ApiError(cause)
    }
}

pub type Result<T> = std::result::Result<T, CharagenError>;
