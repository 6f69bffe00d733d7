//! Error types

use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiResponse;

/// Why an API call did not resolve to a response the flow can use
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status; its body is attached
    #[error("server responded with status {}", .0.status)]
    Status(ApiResponse),

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body did not have the expected shape
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The request body could not be serialized
    #[error("could not encode request body: {0}")]
    Encode(String),
}

impl ApiError {
    /// The structured server response, if one is attached
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            ApiError::Status(response) => Some(response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("failed to access token file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base URL must start with http:// or https://, got `{0}`")]
    InvalidBaseUrl(String),

    #[error("{0} page size must be greater than zero")]
    ZeroPageSize(&'static str),

    #[error("no config directory available; pass --token-file")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid access level `{0}` (expected private, public, role:<id> or an integer)")]
pub struct ParseAccessError(pub String);
