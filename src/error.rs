// Error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("invalid argument: {0}")]
    Input(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("management api rejected the request: {status}, response: {body}")]
    RemoteRejection {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("failed to encode request body: {0}")]
    Marshal(serde_json::Error),
    #[error("provisioning failed: {0}")]
    Provision(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
