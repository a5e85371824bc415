//! Error types and result aliases for the travel agent.
//!
//! This module defines the core error type [`TravelAgentError`] and the [`Result`] type
//! alias used throughout the crate. All public APIs that can fail return `Result<T>`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TravelAgentError {
    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    #[error("Prompt error: {0}")]
    PromptError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Dataset error: {0}")]
    DatasetError(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TravelAgentError>;
