//! Error types for Relay Core

use thiserror::Error;

/// Result type alias using Relay Error
pub type Result<T> = std::result::Result<T, Error>;

/// Relay error types
///
/// Only these unwind out of the agent loop. Failures that happen inside a
/// tool are [`ToolError`]s and become conversation content instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Duplicate tool name: {0}")]
    DuplicateToolName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tool-specific errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Decode failure for a tool's raw JSON input
    pub fn decode(err: serde_json::Error) -> Self {
        Self::InvalidParams(err.to_string())
    }
}
