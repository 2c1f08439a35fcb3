//! Pipeline execution errors

use thiserror::Error;

use chyle_core::error::ConfigError;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised while a changelog is built or delivered
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Stage could not be built from its configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote API answered with a non-success status
    #[error("API error on {url}: {status} - {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    /// Remote payload lacks a declared field
    #[error("field \"{field}\" not found in response from {url}")]
    MissingField { field: String, url: String },

    /// External command failed
    #[error("command \"{command}\" failed: {message}")]
    Command { command: String, message: String },

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] chyle_core::TemplateError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
