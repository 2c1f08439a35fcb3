//! Error types for Chyle

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors, raised while the configuration tree is turned into
/// typed stage configuration. Every variant names the offending variable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Mandatory field absent or empty
    #[error("environment variable missing: \"{0}\"")]
    MissingField(String),

    /// URL lacks the `{{ID}}` placeholder
    #[error("ensure you defined a placeholder {{{{ID}}}} in URL defined in \"{key}\"")]
    MissingPlaceholder { key: String },

    /// Pattern does not compile
    #[error("provide a valid regexp for \"{key}\", \"{message}\"")]
    InvalidRegex { key: String, message: String },

    /// Value is not a boolean literal
    #[error("\"{key}\" must be \"true\" or \"false\", \"{value}\" given")]
    InvalidBool { key: String, value: String },

    /// Value is not a valid URL
    #[error("provide a valid URL for \"{key}\", \"{message}\"")]
    InvalidUrl { key: String, message: String },

    /// Template does not parse
    #[error("provide a valid template for \"{key}\", \"{message}\"")]
    InvalidTemplate { key: String, message: String },

    /// Value fails a domain check
    #[error("invalid value for \"{key}\": {message}")]
    InvalidValue { key: String, message: String },

    /// Environment could not be read into a configuration tree
    #[error("can't read configuration from environment: {0}")]
    Source(String),
}

impl ConfigError {
    /// The variable name this error refers to
    pub fn key(&self) -> &str {
        match self {
            Self::MissingField(key) => key,
            Self::MissingPlaceholder { key }
            | Self::InvalidRegex { key, .. }
            | Self::InvalidBool { key, .. }
            | Self::InvalidUrl { key, .. }
            | Self::InvalidTemplate { key, .. }
            | Self::InvalidValue { key, .. } => key,
            Self::Source(_) => crate::config::source::ROOT,
        }
    }
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Reference could not be resolved to a commit
    #[error("Reference \"{reference}\" can't be resolved: {reason}")]
    ReferenceNotFound { reference: String, reason: String },

    /// Commit time outside the representable range
    #[error("Commit {hash} has an invalid timestamp: {seconds}")]
    InvalidTimestamp { hash: String, seconds: i64 },

    /// No commits in the requested range
    #[error("No commits found between \"{from}\" and \"{to}\"")]
    NoCommits { from: String, to: String },

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_placeholder_message() {
        let err = ConfigError::MissingPlaceholder {
            key: "CHYLE_DECORATORS_CUSTOMAPI_ENDPOINT_URL".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ensure you defined a placeholder {{ID}} in URL defined in \"CHYLE_DECORATORS_CUSTOMAPI_ENDPOINT_URL\""
        );
    }

    #[test]
    fn test_config_error_key() {
        let err = ConfigError::InvalidBool {
            key: "CHYLE_FEATURES_SENDERS_ENABLED".to_string(),
            value: "yes".to_string(),
        };
        assert_eq!(err.key(), "CHYLE_FEATURES_SENDERS_ENABLED");
        assert_eq!(ConfigError::Source("bad".to_string()).key(), "CHYLE");
    }
}
