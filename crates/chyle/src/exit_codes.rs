//! Exit codes for the CLI

use chyle_changelog::PipelineError;
use chyle_core::{ConfigError, GitError};

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Pipeline execution error
pub const PIPELINE_ERROR: i32 = 4;

/// Exit code matching the root cause of `err`
pub fn for_error(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some() {
        return CONFIG_ERROR;
    }
    if err.downcast_ref::<GitError>().is_some() {
        return GIT_ERROR;
    }
    if let Some(err) = err.downcast_ref::<PipelineError>() {
        return match err {
            PipelineError::Config(_) | PipelineError::Template(_) => CONFIG_ERROR,
            _ => PIPELINE_ERROR,
        };
    }
    ERROR
}
