//! Chyle Core - Configuration engine for changelog generation
//!
//! This crate provides the error taxonomy, the hierarchical configuration
//! source, the declarative stage configuration engine and the changelog
//! template language shared by the Chyle crates.

pub mod config;
pub mod error;
pub mod template;

pub use config::{build_config, ChyleConfig, ConfigSource, EnvTree, KeyPath};
pub use error::{ConfigError, GitError};
pub use template::{Template, TemplateError};
