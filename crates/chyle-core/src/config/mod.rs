//! Configuration system for Chyle
//!
//! Stage configuration is read from a [`ConfigSource`], validated through
//! declarative [`StageSpec`]s and bound into a [`ChyleConfig`] once at
//! startup.

pub mod engine;
mod features;
mod loader;
pub mod source;
pub mod stages;
mod types;
pub mod validation;

pub use engine::{process, StageSpec};
pub use features::resolve_features;
pub use loader::*;
pub use source::{ConfigSource, EnvTree, KeyPath};
pub use types::*;
