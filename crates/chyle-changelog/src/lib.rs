//! Chyle Changelog - Commit pipeline for changelog generation
//!
//! This crate turns commit records into a changelog through four stages:
//! matchers filter commits, extractors turn them into entries, decorators
//! enrich entries and metadata, and senders deliver the result.

pub mod decorators;
pub mod error;
pub mod extractors;
mod http;
pub mod matchers;
pub mod process;
pub mod senders;
pub mod types;

pub use decorators::{Decorator, Decorators};
pub use error::{PipelineError, Result};
pub use extractors::Extractor;
pub use matchers::Matcher;
pub use process::Process;
pub use senders::Sender;
pub use types::{Changelog, Entry, Metadata};
