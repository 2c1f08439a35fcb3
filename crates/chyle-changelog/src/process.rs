//! Pipeline composition
//!
//! A [`Process`] holds every active stage, built once from the validated
//! configuration, and runs filter, extract, decorate and send in order.

use tracing::{info, instrument};

use chyle_core::ChyleConfig;
use chyle_git::CommitRecord;

use crate::decorators::Decorators;
use crate::error::Result;
use crate::extractors::{self, Extractor};
use crate::matchers::{self, Matcher};
use crate::senders::{self, Sender};
use crate::types::Changelog;

/// The assembled pipeline
pub struct Process {
    matchers: Vec<Box<dyn Matcher>>,
    extractors: Vec<Extractor>,
    decorators: Decorators,
    senders: Vec<Box<dyn Sender>>,
}

impl Process {
    /// Build every active stage from `config`
    pub fn build(config: &ChyleConfig) -> Result<Self> {
        let process = Self {
            matchers: matchers::create(&config.matchers)?,
            extractors: extractors::create(&config.extractors)?,
            decorators: Decorators::create(&config.decorators)?,
            senders: senders::create(&config.senders)?,
        };

        info!(
            matchers = process.matchers.len(),
            extractors = process.extractors.len(),
            decorators = ?process.decorators.names(),
            senders = process.senders.len(),
            "pipeline built"
        );
        Ok(process)
    }

    /// Assemble a pipeline from already built stages
    pub fn from_stages(
        matchers: Vec<Box<dyn Matcher>>,
        extractors: Vec<Extractor>,
        decorators: Decorators,
        senders: Vec<Box<dyn Sender>>,
    ) -> Self {
        Self {
            matchers,
            extractors,
            decorators,
            senders,
        }
    }

    /// Build the changelog without sending it
    pub async fn build_changelog(&self, commits: &[CommitRecord]) -> Result<Changelog> {
        let kept = matchers::filter(&self.matchers, commits);
        let entries = extractors::extract(&self.extractors, &kept);
        self.decorators.decorate(Changelog::new(entries)).await
    }

    /// Run the whole pipeline and return the changelog that was sent
    #[instrument(skip_all, fields(commits = commits.len()))]
    pub async fn proceed(&self, commits: &[CommitRecord]) -> Result<Changelog> {
        let changelog = self.build_changelog(commits).await?;
        senders::send(&self.senders, &changelog).await?;

        info!(
            entries = changelog.entries.len(),
            senders = self.senders.len(),
            "changelog processed"
        );
        Ok(changelog)
    }
}
