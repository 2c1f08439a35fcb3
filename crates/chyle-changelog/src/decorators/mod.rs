//! Entry and metadata decorators
//!
//! Per-entry decorators run over every entry in turn, the output of one
//! being the input of the next. Metadata decorators are then threaded over
//! the changelog metadata the same way. The first failure aborts the
//! whole decoration.

mod api;
pub mod custom_api;
pub mod env;
pub mod github_issue;
pub mod jira_issue;
pub mod shell;

use async_trait::async_trait;
use tracing::{debug, instrument};

use chyle_core::config::DecoratorsConfig;

use crate::error::Result;
use crate::types::{Changelog, Entry};

pub use custom_api::CustomApiDecorator;
pub use env::EnvDecorator;
pub use github_issue::GithubIssueDecorator;
pub use jira_issue::JiraIssueDecorator;
pub use shell::ShellDecorator;

/// Enrichment step over an entry or the metadata
#[async_trait]
pub trait Decorator: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Return the updated record
    async fn decorate(&self, entry: Entry) -> Result<Entry>;
}

/// Active decorators, in execution order
#[derive(Default)]
pub struct Decorators {
    /// Run once per entry
    pub entries: Vec<Box<dyn Decorator>>,
    /// Run once over the metadata
    pub metadata: Vec<Box<dyn Decorator>>,
}

impl Decorators {
    /// Build the active decorators in their fixed precedence: custom API,
    /// Jira, GitHub issue, shell commands, then environment variables
    pub fn create(config: &DecoratorsConfig) -> Result<Self> {
        let mut decorators = Self::default();

        if let Some(custom_api) = &config.custom_api {
            decorators
                .entries
                .push(Box::new(CustomApiDecorator::new(custom_api)?));
        }
        if let Some(jira_issue) = &config.jira_issue {
            decorators
                .entries
                .push(Box::new(JiraIssueDecorator::new(jira_issue)?));
        }
        if let Some(github_issue) = &config.github_issue {
            decorators
                .entries
                .push(Box::new(GithubIssueDecorator::new(github_issue)?));
        }
        for shell in &config.shell {
            decorators.entries.push(Box::new(ShellDecorator::new(shell)));
        }
        for env in &config.env {
            decorators.metadata.push(Box::new(EnvDecorator::new(env)));
        }

        Ok(decorators)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.metadata.is_empty()
    }

    /// Names of the active decorators, entry decorators first
    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .chain(self.metadata.iter())
            .map(|d| d.name())
            .collect()
    }

    /// Decorate every entry, then the metadata
    #[instrument(skip_all, fields(entries = changelog.entries.len()))]
    pub async fn decorate(&self, changelog: Changelog) -> Result<Changelog> {
        let mut entries = Vec::with_capacity(changelog.entries.len());
        for entry in changelog.entries {
            entries.push(chain(&self.entries, entry).await?);
        }

        let metadata = chain(&self.metadata, changelog.metadata).await?;
        debug!(decorators = ?self.names(), "changelog decorated");

        Ok(Changelog { entries, metadata })
    }
}

async fn chain(decorators: &[Box<dyn Decorator>], mut entry: Entry) -> Result<Entry> {
    for decorator in decorators {
        entry = decorator.decorate(entry).await?;
    }
    Ok(entry)
}
