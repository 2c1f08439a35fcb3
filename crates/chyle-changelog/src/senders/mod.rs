//! Changelog senders
//!
//! Senders run one at a time in their fixed precedence. The first failure
//! stops the run; output already delivered is left as is.

pub mod custom_api;
pub mod github_release;
pub mod stdout;

use async_trait::async_trait;
use tracing::{debug, instrument};

use chyle_core::config::SendersConfig;

use crate::error::Result;
use crate::types::Changelog;

pub use custom_api::CustomApiSender;
pub use github_release::GithubReleaseSender;
pub use stdout::StdoutSender;

/// Delivery step for a completed changelog
#[async_trait]
pub trait Sender: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Deliver the changelog
    async fn send(&self, changelog: &Changelog) -> Result<()>;
}

/// Build the active senders: stdout, GitHub release, then custom API
pub fn create(config: &SendersConfig) -> Result<Vec<Box<dyn Sender>>> {
    let mut senders: Vec<Box<dyn Sender>> = Vec::new();

    if let Some(stdout) = &config.stdout {
        senders.push(Box::new(StdoutSender::new(stdout)?));
    }
    if let Some(github_release) = &config.github_release {
        senders.push(Box::new(GithubReleaseSender::new(github_release)?));
    }
    if let Some(custom_api) = &config.custom_api {
        senders.push(Box::new(CustomApiSender::new(custom_api)?));
    }

    Ok(senders)
}

/// Run every sender in order
#[instrument(skip_all, fields(senders = senders.len()))]
pub async fn send(senders: &[Box<dyn Sender>], changelog: &Changelog) -> Result<()> {
    for sender in senders {
        debug!(sender = sender.name(), "sending changelog");
        sender.send(changelog).await?;
    }
    Ok(())
}
