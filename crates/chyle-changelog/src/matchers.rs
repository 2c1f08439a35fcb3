//! Commit matchers
//!
//! Every active matcher must accept a commit for it to be kept. With no
//! matcher configured, all commits pass.

use regex::Regex;
use tracing::debug;

use chyle_core::config::MatchersConfig;
use chyle_core::error::ConfigError;
use chyle_git::CommitRecord;

use crate::error::Result;

/// Predicate over a commit
pub trait Matcher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether the commit is kept
    fn is_match(&self, commit: &CommitRecord) -> bool;
}

/// Which commit attribute a [`RegexMatcher`] looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTarget {
    /// `merge` or `regular`
    Type,
    Message,
    Committer,
    Author,
}

/// Matcher applying a pattern to one commit attribute
#[derive(Debug)]
pub struct RegexMatcher {
    target: MatchTarget,
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(target: MatchTarget, regex: Regex) -> Self {
        Self { target, regex }
    }
}

impl Matcher for RegexMatcher {
    fn name(&self) -> &'static str {
        match self.target {
            MatchTarget::Type => "type",
            MatchTarget::Message => "message",
            MatchTarget::Committer => "committer",
            MatchTarget::Author => "author",
        }
    }

    fn is_match(&self, commit: &CommitRecord) -> bool {
        match self.target {
            MatchTarget::Type => self.regex.is_match(commit.commit_type().as_str()),
            MatchTarget::Message => self.regex.is_match(&commit.message),
            MatchTarget::Committer => self.regex.is_match(&commit.committer.name),
            MatchTarget::Author => self.regex.is_match(&commit.author.name),
        }
    }
}

/// Build the active matchers
pub fn create(config: &MatchersConfig) -> Result<Vec<Box<dyn Matcher>>> {
    let patterns = [
        (MatchTarget::Type, "CHYLE_MATCHERS_TYPE", &config.commit_type),
        (MatchTarget::Message, "CHYLE_MATCHERS_MESSAGE", &config.message),
        (MatchTarget::Committer, "CHYLE_MATCHERS_COMMITTER", &config.committer),
        (MatchTarget::Author, "CHYLE_MATCHERS_AUTHOR", &config.author),
    ];

    let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();
    for (target, key, pattern) in patterns {
        let Some(pattern) = pattern else { continue };
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidRegex {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        matchers.push(Box::new(RegexMatcher::new(target, regex)));
    }

    Ok(matchers)
}

/// Keep the commits accepted by every matcher, preserving order
pub fn filter(matchers: &[Box<dyn Matcher>], commits: &[CommitRecord]) -> Vec<CommitRecord> {
    let kept: Vec<CommitRecord> = commits
        .iter()
        .filter(|commit| matchers.iter().all(|m| m.is_match(commit)))
        .cloned()
        .collect();

    debug!(
        matchers = matchers.len(),
        total = commits.len(),
        kept = kept.len(),
        "commits filtered"
    );
    kept
}
