//! Feature flag resolution
//!
//! A flag takes the explicit boolean set under `CHYLE_FEATURES_…` when there
//! is one, otherwise it is on iff the configuration subtree it guards exists.

use tracing::debug;

use crate::error::ConfigError;

use super::source::{ConfigSource, KeyPath};
use super::types::{DecoratorFeatures, ExtractorFeatures, Features, MatcherFeatures, SenderFeatures};
use super::validation::parse_optional_bool;

/// Resolve one flag
fn flag(source: &dyn ConfigSource, flag: &[&str], guarded: &[&str]) -> Result<bool, ConfigError> {
    let key = KeyPath::new(std::iter::once("FEATURES").chain(flag.iter().copied()));
    match parse_optional_bool(source, &key)? {
        Some(explicit) => Ok(explicit),
        None => Ok(source.exists(&KeyPath::new(guarded.iter().copied()))),
    }
}

/// Resolve every feature flag from the source
pub fn resolve_features(source: &dyn ConfigSource) -> Result<Features, ConfigError> {
    let features = Features {
        matchers: MatcherFeatures {
            enabled: flag(source, &["MATCHERS", "ENABLED"], &["MATCHERS"])?,
            commit_type: flag(source, &["MATCHERS", "TYPE"], &["MATCHERS", "TYPE"])?,
            message: flag(source, &["MATCHERS", "MESSAGE"], &["MATCHERS", "MESSAGE"])?,
            committer: flag(source, &["MATCHERS", "COMMITTER"], &["MATCHERS", "COMMITTER"])?,
            author: flag(source, &["MATCHERS", "AUTHOR"], &["MATCHERS", "AUTHOR"])?,
        },
        extractors: ExtractorFeatures {
            enabled: flag(source, &["EXTRACTORS", "ENABLED"], &["EXTRACTORS"])?,
        },
        decorators: DecoratorFeatures {
            enabled: flag(source, &["DECORATORS", "ENABLED"], &["DECORATORS"])?,
            custom_api: flag(source, &["DECORATORS", "CUSTOMAPI"], &["DECORATORS", "CUSTOMAPI"])?,
            jira_issue: flag(source, &["DECORATORS", "JIRAISSUE"], &["DECORATORS", "JIRAISSUE"])?,
            github_issue: flag(
                source,
                &["DECORATORS", "GITHUBISSUE"],
                &["DECORATORS", "GITHUBISSUE"],
            )?,
            shell: flag(source, &["DECORATORS", "SHELL"], &["DECORATORS", "SHELL"])?,
            env: flag(source, &["DECORATORS", "ENV"], &["DECORATORS", "ENV"])?,
        },
        senders: SenderFeatures {
            enabled: flag(source, &["SENDERS", "ENABLED"], &["SENDERS"])?,
            stdout: flag(source, &["SENDERS", "STDOUT"], &["SENDERS", "STDOUT"])?,
            github_release: flag(
                source,
                &["SENDERS", "GITHUBRELEASE"],
                &["SENDERS", "GITHUBRELEASE"],
            )?,
            custom_api: flag(source, &["SENDERS", "CUSTOMAPI"], &["SENDERS", "CUSTOMAPI"])?,
        },
    };

    debug!(?features, "feature flags resolved");
    Ok(features)
}
