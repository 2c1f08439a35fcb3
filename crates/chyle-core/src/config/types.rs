//! Configuration types
//!
//! Typed, validated configuration produced by [`build_config`](super::build_config).
//! Credentials are never serialized.

use serde::Serialize;

/// Main configuration for Chyle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChyleConfig {
    /// Git range to read commits from
    pub git: GitConfig,

    /// Resolved feature flags
    pub features: Features,

    /// Commit filters
    pub matchers: MatchersConfig,

    /// Commit field extractors
    pub extractors: Vec<ExtractorConfig>,

    /// Entry and metadata decorators
    pub decorators: DecoratorsConfig,

    /// Changelog senders
    pub senders: SendersConfig,
}

/// Git configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GitConfig {
    /// Repository path
    pub repository_path: String,
    /// Oldest reference, excluded from the range
    pub reference_from: String,
    /// Newest reference, included in the range
    pub reference_to: String,
}

/// Feature flags gating every stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Features {
    pub matchers: MatcherFeatures,
    pub extractors: ExtractorFeatures,
    pub decorators: DecoratorFeatures,
    pub senders: SenderFeatures,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatcherFeatures {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub commit_type: bool,
    pub message: bool,
    pub committer: bool,
    pub author: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractorFeatures {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecoratorFeatures {
    pub enabled: bool,
    pub custom_api: bool,
    pub jira_issue: bool,
    pub github_issue: bool,
    pub shell: bool,
    pub env: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SenderFeatures {
    pub enabled: bool,
    pub stdout: bool,
    pub github_release: bool,
    pub custom_api: bool,
}

/// Matcher patterns, each set only when its matcher is active
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchersConfig {
    /// Pattern matched against `merge` or `regular`
    #[serde(rename = "type")]
    pub commit_type: Option<String>,
    /// Pattern matched against the commit message
    pub message: Option<String>,
    /// Pattern matched against the committer name
    pub committer: Option<String>,
    /// Pattern matched against the author name
    pub author: Option<String>,
}

/// One extractor definition
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractorConfig {
    /// Name of the definition (`CHYLE_EXTRACTORS_<NAME>_…`)
    pub name: String,
    /// Entry key the pattern is applied to
    pub orig_key: String,
    /// Entry key the match is stored under
    pub dest_key: String,
    /// Pattern
    pub reg: String,
}

/// A `{FIELD, DESTKEY}` pair copying a remote field into an entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyMapping {
    /// Dotted path in the remote payload
    pub field: String,
    /// Entry key receiving the value
    pub dest_key: String,
}

/// Decorator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecoratorsConfig {
    pub custom_api: Option<CustomApiDecoratorConfig>,
    pub jira_issue: Option<JiraIssueDecoratorConfig>,
    pub github_issue: Option<GithubIssueDecoratorConfig>,
    pub shell: Vec<ShellDecoratorConfig>,
    pub env: Vec<EnvDecoratorConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomApiDecoratorConfig {
    /// Endpoint URL carrying an `{{ID}}` placeholder
    pub endpoint_url: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub keys: Vec<KeyMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JiraIssueDecoratorConfig {
    /// Jira base URL
    pub endpoint_url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub keys: Vec<KeyMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GithubIssueDecoratorConfig {
    /// API base URL
    pub api_url: String,
    #[serde(skip_serializing)]
    pub oauth_token: String,
    pub owner: String,
    pub repository_name: String,
    pub keys: Vec<KeyMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShellDecoratorConfig {
    pub name: String,
    pub command: String,
    pub orig_key: String,
    pub dest_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvDecoratorConfig {
    pub name: String,
    pub var_name: String,
    pub dest_key: String,
}

/// Sender configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SendersConfig {
    pub stdout: Option<StdoutSenderConfig>,
    pub github_release: Option<GithubReleaseSenderConfig>,
    pub custom_api: Option<CustomApiSenderConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StdoutSenderConfig {
    /// `json`, or a template rendered over the changelog
    pub format: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GithubReleaseSenderConfig {
    /// API base URL
    pub api_url: String,
    #[serde(skip_serializing)]
    pub oauth_token: String,
    pub owner: String,
    pub repository_name: String,
    pub release: ReleaseConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReleaseConfig {
    pub draft: bool,
    pub name: String,
    pub prerelease: bool,
    pub tag_name: String,
    pub target_commitish: String,
    pub template: String,
    /// Look the release up by tag and update it when it exists
    pub update: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomApiSenderConfig {
    pub endpoint_url: String,
    #[serde(skip_serializing)]
    pub token: String,
}

impl ChyleConfig {
    /// Names of every active stage, in pipeline order
    pub fn active_stages(&self) -> Vec<String> {
        let mut stages = Vec::new();

        let matchers = [
            ("matcher:type", &self.matchers.commit_type),
            ("matcher:message", &self.matchers.message),
            ("matcher:committer", &self.matchers.committer),
            ("matcher:author", &self.matchers.author),
        ];
        stages.extend(
            matchers
                .iter()
                .filter(|(_, pattern)| pattern.is_some())
                .map(|(name, _)| name.to_string()),
        );

        stages.extend(self.extractors.iter().map(|e| format!("extractor:{}", e.name)));

        let decorators = &self.decorators;
        if decorators.custom_api.is_some() {
            stages.push("decorator:customapi".to_string());
        }
        if decorators.jira_issue.is_some() {
            stages.push("decorator:jiraissue".to_string());
        }
        if decorators.github_issue.is_some() {
            stages.push("decorator:githubissue".to_string());
        }
        stages.extend(decorators.shell.iter().map(|d| format!("decorator:shell:{}", d.name)));
        stages.extend(decorators.env.iter().map(|d| format!("decorator:env:{}", d.name)));

        let senders = &self.senders;
        if senders.stdout.is_some() {
            stages.push("sender:stdout".to_string());
        }
        if senders.github_release.is_some() {
            stages.push("sender:githubrelease".to_string());
        }
        if senders.custom_api.is_some() {
            stages.push("sender:customapi".to_string());
        }

        stages
    }
}
