//! Stage specifications for every configurable section
//!
//! Each function describes one stage variant; [`engine::process`] turns it
//! into typed configuration.

use crate::error::ConfigError;

use super::engine::{process, StageSpec};
use super::source::{ConfigSource, KeyPath};
use super::types::*;
use super::validation::{
    validate_id_placeholder, validate_keys, validate_optional_bool,
    validate_optional_url, validate_regexp, validate_template, validate_url,
};

/// Default GitHub API base URL
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Stdout format printing the changelog as JSON
pub const JSON_FORMAT: &str = "json";

/// Read an indexed `KEYS` list below `path`, stopping at the first missing
/// index
pub fn read_keys(source: &dyn ConfigSource, path: &KeyPath) -> Vec<KeyMapping> {
    let keys = path.join("KEYS");
    (0usize..)
        .map(|index| keys.join(index.to_string()))
        .take_while(|entry| source.exists(entry))
        .map(|entry| KeyMapping {
            field: source.find_string_unsecured(&entry.join("FIELD")),
            dest_key: source.find_string_unsecured(&entry.join("DESTKEY")),
        })
        .collect()
}

fn optional_string(source: &dyn ConfigSource, key: &KeyPath) -> Option<String> {
    source.find_string(key).filter(|v| !v.is_empty())
}

/// Git range, always required
pub fn git_spec() -> StageSpec<GitConfig> {
    let git = KeyPath::new(["GIT"]);
    StageSpec::<GitConfig>::new("git")
        .with_field(git.join("REPOSITORY").join("PATH"), |c, v| c.repository_path = v)
        .with_field(git.join("REFERENCE").join("FROM"), |c, v| c.reference_from = v)
        .with_field(git.join("REFERENCE").join("TO"), |c, v| c.reference_to = v)
}

/// One matcher: `TYPE`, `MESSAGE`, `COMMITTER` or `AUTHOR`
pub fn matcher_spec(name: &str, section_enabled: bool, enabled: bool) -> StageSpec<String> {
    let key = KeyPath::new(["MATCHERS", name]);
    let pattern = key.clone();
    StageSpec::<String>::new(format!("matcher:{}", name.to_lowercase()))
        .with_features([section_enabled, enabled])
        .with_field(key, |c, v| *c = v)
        .with_validator(move |source| validate_regexp(source, &pattern))
}

/// One dynamically named extractor
pub fn extractor_spec(name: &str, enabled: bool) -> StageSpec<ExtractorConfig> {
    let path = KeyPath::new(["EXTRACTORS", name]);
    let reg = path.join("REG");
    let name = name.to_string();
    StageSpec::<ExtractorConfig>::new(format!("extractor:{}", name))
        .with_features([enabled])
        .with_field(path.join("ORIGKEY"), |c, v| c.orig_key = v)
        .with_field(path.join("DESTKEY"), |c, v| c.dest_key = v)
        .with_field(path.join("REG"), |c, v| c.reg = v)
        .with_validator(move |source| validate_regexp(source, &reg))
        .with_setter(move |_, c| c.name = name.clone())
}

/// Generic custom API decorator
pub fn custom_api_decorator_spec(features: &DecoratorFeatures) -> StageSpec<CustomApiDecoratorConfig> {
    let path = KeyPath::new(["DECORATORS", "CUSTOMAPI"]);
    let url = path.join("ENDPOINT").join("URL");
    let keys = path.clone();
    let setter_path = path.clone();
    StageSpec::<CustomApiDecoratorConfig>::new("decorator:customapi")
        .with_features([features.enabled, features.custom_api])
        .with_field(url.clone(), |c, v| c.endpoint_url = v)
        .with_field(path.join("CREDENTIALS").join("TOKEN"), |c, v| c.token = v)
        .with_validator(move |source| validate_id_placeholder(source, &url))
        .with_validator(move |source| validate_keys(source, &keys))
        .with_setter(move |source, c| c.keys = read_keys(source, &setter_path))
}

/// Jira issue decorator
pub fn jira_issue_decorator_spec(features: &DecoratorFeatures) -> StageSpec<JiraIssueDecoratorConfig> {
    let path = KeyPath::new(["DECORATORS", "JIRAISSUE"]);
    let url = path.join("ENDPOINT").join("URL");
    let credentials = path.join("CREDENTIALS");
    let keys = path.clone();
    let setter_path = path.clone();
    StageSpec::<JiraIssueDecoratorConfig>::new("decorator:jiraissue")
        .with_features([features.enabled, features.jira_issue])
        .with_field(url.clone(), |c, v| c.endpoint_url = v)
        .with_field(credentials.join("USERNAME"), |c, v| c.username = v)
        .with_field(credentials.join("PASSWORD"), |c, v| c.password = v)
        .with_validator(move |source| validate_url(source, &url))
        .with_validator(move |source| validate_keys(source, &keys))
        .with_setter(move |source, c| c.keys = read_keys(source, &setter_path))
}

/// GitHub issue decorator
pub fn github_issue_decorator_spec(
    features: &DecoratorFeatures,
) -> StageSpec<GithubIssueDecoratorConfig> {
    let path = KeyPath::new(["DECORATORS", "GITHUBISSUE"]);
    let credentials = path.join("CREDENTIALS");
    let url = path.join("ENDPOINT").join("URL");
    let setter_url = url.clone();
    let keys = path.clone();
    let setter_path = path.clone();
    StageSpec::<GithubIssueDecoratorConfig>::new("decorator:githubissue")
        .with_features([features.enabled, features.github_issue])
        .with_field(credentials.join("OAUTHTOKEN"), |c, v| c.oauth_token = v)
        .with_field(credentials.join("OWNER"), |c, v| c.owner = v)
        .with_field(path.join("REPOSITORY").join("NAME"), |c, v| c.repository_name = v)
        .with_validator(move |source| validate_optional_url(source, &url))
        .with_validator(move |source| validate_keys(source, &keys))
        .with_setter(move |source, c| c.keys = read_keys(source, &setter_path))
        .with_setter(move |source, c| {
            c.api_url = optional_string(source, &setter_url)
                .unwrap_or_else(|| GITHUB_API_URL.to_string());
        })
}

/// One dynamically named shell decorator
pub fn shell_decorator_spec(
    name: &str,
    features: &DecoratorFeatures,
) -> StageSpec<ShellDecoratorConfig> {
    let path = KeyPath::new(["DECORATORS", "SHELL", name]);
    let name = name.to_string();
    StageSpec::<ShellDecoratorConfig>::new(format!("decorator:shell:{}", name))
        .with_features([features.enabled, features.shell])
        .with_field(path.join("COMMAND"), |c, v| c.command = v)
        .with_field(path.join("ORIGKEY"), |c, v| c.orig_key = v)
        .with_field(path.join("DESTKEY"), |c, v| c.dest_key = v)
        .with_setter(move |_, c| c.name = name.clone())
}

/// One dynamically named environment decorator
pub fn env_decorator_spec(name: &str, features: &DecoratorFeatures) -> StageSpec<EnvDecoratorConfig> {
    let path = KeyPath::new(["DECORATORS", "ENV", name]);
    let name = name.to_string();
    StageSpec::<EnvDecoratorConfig>::new(format!("decorator:env:{}", name))
        .with_features([features.enabled, features.env])
        .with_field(path.join("VARNAME"), |c, v| c.var_name = v)
        .with_field(path.join("DESTKEY"), |c, v| c.dest_key = v)
        .with_setter(move |_, c| c.name = name.clone())
}

/// Stdout sender
pub fn stdout_sender_spec(features: &SenderFeatures) -> StageSpec<StdoutSenderConfig> {
    let format = KeyPath::new(["SENDERS", "STDOUT", "FORMAT"]);
    let template = format.clone();
    StageSpec::<StdoutSenderConfig>::new("sender:stdout")
        .with_features([features.enabled, features.stdout])
        .with_field(format, |c, v| c.format = v)
        .with_validator(move |source| {
            if source.find_string_unsecured(&template) == JSON_FORMAT {
                return Ok(());
            }
            validate_template(source, &template)
        })
}

/// GitHub release sender
pub fn github_release_sender_spec(
    features: &SenderFeatures,
) -> StageSpec<GithubReleaseSenderConfig> {
    let path = KeyPath::new(["SENDERS", "GITHUBRELEASE"]);
    let credentials = path.join("CREDENTIALS");
    let release = path.join("RELEASE");
    let url = path.join("ENDPOINT").join("URL");

    let bools = [release.join("DRAFT"), release.join("PRERELEASE"), release.join("UPDATE")];
    let template = release.join("TEMPLATE");
    let validate_url_key = url.clone();

    StageSpec::<GithubReleaseSenderConfig>::new("sender:githubrelease")
        .with_features([features.enabled, features.github_release])
        .with_field(credentials.join("OAUTHTOKEN"), |c, v| c.oauth_token = v)
        .with_field(credentials.join("OWNER"), |c, v| c.owner = v)
        .with_field(path.join("REPOSITORY").join("NAME"), |c, v| c.repository_name = v)
        .with_field(release.join("DRAFT"), |c, v| c.release.draft = v == "true")
        .with_field(release.join("NAME"), |c, v| c.release.name = v)
        .with_field(release.join("PRERELEASE"), |c, v| c.release.prerelease = v == "true")
        .with_field(release.join("TAGNAME"), |c, v| c.release.tag_name = v)
        .with_field(release.join("TARGETCOMMITISH"), |c, v| c.release.target_commitish = v)
        .with_field(release.join("TEMPLATE"), |c, v| c.release.template = v)
        .with_field(release.join("UPDATE"), |c, v| c.release.update = v == "true")
        .with_validator(move |source| {
            bools.iter().try_for_each(|key| validate_optional_bool(source, key))
        })
        .with_validator(move |source| validate_template(source, &template))
        .with_validator(move |source| validate_optional_url(source, &validate_url_key))
        .with_setter(move |source, c| {
            c.api_url = optional_string(source, &url).unwrap_or_else(|| GITHUB_API_URL.to_string());
        })
}

/// Generic custom API sender
pub fn custom_api_sender_spec(features: &SenderFeatures) -> StageSpec<CustomApiSenderConfig> {
    let path = KeyPath::new(["SENDERS", "CUSTOMAPI"]);
    let url = path.join("ENDPOINT").join("URL");
    let validate_url_key = url.clone();
    StageSpec::<CustomApiSenderConfig>::new("sender:customapi")
        .with_features([features.enabled, features.custom_api])
        .with_field(path.join("CREDENTIALS").join("TOKEN"), |c, v| c.token = v)
        .with_field(url, |c, v| c.endpoint_url = v)
        .with_validator(move |source| validate_url(source, &validate_url_key))
}

/// Configure the extractors declared under `CHYLE_EXTRACTORS`
pub fn configure_extractors(
    source: &dyn ConfigSource,
    features: &ExtractorFeatures,
) -> Result<Vec<ExtractorConfig>, ConfigError> {
    let mut extractors = Vec::new();
    for name in source.find_children_keys(&KeyPath::new(["EXTRACTORS"])) {
        if let Some(extractor) = process(&extractor_spec(&name, features.enabled), source)? {
            extractors.push(extractor);
        }
    }
    Ok(extractors)
}

/// Configure the four matchers
pub fn configure_matchers(
    source: &dyn ConfigSource,
    features: &MatcherFeatures,
) -> Result<MatchersConfig, ConfigError> {
    let matcher = |name: &str, enabled: bool| process(&matcher_spec(name, features.enabled, enabled), source);
    Ok(MatchersConfig {
        commit_type: matcher("TYPE", features.commit_type)?,
        message: matcher("MESSAGE", features.message)?,
        committer: matcher("COMMITTER", features.committer)?,
        author: matcher("AUTHOR", features.author)?,
    })
}

/// Configure every decorator variant
pub fn configure_decorators(
    source: &dyn ConfigSource,
    features: &DecoratorFeatures,
) -> Result<DecoratorsConfig, ConfigError> {
    let mut decorators = DecoratorsConfig {
        custom_api: process(&custom_api_decorator_spec(features), source)?,
        jira_issue: process(&jira_issue_decorator_spec(features), source)?,
        github_issue: process(&github_issue_decorator_spec(features), source)?,
        ..DecoratorsConfig::default()
    };

    for name in source.find_children_keys(&KeyPath::new(["DECORATORS", "SHELL"])) {
        if let Some(shell) = process(&shell_decorator_spec(&name, features), source)? {
            decorators.shell.push(shell);
        }
    }

    for name in source.find_children_keys(&KeyPath::new(["DECORATORS", "ENV"])) {
        if let Some(env) = process(&env_decorator_spec(&name, features), source)? {
            decorators.env.push(env);
        }
    }

    Ok(decorators)
}

/// Configure every sender variant
pub fn configure_senders(
    source: &dyn ConfigSource,
    features: &SenderFeatures,
) -> Result<SendersConfig, ConfigError> {
    Ok(SendersConfig {
        stdout: process(&stdout_sender_spec(features), source)?,
        github_release: process(&github_release_sender_spec(features), source)?,
        custom_api: process(&custom_api_sender_spec(features), source)?,
    })
}
