//! Configuration loading

use tracing::{info, instrument};

use crate::error::ConfigError;

use super::engine::process;
use super::features::resolve_features;
use super::source::{ConfigSource, EnvTree};
use super::stages::{
    configure_decorators, configure_extractors, configure_matchers, configure_senders, git_spec,
};
use super::types::ChyleConfig;

/// Build the whole typed configuration from a source
///
/// Stages are validated in pipeline order and the first error aborts the
/// build.
#[instrument(skip_all)]
pub fn build_config(source: &dyn ConfigSource) -> Result<ChyleConfig, ConfigError> {
    let features = resolve_features(source)?;

    let git = process(&git_spec(), source)?.unwrap_or_default();
    let matchers = configure_matchers(source, &features.matchers)?;
    let extractors = configure_extractors(source, &features.extractors)?;
    let decorators = configure_decorators(source, &features.decorators)?;
    let senders = configure_senders(source, &features.senders)?;

    let config = ChyleConfig {
        git,
        features,
        matchers,
        extractors,
        decorators,
        senders,
    };

    info!(stages = ?config.active_stages(), "configuration built");
    Ok(config)
}

/// Build the configuration from the process environment
pub fn load_config_from_env() -> Result<ChyleConfig, ConfigError> {
    build_config(&EnvTree::from_env()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::KeyMapping;

    fn git_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("CHYLE_GIT_REPOSITORY_PATH", "/home/project"),
            ("CHYLE_GIT_REFERENCE_FROM", "HEAD~2"),
            ("CHYLE_GIT_REFERENCE_TO", "HEAD"),
        ]
    }

    #[test]
    fn test_git_section_is_mandatory() {
        let err = build_config(&EnvTree::default()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingField("CHYLE_GIT_REPOSITORY_PATH".to_string())
        );
    }

    #[test]
    fn test_minimal_config() {
        let config = build_config(&EnvTree::from_pairs(git_pairs()).unwrap()).unwrap();
        assert_eq!(config.git.reference_from, "HEAD~2");
        assert!(config.active_stages().is_empty());
    }

    #[test]
    fn test_full_pipeline_config() {
        let mut pairs = git_pairs();
        pairs.extend([
            ("CHYLE_MATCHERS_TYPE", "regular"),
            ("CHYLE_EXTRACTORS_CUSTOMAPIID_ORIGKEY", "message"),
            ("CHYLE_EXTRACTORS_CUSTOMAPIID_DESTKEY", "customApiId"),
            ("CHYLE_EXTRACTORS_CUSTOMAPIID_REG", r"#(\d+)"),
            ("CHYLE_DECORATORS_CUSTOMAPI_ENDPOINT_URL", "http://test.com/{{ID}}"),
            ("CHYLE_DECORATORS_CUSTOMAPI_CREDENTIALS_TOKEN", "token"),
            ("CHYLE_DECORATORS_CUSTOMAPI_KEYS_0_FIELD", "fields.id"),
            ("CHYLE_DECORATORS_CUSTOMAPI_KEYS_0_DESTKEY", "objectId"),
            ("CHYLE_SENDERS_STDOUT_FORMAT", "json"),
        ]);
        let config = build_config(&EnvTree::from_pairs(pairs).unwrap()).unwrap();

        assert_eq!(
            config.active_stages(),
            vec![
                "matcher:type",
                "extractor:CUSTOMAPIID",
                "decorator:customapi",
                "sender:stdout"
            ]
        );
        assert_eq!(
            config.decorators.custom_api.unwrap().keys,
            vec![KeyMapping {
                field: "fields.id".to_string(),
                dest_key: "objectId".to_string()
            }]
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut pairs = git_pairs();
        pairs.extend([
            ("CHYLE_EXTRACTORS_A_ORIGKEY", "message"),
            ("CHYLE_EXTRACTORS_A_DESTKEY", "a"),
            ("CHYLE_EXTRACTORS_A_REG", "a+"),
            ("CHYLE_EXTRACTORS_B_ORIGKEY", "message"),
            ("CHYLE_EXTRACTORS_B_DESTKEY", "b"),
            ("CHYLE_EXTRACTORS_B_REG", "b+"),
            ("CHYLE_DECORATORS_ENV_X_VARNAME", "X"),
            ("CHYLE_DECORATORS_ENV_X_DESTKEY", "x"),
        ]);
        let source = EnvTree::from_pairs(pairs).unwrap();
        assert_eq!(build_config(&source).unwrap(), build_config(&source).unwrap());
    }
}
