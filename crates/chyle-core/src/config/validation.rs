//! Reusable validators for stage specs

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::ConfigError;
use crate::template::Template;

use super::source::{ConfigSource, KeyPath};

/// Validate that every field below `path` is set
pub fn validate_sub_config_pool(
    source: &dyn ConfigSource,
    path: &KeyPath,
    fields: &[&str],
) -> Result<(), ConfigError> {
    for field in fields {
        let key = path.join(*field);
        if source.find_string_unsecured(&key).is_empty() {
            return Err(ConfigError::MissingField(key.to_string()));
        }
    }
    Ok(())
}

/// Validate that the value at `key` compiles as a regular expression
pub fn validate_regexp(source: &dyn ConfigSource, key: &KeyPath) -> Result<(), ConfigError> {
    let pattern = source.find_string_unsecured(key);
    Regex::new(&pattern).map_err(|e| ConfigError::InvalidRegex {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

/// Validate that the value at `key` is an absolute URL
pub fn validate_url(source: &dyn ConfigSource, key: &KeyPath) -> Result<(), ConfigError> {
    let value = source.find_string_unsecured(key);
    url::Url::parse(&value).map_err(|e| ConfigError::InvalidUrl {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

/// Validate the URL at `key` when it is set
pub fn validate_optional_url(source: &dyn ConfigSource, key: &KeyPath) -> Result<(), ConfigError> {
    if source.find_string_unsecured(key).is_empty() {
        return Ok(());
    }
    validate_url(source, key)
}

/// Validate that the URL at `key` carries an `{{ID}}` placeholder
pub fn validate_id_placeholder(
    source: &dyn ConfigSource,
    key: &KeyPath,
) -> Result<(), ConfigError> {
    let url = source.find_string_unsecured(key);
    if !has_id_placeholder(&url) {
        return Err(ConfigError::MissingPlaceholder {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Whether `value` contains `{{ID}}`, with optional inner whitespace
pub fn has_id_placeholder(value: &str) -> bool {
    ID_PLACEHOLDER.is_match(value)
}

/// Pattern matching the `{{ID}}` placeholder
pub static ID_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*ID\s*\}\}").expect("Invalid regex"));

/// Validate the boolean at `key` when it is set
pub fn validate_optional_bool(
    source: &dyn ConfigSource,
    key: &KeyPath,
) -> Result<(), ConfigError> {
    parse_optional_bool(source, key).map(|_| ())
}

/// Parse the boolean at `key`: `None` when unset, an error unless the value
/// is `true` or `false`
pub fn parse_optional_bool(
    source: &dyn ConfigSource,
    key: &KeyPath,
) -> Result<Option<bool>, ConfigError> {
    match source.find_string(key) {
        None => Ok(None),
        Some(value) => match value.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidBool {
                key: key.to_string(),
                value,
            }),
        },
    }
}

/// Validate that the template at `key` parses, when set
pub fn validate_template(source: &dyn ConfigSource, key: &KeyPath) -> Result<(), ConfigError> {
    let template = source.find_string_unsecured(key);
    if template.is_empty() {
        return Ok(());
    }
    Template::parse(&template).map_err(|e| ConfigError::InvalidTemplate {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

/// Validate an indexed `KEYS` list below `path`
///
/// Entries are read as `KEYS_0_FIELD`/`KEYS_0_DESTKEY`, `KEYS_1_…`, scanning
/// from zero until an index is missing. At least one entry is required and
/// every scanned entry must set both fields.
pub fn validate_keys(source: &dyn ConfigSource, path: &KeyPath) -> Result<(), ConfigError> {
    let keys = path.join("KEYS");
    if !source.exists(&keys.join("0")) {
        return Err(ConfigError::MissingField(keys.join("0").join("FIELD").to_string()));
    }

    let mut index = 0usize;
    loop {
        let entry = keys.join(index.to_string());
        if !source.exists(&entry) {
            break;
        }
        validate_sub_config_pool(source, &entry, &["FIELD", "DESTKEY"])?;
        index += 1;
    }

    debug!(path = %keys, count = index, "key mappings validated");
    Ok(())
}
