//! Hierarchical configuration source
//!
//! Configuration is read from environment variables prefixed with `CHYLE_`.
//! Variable names are split on `_` into a tree, so
//! `CHYLE_DECORATORS_CUSTOMAPI_ENDPOINT_URL` lives at the path
//! `["CHYLE", "DECORATORS", "CUSTOMAPI", "ENDPOINT", "URL"]`.

use std::fmt;

use config::{Config, Environment, Map, Source, Value};
use tracing::debug;

use crate::error::ConfigError;

/// Root namespace every variable lives under
pub const ROOT: &str = "CHYLE";

const SEPARATOR: &str = "_";

/// A path into the configuration tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Build a path rooted at `CHYLE`
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = vec![ROOT.to_string()];
        path.extend(segments.into_iter().map(Into::into));
        Self(path)
    }

    /// Append a segment, returning a new path
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut path = self.0.clone();
        path.push(segment.into());
        Self(path)
    }

    /// Path segments, root included
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Dotted form, e.g. `CHYLE.SENDERS.STDOUT.FORMAT`
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

/// Renders as the environment variable name
impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("_"))
    }
}

/// Read access to a hierarchical key/value configuration
pub trait ConfigSource: Send + Sync {
    /// Value stored at `path`, if any
    fn find_string(&self, path: &KeyPath) -> Option<String>;

    /// Immediate child key names below `path`
    fn find_children_keys(&self, path: &KeyPath) -> Vec<String>;

    /// Whether `path` holds a value or has children
    fn exists(&self, path: &KeyPath) -> bool;

    /// Value stored at `path`, or an empty string when absent
    fn find_string_unsecured(&self, path: &KeyPath) -> String {
        self.find_string(path).unwrap_or_default()
    }
}

/// Configuration tree built from `CHYLE_*` variables
///
/// Variables are collected by [`config::Environment`], which lowercases
/// names and splits them on `_`. Lookups lowercase the requested path and
/// child keys come back uppercased and sorted, so enumeration of dynamically
/// named entries (extractors, shell and env decorators) is deterministic
/// across runs.
#[derive(Debug, Default, Clone)]
pub struct EnvTree {
    config: Config,
}

impl EnvTree {
    /// Build a tree from the current process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(Self::environment())
    }

    /// Build a tree from arbitrary name/value pairs, ignoring names outside
    /// the `CHYLE` namespace
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let variables: Map<String, String> = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self::build(Self::environment().source(Some(variables)))
    }

    fn environment() -> Environment {
        Environment::with_prefix(ROOT).separator(SEPARATOR)
    }

    fn build(environment: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(environment)
            .build()
            .map_err(|e| ConfigError::Source(e.to_string()))?;

        debug!(
            sections = config.collect().map(|t| t.len()).unwrap_or_default(),
            "configuration tree built"
        );
        Ok(Self { config })
    }

    /// Lowercased dotted key below the root, `None` for the root itself
    fn key(path: &KeyPath) -> Option<String> {
        let segments = path.segments().get(1..).unwrap_or_default();
        if segments.is_empty() {
            return None;
        }
        Some(segments.join(".").to_lowercase())
    }

    fn table(&self, path: &KeyPath) -> Option<Map<String, Value>> {
        if path.segments().first().map(String::as_str) != Some(ROOT) {
            return None;
        }
        match Self::key(path) {
            Some(key) => self.config.get_table(&key).ok(),
            None => self.config.collect().ok(),
        }
    }
}

impl ConfigSource for EnvTree {
    fn find_string(&self, path: &KeyPath) -> Option<String> {
        if path.segments().first().map(String::as_str) != Some(ROOT) {
            return None;
        }
        self.config.get_string(&Self::key(path)?).ok()
    }

    fn find_children_keys(&self, path: &KeyPath) -> Vec<String> {
        let mut keys: Vec<String> = self
            .table(path)
            .map(|table| table.into_keys().map(|k| k.to_uppercase()).collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn exists(&self, path: &KeyPath) -> bool {
        self.find_string(path).is_some() || self.table(path).is_some()
    }
}
