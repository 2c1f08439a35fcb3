//! Declarative stage configuration
//!
//! A [`StageSpec`] describes one configurable section of the pipeline: the
//! feature flags gating it, the mandatory fields it binds, extra validators,
//! and setters deriving compound fields. [`process`] runs a spec against a
//! [`ConfigSource`] and yields the typed configuration for the stage.

use std::fmt;

use tracing::{debug, instrument};

use crate::error::ConfigError;

use super::source::{ConfigSource, KeyPath};

/// Validation step run against the whole source
pub type Validator = Box<dyn Fn(&dyn ConfigSource) -> Result<(), ConfigError> + Send + Sync>;

/// Derived-field population step run once validation succeeded
pub type Setter<T> = Box<dyn Fn(&dyn ConfigSource, &mut T) + Send + Sync>;

/// Mandatory field: where to read it, and how to store it
pub struct FieldBinding<T> {
    pub key: KeyPath,
    pub bind: fn(&mut T, String),
}

impl<T> FieldBinding<T> {
    pub fn new(key: KeyPath, bind: fn(&mut T, String)) -> Self {
        Self { key, bind }
    }
}

/// Declarative description of one stage variant
pub struct StageSpec<T> {
    name: String,
    features: Vec<bool>,
    mandatory: Vec<FieldBinding<T>>,
    validators: Vec<Validator>,
    setters: Vec<Setter<T>>,
}

impl<T> StageSpec<T> {
    /// Create an empty spec; a spec without feature flags is always active
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: Vec::new(),
            mandatory: Vec::new(),
            validators: Vec::new(),
            setters: Vec::new(),
        }
    }

    /// Stage name, used in logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add feature flags; all of them must be on for the stage to run
    pub fn with_features(mut self, features: impl IntoIterator<Item = bool>) -> Self {
        self.features.extend(features);
        self
    }

    /// Bind a mandatory field
    pub fn with_field(mut self, key: KeyPath, bind: fn(&mut T, String)) -> Self {
        self.mandatory.push(FieldBinding::new(key, bind));
        self
    }

    /// Add a validator, run after mandatory fields are checked
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&dyn ConfigSource) -> Result<(), ConfigError> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    /// Add a setter, run after every validation passed
    pub fn with_setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&dyn ConfigSource, &mut T) + Send + Sync + 'static,
    {
        self.setters.push(Box::new(setter));
        self
    }

    /// Whether every feature flag is on
    pub fn is_active(&self) -> bool {
        self.features.iter().all(|enabled| *enabled)
    }
}

impl<T> fmt::Debug for StageSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSpec")
            .field("name", &self.name)
            .field("features", &self.features)
            .field(
                "mandatory",
                &self.mandatory.iter().map(|b| b.key.to_string()).collect::<Vec<_>>(),
            )
            .field("validators", &self.validators.len())
            .field("setters", &self.setters.len())
            .finish()
    }
}

/// Run a stage spec against a source
///
/// Returns `Ok(None)` when a feature flag is off, the bound configuration
/// when the stage is active and valid, and the first validation error
/// otherwise. Nothing is bound unless every check passed.
#[instrument(skip_all, fields(stage = %spec.name))]
pub fn process<T: Default>(
    spec: &StageSpec<T>,
    source: &dyn ConfigSource,
) -> Result<Option<T>, ConfigError> {
    if !spec.is_active() {
        debug!("stage disabled, skipping");
        return Ok(None);
    }

    let mut values = Vec::with_capacity(spec.mandatory.len());
    for binding in &spec.mandatory {
        let value = source.find_string_unsecured(&binding.key);
        if value.is_empty() {
            return Err(ConfigError::MissingField(binding.key.to_string()));
        }
        values.push(value);
    }

    for validator in &spec.validators {
        validator(source)?;
    }

    let mut target = T::default();
    for (binding, value) in spec.mandatory.iter().zip(values) {
        (binding.bind)(&mut target, value);
    }

    for setter in &spec.setters {
        setter(source, &mut target);
    }

    debug!(fields = spec.mandatory.len(), "stage configured");
    Ok(Some(target))
}
