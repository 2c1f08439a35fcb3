//! Environment variable metadata decorator

use async_trait::async_trait;
use serde_json::Value;

use chyle_core::config::EnvDecoratorConfig;

use super::Decorator;
use crate::error::Result;
use crate::types::Metadata;

/// Stores an environment variable in the changelog metadata
pub struct EnvDecorator {
    name: String,
    var_name: String,
    dest_key: String,
}

impl EnvDecorator {
    pub fn new(config: &EnvDecoratorConfig) -> Self {
        Self {
            name: format!("env:{}", config.name),
            var_name: config.var_name.clone(),
            dest_key: config.dest_key.clone(),
        }
    }
}

#[async_trait]
impl Decorator for EnvDecorator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decorate(&self, mut metadata: Metadata) -> Result<Metadata> {
        let value = std::env::var(&self.var_name).unwrap_or_default();
        metadata.insert(self.dest_key.clone(), Value::String(value));
        Ok(metadata)
    }
}
