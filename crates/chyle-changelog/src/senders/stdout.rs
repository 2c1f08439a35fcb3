//! Standard output sender

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use chyle_core::config::stages::JSON_FORMAT;
use chyle_core::config::StdoutSenderConfig;
use chyle_core::Template;

use super::Sender;
use crate::error::Result;
use crate::types::Changelog;

enum Format {
    Json,
    Template(Template),
}

/// Prints the changelog as JSON or through a template
pub struct StdoutSender {
    format: Format,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl StdoutSender {
    pub fn new(config: &StdoutSenderConfig) -> Result<Self> {
        Self::with_writer(config, Box::new(std::io::stdout()))
    }

    /// Sender printing to `writer` instead of stdout
    pub fn with_writer(config: &StdoutSenderConfig, writer: Box<dyn Write + Send>) -> Result<Self> {
        let format = if config.format == JSON_FORMAT {
            Format::Json
        } else {
            Format::Template(Template::parse(&config.format)?)
        };

        Ok(Self {
            format,
            writer: Mutex::new(writer),
        })
    }

    fn render(&self, changelog: &Changelog) -> Result<String> {
        match &self.format {
            Format::Json => Ok(serde_json::to_string_pretty(changelog)?),
            Format::Template(template) => Ok(template.render(&changelog.to_value())),
        }
    }
}

#[async_trait]
impl Sender for StdoutSender {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn send(&self, changelog: &Changelog) -> Result<()> {
        let output = self.render(changelog)?;
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(writer, "{}", output)?;
        writer.flush()?;
        Ok(())
    }
}
