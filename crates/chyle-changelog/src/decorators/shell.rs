//! Shell command decorator

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use chyle_core::config::ShellDecoratorConfig;

use super::Decorator;
use crate::error::{PipelineError, Result};
use crate::types::{value_as_string, Entry};

/// Pipes an entry value through `sh -c COMMAND` and stores the output
pub struct ShellDecorator {
    name: String,
    command: String,
    orig_key: String,
    dest_key: String,
}

impl ShellDecorator {
    pub fn new(config: &ShellDecoratorConfig) -> Self {
        Self {
            name: format!("shell:{}", config.name),
            command: config.command.clone(),
            orig_key: config.orig_key.clone(),
            dest_key: config.dest_key.clone(),
        }
    }

    async fn run(&self, input: &str) -> Result<String> {
        let command_error = |message: String| PipelineError::Command {
            command: self.command.clone(),
            message,
        };

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command_error(format!("failed to spawn: {}", e)))?;

        // Input is fed while output is drained, the pipes would fill up otherwise
        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(input.as_bytes()).await {
                // A command may exit without reading its input
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                written => written,
            }
        };

        let (written, output) = tokio::join!(feed, child.wait_with_output());
        written?;
        let output = output?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(command_error(format!("{}: {}", output.status, stderr)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl Decorator for ShellDecorator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decorate(&self, mut entry: Entry) -> Result<Entry> {
        let Some(input) = entry.get(&self.orig_key).and_then(value_as_string) else {
            return Ok(entry);
        };

        debug!(command = %self.command, "running shell decorator");
        let output = self.run(&input).await?;
        entry.insert(self.dest_key.clone(), Value::String(output));
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn decorator(command: &str) -> ShellDecorator {
        ShellDecorator::new(&ShellDecoratorConfig {
            name: "UPPER".to_string(),
            command: command.to_string(),
            orig_key: "message".to_string(),
            dest_key: "upperMessage".to_string(),
        })
    }

    fn entry(message: &str) -> Entry {
        let mut entry = Entry::new();
        entry.insert("message".to_string(), Value::from(message));
        entry
    }

    #[tokio::test]
    async fn test_output_stored() {
        let entry = decorator("tr a-z A-Z")
            .decorate(entry("fix: typo"))
            .await
            .unwrap();

        assert_eq!(entry["upperMessage"], "FIX: TYPO");
        assert_eq!(entry["message"], "fix: typo");
    }

    #[tokio::test]
    async fn test_missing_orig_key_untouched() {
        let decorated = decorator("tr a-z A-Z")
            .decorate(Entry::new())
            .await
            .unwrap();
        assert!(decorated.is_empty());
    }

    #[tokio::test]
    async fn test_failing_command() {
        let err = decorator("echo boom >&2; exit 3")
            .decorate(entry("x"))
            .await
            .unwrap_err();

        match err {
            PipelineError::Command { message, .. } => assert!(message.contains("boom")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_large_input_through_cat() {
        let message = "x".repeat(1 << 20);
        let decorated = tokio::time::timeout(
            Duration::from_secs(10),
            decorator("cat").decorate(entry(&message)),
        )
        .await
        .expect("cat decorator did not finish on a 1 MiB message")
        .unwrap();

        assert_eq!(decorated["upperMessage"].as_str().map(str::len), Some(message.len()));
    }

    #[tokio::test]
    async fn test_command_ignoring_input() {
        let message = "y".repeat(1 << 20);
        let decorated = decorator("echo done")
            .decorate(entry(&message))
            .await
            .unwrap();
        assert_eq!(decorated["upperMessage"], "done");
    }
}
