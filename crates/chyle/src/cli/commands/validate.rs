//! Validate command

use clap::Args;
use console::style;
use tracing::info;

use chyle_core::config::load_config_from_env;
use chyle_core::ChyleConfig;

use crate::cli::{output, Cli, OutputFormat};

/// Validate the configuration and list the active stages
#[derive(Debug, Args)]
pub struct ValidateCommand {}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing validate command");

        let config = match load_config_from_env() {
            Ok(config) => config,
            Err(err) => {
                if cli.format == OutputFormat::Json {
                    let output = serde_json::json!({
                        "valid": false,
                        "key": err.key(),
                        "error": err.to_string(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                return Err(err.into());
            }
        };

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report(&config))?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    print_text(&config);
                }
            }
        }

        Ok(())
    }
}

/// Secret-free JSON view of a valid configuration
fn report(config: &ChyleConfig) -> serde_json::Value {
    serde_json::json!({
        "valid": true,
        "stages": config.active_stages(),
        "config": config,
    })
}

fn print_text(config: &ChyleConfig) {
    println!("{}", output::header("Configuration"));
    println!("{}", output::key_value("Repository", &config.git.repository_path));
    println!(
        "{}",
        output::key_value(
            "Range",
            &format!(
                "{}..{}",
                output::reference_style().apply_to(&config.git.reference_from),
                output::reference_style().apply_to(&config.git.reference_to)
            )
        )
    );
    println!();

    let stages = config.active_stages();
    println!("{}", output::header("Active stages"));
    if stages.is_empty() {
        println!("  {}", style("none").dim());
    }
    for stage in &stages {
        println!("  {}", output::stage_style().apply_to(stage));
    }
    println!();

    output::success("Configuration is valid");
}
