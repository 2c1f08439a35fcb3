//! Create command

use std::path::Path;

use clap::Args;
use tracing::info;

use chyle_changelog::{Changelog, Process};
use chyle_core::config::load_config_from_env;
use chyle_core::ChyleConfig;
use chyle_git::GitRepo;

use crate::cli::{output, Cli, OutputFormat};

/// Build the changelog and run the configured senders
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Build the changelog and print it as JSON without running senders
    #[arg(long)]
    pub dry_run: bool,
}

impl CreateCommand {
    /// Execute the create command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(dry_run = self.dry_run, "executing create command");
        let config = load_config_from_env()?;

        if !cli.quiet && cli.format == OutputFormat::Text {
            output::info(&format!(
                "Reading commits {}..{}",
                output::reference_style().apply_to(&config.git.reference_from),
                output::reference_style().apply_to(&config.git.reference_to)
            ));
        }

        let changelog = run(&config, self.dry_run)?;

        if self.dry_run {
            println!("{}", serde_json::to_string_pretty(&changelog)?);
        } else if !cli.quiet && cli.format == OutputFormat::Text {
            output::success(&format!(
                "Changelog created with {} entries",
                changelog.entries.len()
            ));
        }

        Ok(())
    }
}

/// Read the configured commit range and run the pipeline over it
pub(crate) fn run(config: &ChyleConfig, dry_run: bool) -> anyhow::Result<Changelog> {
    let repo = GitRepo::open(Path::new(&config.git.repository_path))?;
    let commits = repo.commits_between(&config.git.reference_from, &config.git.reference_to)?;
    let process = Process::build(config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let changelog = runtime.block_on(async {
        if dry_run {
            process.build_changelog(&commits).await
        } else {
            process.proceed(&commits).await
        }
    })?;

    Ok(changelog)
}
