//! Layr - AI project planner
//!
//! CLI entry point for generating, refining, and versioning project plans.

use std::path::Path;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use layr::cli::{Cli, Command};
use layr::config::Config;
use layr::planner::Planner;
use layr::provider::{self, SUPPORTED_PROVIDERS};
use versionstore::{VersionMetadata, VersionStore};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("layr starting");

    match cli.command {
        Command::Plan {
            prompt,
            size,
            project,
            output,
            save,
        } => {
            if let Some(size) = size {
                config.plan.size = size;
            }
            if let Some(project) = project {
                config.plan.project = project;
            }

            let planner = Planner::from_config(&config)?;
            let plan = planner.generate_plan(&prompt).await?;
            let markdown = planner.plan_to_markdown(&plan);

            match &output {
                Some(path) => {
                    std::fs::write(path, &markdown)
                        .context(format!("Failed to write plan to {}", path.display()))?;
                    println!("{} Plan written to {}", "✓".green(), path.display());
                }
                None => println!("{}", markdown),
            }

            if save {
                let store = VersionStore::open(Some(Path::new(".")), config.history.max_versions);
                let metadata = VersionMetadata {
                    model: config.provider.model.clone(),
                    prompt: Some(prompt.clone()),
                    description: format!("Plan: {}", plan.title),
                    version_label: None,
                };
                match store.save_version(&plan, metadata) {
                    Some(id) => println!("{} Saved version {}", "✓".green(), id.cyan()),
                    None => eprintln!("{} History unavailable; version not saved", "!".yellow()),
                }
            }
        }

        Command::Refine {
            section_file,
            instruction,
            context_file,
        } => {
            let section = std::fs::read_to_string(&section_file)
                .context(format!("Failed to read section file {}", section_file.display()))?;
            let full_context = match &context_file {
                Some(path) => std::fs::read_to_string(path)
                    .context(format!("Failed to read context file {}", path.display()))?,
                None => section.clone(),
            };

            let planner = Planner::from_config(&config)?;
            let refined = planner.refine_section(&section, &instruction, &full_context).await?;
            println!("{}", refined);
        }

        Command::Models => {
            let provider = provider::create_provider(&config.provider.provider, &config.provider)?;
            println!("Models supported by {}:", provider.name().cyan());
            for model in provider.supported_models() {
                println!("  {}", model);
            }
        }

        Command::Providers => {
            for name in SUPPORTED_PROVIDERS {
                println!("{}", name);
            }
        }

        Command::Check => {
            let provider = provider::create_provider(&config.provider.provider, &config.provider)?;
            if provider.is_available().await {
                println!("{} {} is available", "✓".green(), provider.name().cyan());
            } else {
                println!(
                    "{} {} is not available. Check credentials and connectivity.",
                    "✗".red(),
                    provider.name().cyan()
                );
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
