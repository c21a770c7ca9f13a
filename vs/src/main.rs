use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use versionstore::VersionStore;
use versionstore::cli::{Cli, Command};
use versionstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let workspace = cli.workspace.unwrap_or(config.workspace_root);

    info!("versionstore starting");

    let store = VersionStore::open(Some(&workspace), config.max_versions);

    match cli.command {
        Command::List => {
            let versions = store.get_versions::<serde_json::Value>();
            if versions.is_empty() {
                println!("No versions found");
            }
            for v in versions {
                let label = v
                    .metadata
                    .version_label
                    .map(|l| format!(" [{}]", l))
                    .unwrap_or_default();
                println!(
                    "{} {} {}{}",
                    v.id.cyan(),
                    format_timestamp(v.timestamp).dimmed(),
                    v.metadata.description,
                    label.yellow()
                );
            }
        }
        Command::Show { id } => match store.get_version::<serde_json::Value>(&id) {
            Some(version) => {
                println!("{}", serde_json::to_string_pretty(&version)?);
            }
            None => {
                eprintln!("{} Version not found: {}", "✗".red(), id);
                std::process::exit(1);
            }
        },
        Command::Delete { id } => {
            if store.delete_version(&id) {
                println!("{} Deleted version: {}", "✓".green(), id.cyan());
            } else {
                eprintln!("{} Version not found: {}", "✗".red(), id);
                std::process::exit(1);
            }
        }
        Command::Cleanup { keep } => {
            let deleted = store.cleanup_old_versions(keep);
            println!("{} Deleted {} version(s), kept {}", "✓".green(), deleted, keep);
        }
    }

    Ok(())
}
