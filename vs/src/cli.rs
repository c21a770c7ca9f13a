//! CLI argument parsing for versionstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vs")]
#[command(author, version, about = "Plan version history store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Workspace root (overrides config)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List saved versions, newest first
    List,

    /// Print one version as pretty JSON
    Show {
        /// Version id
        #[arg(required = true)]
        id: String,
    },

    /// Delete one version
    Delete {
        /// Version id
        #[arg(required = true)]
        id: String,
    },

    /// Keep only the most recent versions
    Cleanup {
        /// Number of versions to keep
        #[arg(short, long, default_value = "50")]
        keep: usize,
    },
}
