//! CLI argument parsing for Layr

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::provider::{PlanSize, ProjectKind};

#[derive(Parser, Debug)]
#[command(name = "layr")]
#[command(author, version, about = "AI project planner", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a project plan from a natural-language description
    Plan {
        /// Project description
        #[arg(required = true)]
        prompt: String,

        /// Plan verbosity tier
        #[arg(short, long, value_enum)]
        size: Option<PlanSize>,

        /// Project kind shaping the plan
        #[arg(short, long, value_enum)]
        project: Option<ProjectKind>,

        /// Write the rendered markdown here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save a version snapshot to the workspace history
        #[arg(long)]
        save: bool,
    },

    /// Refine a section of an existing plan document
    Refine {
        /// File holding the section content
        #[arg(required = true)]
        section_file: PathBuf,

        /// Natural-language refinement instruction
        #[arg(required = true)]
        instruction: String,

        /// File holding the full plan for context (defaults to the section file)
        #[arg(long)]
        context_file: Option<PathBuf>,
    },

    /// List models supported by the configured provider
    Models,

    /// List supported provider type names
    Providers,

    /// Check provider availability and credentials
    Check,
}
