//! runmigrate CLI library
//!
//! Moves stored PipelineRuns and TaskRuns from the v1beta1 representation to
//! v1, rebuilding the PipelineRun -> TaskRun links that conversion drops.

pub mod accessor;
pub mod commands;
pub mod config;
pub mod error;
pub mod migration;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};

/// runmigrate - Tekton storage version migration
#[derive(Parser, Debug)]
#[command(name = "runmigrate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store PipelineRuns as v1, restoring their TaskRun child references
    Pipelineruns(commands::pipelineruns::PipelineRunsArgs),
    /// Store TaskRuns as v1
    Taskruns(commands::taskruns::TaskRunsArgs),
}

impl Cli {
    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Pipelineruns(args) => commands::pipelineruns::run(args).await,
            Commands::Taskruns(args) => commands::taskruns::run(args).await,
        }
    }
}
