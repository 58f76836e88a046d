// src/cli/mod.rs — CLI definition (clap derive)

pub mod check;
pub mod evaluate;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::infra::config::Config;

#[derive(Parser)]
#[command(name = "rubrix", about = "Rubric-driven assignment evaluator", version)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Evaluate an assignment file against a rubric file
    Evaluate {
        assignment: PathBuf,
        rubric: PathBuf,
        /// Write the PDF report here
        #[arg(long)]
        pdf: Option<PathBuf>,
        /// Write the HTML report here
        #[arg(long)]
        html: Option<PathBuf>,
        /// Print the Report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show configuration and run a sample evaluation
    Check,
}

impl Cli {
    /// Default log level when RUST_LOG is unset.
    pub fn log_level(&self) -> &'static str {
        match self.command {
            Commands::Serve { .. } => "info",
            _ => "warn",
        }
    }

    pub fn load_config(&self) -> anyhow::Result<Config> {
        match self.config {
            Some(ref path) => Ok(Config::load_from(std::path::Path::new(path))?.with_env_overrides()),
            None => Config::load(),
        }
    }
}
