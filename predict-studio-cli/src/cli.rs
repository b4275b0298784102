//! Command-line arguments

use clap::{Parser, Subcommand};

use crate::commands::{config::ConfigCommands, run::RunArgs, session::SessionArgs};
use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "predict-studio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upload a dataset, train a model on it and make predictions", long_about = None)]
pub struct Cli {
    /// Configuration profile to use
    #[arg(long, global = true, env = "PREDICT_STUDIO_PROFILE")]
    pub profile: Option<String>,

    /// Output format; defaults to the profile's, then the configured one
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose logging, including request and response bodies
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Prediction service URL, overriding the profile
    #[arg(long, global = true, env = "PREDICT_STUDIO_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive session: upload, analyze, train and predict step by step
    Session(SessionArgs),

    /// Run the whole workflow once from arguments
    Run(RunArgs),

    /// Manage configuration
    Config(ConfigCommands),
}
