//! `predict-studio` command-line client

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod chart;
mod cli;
mod commands;
mod config;
mod context;
mod download;
mod output;
mod views;

use cli::{Cli, Commands};
use context::Context;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "predict_studio=debug"
    } else {
        "predict_studio=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if tracing::enabled!(tracing::Level::DEBUG) {
            eprintln!("{:?}", e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::new(&cli)?;
    match cli.command {
        Commands::Session(args) => commands::session::execute(&ctx, args).await,
        Commands::Run(args) => commands::run::execute(&ctx, args).await,
        Commands::Config(cmd) => commands::config::execute(&ctx, cmd).await,
    }
}
