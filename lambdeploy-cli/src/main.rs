// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! lambdeploy CLI
//!
//! Command-line interface for deploying packaged functions.

use clap::{Parser, Subcommand};

mod aws;
mod commands;

/// lambdeploy - Declarative serverless function deployer
#[derive(Parser)]
#[command(name = "lambdeploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Deploy file path
    #[arg(short, long, default_value = "lambdeploy.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a code package
    Deploy {
        /// Path to the zipped function package
        package: String,
    },

    /// Validate a deploy file
    Validate {
        /// Path to the deploy file (defaults to --config)
        file: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Deploy { package } => commands::deploy::execute(&cli.config, &package).await,
        Commands::Validate { file } => {
            commands::validate::execute(file.as_deref().unwrap_or(&cli.config)).await
        }
    }
}
