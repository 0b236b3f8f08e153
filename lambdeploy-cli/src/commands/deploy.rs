// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `lambdeploy deploy` command - Converge the remote function to the deploy file.

use std::path::Path;
use std::sync::Arc;

use lambdeploy_core::{
    ConfigLoader, DeployOrchestrator, FsPackageReader, MappingAction, TracingLogger,
};

use crate::aws;

pub async fn execute(config_path: &str, package: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(config = %config_path, package = %package, "Loading deploy file");

    let config = ConfigLoader::load_file(config_path)?;
    for binding in &config.event_sources {
        aws::check_mapping_keys(&binding.merged_with(&config.function.name))?;
    }

    let clients = aws::connect(&config.client).await;
    let orchestrator = DeployOrchestrator::new(
        Arc::new(clients.lambda),
        Arc::new(clients.s3),
        Arc::new(FsPackageReader),
        Arc::new(TracingLogger),
    );

    let report = match orchestrator.deploy(Path::new(package), &config).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("✗ Deploy of {} failed:", config.function.name);
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("✓ Function {} {}", report.function, report.action);
    println!("  Code: {}", report.code);
    if !report.mappings.is_empty() {
        println!();
        println!("Event sources ({}):", report.mappings.len());
        for mapping in &report.mappings {
            match mapping.action {
                MappingAction::Created => {
                    println!("  + {} (mapping created)", mapping.event_source_arn)
                }
                MappingAction::Updated { count } => println!(
                    "  ~ {} ({} mapping(s) updated)",
                    mapping.event_source_arn, count
                ),
            }
        }
    }

    Ok(())
}
