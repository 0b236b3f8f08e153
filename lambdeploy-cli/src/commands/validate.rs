// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `lambdeploy validate` command - Validate a deploy file.

use std::fmt::Display;

use lambdeploy_core::ConfigLoader;

use crate::aws;

fn or_unset<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unset (platform keeps current)".to_string())
}

pub async fn execute(file: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(file = %file, "Validating deploy file");

    let checked = ConfigLoader::load_file(file)
        .map_err(|e| e.to_string())
        .and_then(|config| {
            for binding in &config.event_sources {
                aws::check_mapping_keys(&binding.merged_with(&config.function.name))
                    .map_err(|e| format!("{}: {}", binding.event_source_arn(), e))?;
            }
            Ok(config)
        });

    match checked {
        Ok(config) => {
            let function = &config.function;
            println!("✓ Deploy file is valid");
            println!();
            println!("Function:");
            println!("  Name:        {}", function.name);
            println!("  Handler:     {}", function.handler);
            println!("  Role:        {}", function.role);
            println!("  Runtime:     {}", config.runtime);
            println!("  Description: {}", or_unset(function.description.as_deref()));
            println!("  Timeout:     {}", or_unset(function.timeout));
            println!("  Memory:      {}", or_unset(function.memory_size));
            println!("  Publish:     {}", config.publish);
            if let Some(vpc) = &function.vpc {
                println!(
                    "  VPC:         subnets [{}], security groups [{}]",
                    vpc.subnet_ids.join(", "),
                    vpc.security_group_ids.join(", ")
                );
            }
            match &config.staging {
                Some(target) => println!(
                    "  Code:        s3://{}/{}",
                    target.bucket,
                    target.effective_key(&function.name)
                ),
                None => println!("  Code:        inline"),
            }
            println!();
            println!("Event sources ({}):", config.event_sources.len());
            for binding in &config.event_sources {
                println!(
                    "  - {} (batch size: {})",
                    binding.event_source_arn(),
                    binding.batch_size()
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Deploy file validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
