// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deploy entry point.
//!
//! Read package → stage code → probe existence → upsert function →
//! reconcile event sources. Strictly sequential; the first failure aborts
//! everything after it and already-committed remote effects are left as is.

use std::path::Path;
use std::sync::Arc;

use crate::client::{Logger, ObjectStoreClient, PackageReader, RemoteComputeClient};
use crate::config::DeployConfig;
use crate::error::{DeployError, DeployResult};
use crate::event_source::MappingOutcome;
use crate::stager::{CodeReference, CodeStager};
use crate::upserter::{FunctionAction, FunctionUpserter};

/// Summary of a successful deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub function: String,
    pub action: FunctionAction,
    /// Where the code came from: `inline (N bytes)` or `s3://bucket/key`.
    pub code: String,
    pub mappings: Vec<MappingOutcome>,
}

/// Converges one function and its event sources to a deploy config.
///
/// Holds no state between calls; every deploy is independent.
pub struct DeployOrchestrator {
    compute: Arc<dyn RemoteComputeClient>,
    store: Arc<dyn ObjectStoreClient>,
    reader: Arc<dyn PackageReader>,
    logger: Arc<dyn Logger>,
}

impl DeployOrchestrator {
    pub fn new(
        compute: Arc<dyn RemoteComputeClient>,
        store: Arc<dyn ObjectStoreClient>,
        reader: Arc<dyn PackageReader>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            compute,
            store,
            reader,
            logger,
        }
    }

    /// Deploy `package` according to `config`.
    ///
    /// On failure the remediation hint is written to the logger before the
    /// error is returned.
    pub async fn deploy(&self, package: &Path, config: &DeployConfig) -> DeployResult<DeployReport> {
        tracing::info!(
            function = %config.function.name,
            package = %package.display(),
            bindings = config.event_sources.len(),
            "Starting deploy"
        );

        match self.run(package, config).await {
            Ok(report) => {
                tracing::info!(
                    function = %report.function,
                    action = %report.action,
                    "Deploy finished"
                );
                Ok(report)
            }
            Err(e) => {
                self.logger.log(&e.remediation());
                tracing::error!(function = %config.function.name, error = %e, "Deploy failed");
                Err(e)
            }
        }
    }

    async fn run(&self, package: &Path, config: &DeployConfig) -> DeployResult<DeployReport> {
        let bytes = self
            .reader
            .read(package)
            .await
            .map_err(|source| DeployError::PackageRead {
                path: package.to_path_buf(),
                source,
            })?;

        let code: CodeReference = CodeStager::new(self.store.as_ref())
            .stage(bytes, config)
            .await?;
        let code_summary = code.to_string();

        let function = &config.function.name;
        let state = self
            .compute
            .get_function(function.as_str())
            .await
            .map_err(|source| DeployError::Probe {
                function: function.clone(),
                source,
            })?;
        tracing::debug!(function = %function, state = ?state, "Probed function");

        let outcome = FunctionUpserter::new(self.compute.as_ref())
            .upsert(state, code, config)
            .await?;

        Ok(DeployReport {
            function: function.to_string(),
            action: outcome.action,
            code: code_summary,
            mappings: outcome.mappings,
        })
    }
}
