// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Create-or-update of the function resource.
//!
//! Absent: one create call carrying the full definition and the code.
//! Present: update code, then update configuration. Configuration is never
//! pushed after a failed code update. A failed configuration update leaves
//! the new code live; that window is accepted and not rolled back.
//! Either branch continues into event source reconciliation.

use crate::client::{
    CreateFunctionRequest, RemoteComputeClient, RemoteFunctionState, UpdateFunctionCodeRequest,
};
use crate::config::DeployConfig;
use crate::error::{DeployError, DeployResult, UpdateStage};
use crate::event_source::{EventSourceReconciler, MappingOutcome};
use crate::stager::CodeReference;

/// What happened to the function resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionAction {
    Created,
    Updated,
}

impl FunctionAction {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

impl std::fmt::Display for FunctionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Result of a successful upsert including its mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub action: FunctionAction,
    pub mappings: Vec<MappingOutcome>,
}

pub struct FunctionUpserter<'a> {
    client: &'a dyn RemoteComputeClient,
}

impl<'a> FunctionUpserter<'a> {
    pub fn new(client: &'a dyn RemoteComputeClient) -> Self {
        Self { client }
    }

    /// Drive the branch selected by the probe, then reconcile every binding.
    pub async fn upsert(
        &self,
        state: RemoteFunctionState,
        code: CodeReference,
        config: &DeployConfig,
    ) -> DeployResult<UpsertOutcome> {
        let action = match state {
            RemoteFunctionState::Absent => {
                self.create(code, config).await?;
                FunctionAction::Created
            }
            RemoteFunctionState::Present => {
                self.update(code, config).await?;
                FunctionAction::Updated
            }
        };

        let mappings = EventSourceReconciler::new(self.client)
            .reconcile_all(&config.event_sources, &config.function.name)
            .await?;

        Ok(UpsertOutcome { action, mappings })
    }

    async fn create(&self, code: CodeReference, config: &DeployConfig) -> DeployResult<()> {
        let function = &config.function.name;
        tracing::info!(
            function = %function,
            runtime = %config.runtime,
            publish = config.publish,
            code = %code,
            "Creating function"
        );

        let request = CreateFunctionRequest {
            definition: config.function.clone(),
            runtime: config.runtime.clone(),
            publish: config.publish,
            code,
        };

        self.client
            .create_function(request)
            .await
            .map_err(|source| DeployError::Create {
                function: function.clone(),
                source,
            })
    }

    async fn update(&self, code: CodeReference, config: &DeployConfig) -> DeployResult<()> {
        let function = &config.function.name;
        tracing::info!(
            function = %function,
            publish = config.publish,
            code = %code,
            "Updating function code"
        );

        self.client
            .update_function_code(UpdateFunctionCodeRequest {
                function_name: function.as_str().to_string(),
                code,
                publish: config.publish,
            })
            .await
            .map_err(|source| DeployError::Update {
                function: function.clone(),
                stage: UpdateStage::Code,
                source,
            })?;

        tracing::info!(function = %function, "Updating function configuration");

        self.client
            .update_function_configuration(&config.function)
            .await
            .map_err(|source| DeployError::Update {
                function: function.clone(),
                stage: UpdateStage::Configuration,
                source,
            })
    }
}
