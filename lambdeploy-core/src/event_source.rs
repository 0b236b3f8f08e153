// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Event source mapping reconciliation.
//!
//! For each declared binding: list the remote mappings for (function,
//! source). None means create one. Otherwise every listed mapping gets its
//! batch size updated, one at a time in listing order, stopping at the
//! first failure. Stale deploys can leave several mappings behind and all of
//! them are brought back in line.

use serde_json::Value;

use crate::client::{CreateEventSourceMappingRequest, RemoteComputeClient};
use crate::config::{EventSourceBinding, FUNCTION_NAME_KEY};
use crate::error::{DeployError, DeployResult};
use crate::types::FunctionName;

/// What reconciliation did for one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingOutcome {
    pub event_source_arn: String,
    pub action: MappingAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingAction {
    Created,
    /// Number of existing mappings whose batch size was set.
    Updated { count: usize },
}

/// Synchronizes declared bindings against the remote mapping list.
pub struct EventSourceReconciler<'a> {
    client: &'a dyn RemoteComputeClient,
}

impl<'a> EventSourceReconciler<'a> {
    pub fn new(client: &'a dyn RemoteComputeClient) -> Self {
        Self { client }
    }

    /// Reconcile bindings in declaration order; the first failure stops the rest.
    pub async fn reconcile_all(
        &self,
        bindings: &[EventSourceBinding],
        function: &FunctionName,
    ) -> DeployResult<Vec<MappingOutcome>> {
        let mut outcomes = Vec::with_capacity(bindings.len());
        for binding in bindings {
            outcomes.push(self.reconcile(binding, function).await?);
        }
        Ok(outcomes)
    }

    /// Reconcile a single binding.
    pub async fn reconcile(
        &self,
        binding: &EventSourceBinding,
        function: &FunctionName,
    ) -> DeployResult<MappingOutcome> {
        let params = binding.merged_with(function);
        let function_name = match params.get(FUNCTION_NAME_KEY) {
            Some(Value::String(name)) => name.clone(),
            _ => function.as_str().to_string(),
        };
        let event_source_arn = binding.event_source_arn().to_string();

        let existing = self
            .client
            .list_event_source_mappings(&function_name, &event_source_arn)
            .await
            .map_err(|source| DeployError::ListMappings {
                function: function_name.clone(),
                event_source_arn: event_source_arn.clone(),
                source,
            })?;

        if existing.is_empty() {
            tracing::info!(
                function = %function_name,
                event_source = %event_source_arn,
                "Creating event source mapping"
            );
            self.client
                .create_event_source_mapping(CreateEventSourceMappingRequest { params })
                .await
                .map_err(|source| DeployError::CreateMapping {
                    function: function_name.clone(),
                    event_source_arn: event_source_arn.clone(),
                    source,
                })?;

            return Ok(MappingOutcome {
                event_source_arn,
                action: MappingAction::Created,
            });
        }

        let batch_size = binding.batch_size();
        for mapping in &existing {
            tracing::info!(
                uuid = %mapping.uuid,
                event_source = %event_source_arn,
                batch_size = batch_size.value(),
                "Updating event source mapping"
            );
            self.client
                .update_event_source_mapping(&mapping.uuid, batch_size)
                .await
                .map_err(|source| DeployError::UpdateMapping {
                    uuid: mapping.uuid.clone(),
                    batch_size,
                    source,
                })?;
        }

        Ok(MappingOutcome {
            event_source_arn,
            action: MappingAction::Updated {
                count: existing.len(),
            },
        })
    }
}
