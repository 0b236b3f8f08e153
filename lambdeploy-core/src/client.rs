// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Capabilities the deploy pipeline consumes.
//!
//! The pipeline never builds a client itself. Whoever drives a deploy hands
//! in already-configured implementations of these traits; every call is
//! awaited to completion before the next one is issued.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::FunctionDefinition;
use crate::error::RemoteError;
use crate::stager::CodeReference;
use crate::types::BatchSize;

/// Outcome of the single existence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFunctionState {
    Present,
    Absent,
}

/// Full create-function request.
#[derive(Debug, Clone)]
pub struct CreateFunctionRequest {
    pub definition: FunctionDefinition,
    pub runtime: String,
    pub publish: bool,
    pub code: CodeReference,
}

#[derive(Debug, Clone)]
pub struct UpdateFunctionCodeRequest {
    pub function_name: String,
    pub code: CodeReference,
    pub publish: bool,
}

/// Create-mapping request: the function name merged with a binding bag.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateEventSourceMappingRequest {
    pub params: Map<String, Value>,
}

/// An existing remote mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSourceMapping {
    pub uuid: String,
}

/// Remote compute platform.
#[async_trait]
pub trait RemoteComputeClient: Send + Sync {
    /// Probe whether the function exists. A missing function is
    /// `Ok(Absent)`, never an error.
    async fn get_function(&self, name: &str) -> Result<RemoteFunctionState, RemoteError>;

    async fn create_function(&self, request: CreateFunctionRequest) -> Result<(), RemoteError>;

    async fn update_function_code(
        &self,
        request: UpdateFunctionCodeRequest,
    ) -> Result<(), RemoteError>;

    async fn update_function_configuration(
        &self,
        definition: &FunctionDefinition,
    ) -> Result<(), RemoteError>;

    /// Mappings for (function, source), in the order the platform lists them.
    async fn list_event_source_mappings(
        &self,
        function_name: &str,
        event_source_arn: &str,
    ) -> Result<Vec<EventSourceMapping>, RemoteError>;

    async fn create_event_source_mapping(
        &self,
        request: CreateEventSourceMappingRequest,
    ) -> Result<(), RemoteError>;

    async fn update_event_source_mapping(
        &self,
        uuid: &str,
        batch_size: BatchSize,
    ) -> Result<(), RemoteError>;
}

/// Object store used for staging packages.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), RemoteError>;
}

/// Source of package bytes.
#[async_trait]
pub trait PackageReader: Send + Sync {
    async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Sink for single-line diagnostic hints.
pub trait Logger: Send + Sync {
    fn log(&self, line: &str);
}

/// Reads packages from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPackageReader;

#[async_trait]
impl PackageReader for FsPackageReader {
    async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

/// Forwards hints to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, line: &str) {
        tracing::warn!("{}", line);
    }
}
