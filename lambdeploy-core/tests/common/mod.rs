// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Recording fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lambdeploy_core::{
    BatchSize, CodeReference, ConfigLoader, CreateEventSourceMappingRequest, CreateFunctionRequest,
    DeployConfig, DeployOrchestrator, EventSourceMapping, FsPackageReader, FunctionDefinition,
    Logger, ObjectStoreClient, RemoteComputeClient, RemoteError, RemoteFunctionState,
    UpdateFunctionCodeRequest,
};
use serde_json::{Map, Value};
use tempfile::TempDir;

/// Every remote call the fake observed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    PutObject {
        bucket: String,
        key: String,
        bytes: usize,
    },
    GetFunction(String),
    CreateFunction {
        name: String,
        runtime: String,
        publish: bool,
        code: CodeReference,
    },
    UpdateFunctionCode {
        name: String,
        publish: bool,
        code: CodeReference,
    },
    UpdateFunctionConfiguration(String),
    ListMappings {
        function: String,
        event_source_arn: String,
    },
    CreateMapping(Map<String, Value>),
    UpdateMapping {
        uuid: String,
        batch_size: u32,
    },
}

impl Call {
    pub fn is_remote_compute(&self) -> bool {
        !matches!(self, Call::PutObject { .. })
    }
}

/// Calls the fake should reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    PutObject,
    CreateFunction,
    UpdateCode,
    UpdateConfiguration,
    ListMappings(String),
    CreateMapping(String),
    UpdateMapping(String),
}

/// In-memory compute platform plus object store sharing one call log.
pub struct FakePlatform {
    calls: Mutex<Vec<Call>>,
    definitions: Mutex<Vec<FunctionDefinition>>,
    state: RemoteFunctionState,
    probe_error: Option<RemoteError>,
    mappings: HashMap<String, Vec<String>>,
    failures: Vec<FailOn>,
}

impl FakePlatform {
    pub fn new(state: RemoteFunctionState) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            definitions: Mutex::new(Vec::new()),
            state,
            probe_error: None,
            mappings: HashMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn with_probe_error(mut self, error: RemoteError) -> Self {
        self.probe_error = Some(error);
        self
    }

    /// Existing mapping uuids for a source, in listing order.
    pub fn with_mappings(mut self, event_source_arn: &str, uuids: &[&str]) -> Self {
        self.mappings.insert(
            event_source_arn.to_string(),
            uuids.iter().map(|u| u.to_string()).collect(),
        );
        self
    }

    pub fn failing(mut self, on: FailOn) -> Self {
        self.failures.push(on);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Definitions sent with create and update-configuration calls.
    pub fn definitions(&self) -> Vec<FunctionDefinition> {
        self.definitions.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, on: FailOn) -> Result<(), RemoteError> {
        if self.failures.contains(&on) {
            Err(RemoteError::AccessDenied(format!("{:?} rejected", on)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteComputeClient for FakePlatform {
    async fn get_function(&self, name: &str) -> Result<RemoteFunctionState, RemoteError> {
        self.record(Call::GetFunction(name.to_string()));
        match &self.probe_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.state),
        }
    }

    async fn create_function(&self, request: CreateFunctionRequest) -> Result<(), RemoteError> {
        self.definitions
            .lock()
            .unwrap()
            .push(request.definition.clone());
        self.record(Call::CreateFunction {
            name: request.definition.name.to_string(),
            runtime: request.runtime,
            publish: request.publish,
            code: request.code,
        });
        self.check(FailOn::CreateFunction)
    }

    async fn update_function_code(
        &self,
        request: UpdateFunctionCodeRequest,
    ) -> Result<(), RemoteError> {
        self.record(Call::UpdateFunctionCode {
            name: request.function_name,
            publish: request.publish,
            code: request.code,
        });
        self.check(FailOn::UpdateCode)
    }

    async fn update_function_configuration(
        &self,
        definition: &FunctionDefinition,
    ) -> Result<(), RemoteError> {
        self.definitions.lock().unwrap().push(definition.clone());
        self.record(Call::UpdateFunctionConfiguration(definition.name.to_string()));
        self.check(FailOn::UpdateConfiguration)
    }

    async fn list_event_source_mappings(
        &self,
        function_name: &str,
        event_source_arn: &str,
    ) -> Result<Vec<EventSourceMapping>, RemoteError> {
        self.record(Call::ListMappings {
            function: function_name.to_string(),
            event_source_arn: event_source_arn.to_string(),
        });
        self.check(FailOn::ListMappings(event_source_arn.to_string()))?;
        Ok(self
            .mappings
            .get(event_source_arn)
            .map(|uuids| {
                uuids
                    .iter()
                    .map(|uuid| EventSourceMapping { uuid: uuid.clone() })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_event_source_mapping(
        &self,
        request: CreateEventSourceMappingRequest,
    ) -> Result<(), RemoteError> {
        let arn = request
            .params
            .get("EventSourceArn")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.record(Call::CreateMapping(request.params));
        self.check(FailOn::CreateMapping(arn))
    }

    async fn update_event_source_mapping(
        &self,
        uuid: &str,
        batch_size: BatchSize,
    ) -> Result<(), RemoteError> {
        self.record(Call::UpdateMapping {
            uuid: uuid.to_string(),
            batch_size: batch_size.value(),
        });
        self.check(FailOn::UpdateMapping(uuid.to_string()))
    }
}

#[async_trait]
impl ObjectStoreClient for FakePlatform {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), RemoteError> {
        self.record(Call::PutObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            bytes: body.len(),
        });
        self.check(FailOn::PutObject)
    }
}

/// Collects logger lines.
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Everything a deploy test needs, with the package on disk.
pub struct Harness {
    pub platform: Arc<FakePlatform>,
    pub logger: Arc<RecordingLogger>,
    pub orchestrator: DeployOrchestrator,
    pub package: PathBuf,
    _dir: TempDir,
}

pub const PACKAGE_BYTES: &[u8] = b"PK\x03\x04function-package";

impl Harness {
    pub fn new(platform: FakePlatform) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let package = dir.path().join("function.zip");
        let mut file = std::fs::File::create(&package).expect("Failed to create package");
        file.write_all(PACKAGE_BYTES)
            .expect("Failed to write package");

        let platform = Arc::new(platform);
        let logger = Arc::new(RecordingLogger::default());
        let orchestrator = DeployOrchestrator::new(
            platform.clone(),
            platform.clone(),
            Arc::new(FsPackageReader),
            logger.clone(),
        );

        Self {
            platform,
            logger,
            orchestrator,
            package,
            _dir: dir,
        }
    }
}

pub fn config(yaml: &str) -> DeployConfig {
    ConfigLoader::load_string(yaml).expect("test config must be valid")
}

pub const BASE_CONFIG: &str = r#"
function_name: fn1
description: test function
handler: index.handler
role: arn:aws:iam::123456789012:role/lambda
"#;

pub fn config_with(extra: &str) -> DeployConfig {
    config(&format!("{}{}", BASE_CONFIG, extra))
}
