// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML deploy configuration parser with strict schema validation.
//!
//! The deploy file is parsed into raw structs first and then validated into
//! the types the deploy pipeline consumes. Any invalid field results in a
//! HardValidationError before a single remote call is made.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DeployError, DeployResult, HardValidationError};
use crate::types::{BatchSize, FunctionName, MemorySize, Timeout};

/// Runtime used when the deploy file does not name one.
pub const DEFAULT_RUNTIME: &str = "nodejs4.3";

/// Binding key holding the event source identifier.
pub const EVENT_SOURCE_ARN_KEY: &str = "EventSourceArn";
/// Binding key holding the batch size.
pub const BATCH_SIZE_KEY: &str = "BatchSize";
/// Key the function name is merged under in a mapping request.
pub const FUNCTION_NAME_KEY: &str = "FunctionName";

/// Raw deploy file as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawDeployConfig {
    function_name: Option<String>,
    description: Option<String>,
    handler: Option<String>,
    role: Option<String>,
    timeout: Option<u32>,
    memory_size: Option<u32>,
    runtime: Option<String>,
    #[serde(default)]
    publish: bool,
    vpc: Option<VpcConfig>,
    event_source: Option<RawEventSources>,
    s3: Option<RawStagingTarget>,
    #[serde(default)]
    client: ClientConfig,
}

/// `event_source` may be a single mapping or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEventSources {
    One(Map<String, Value>),
    Many(Vec<Map<String, Value>>),
}

impl RawEventSources {
    fn into_vec(self) -> Vec<Map<String, Value>> {
        match self {
            Self::One(binding) => vec![binding],
            Self::Many(bindings) => bindings,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStagingTarget {
    bucket: Option<String>,
    key: Option<String>,
}

/// Network placement for the function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcConfig {
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}

/// Settings for building the remote clients.
///
/// Consumed once by whoever constructs the clients. The deploy pipeline
/// itself never reads it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

/// Function settings shared by the create and update-configuration calls.
///
/// Unset optional fields are left out of the remote call, so an update keeps
/// whatever the platform already has for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub name: FunctionName,
    pub description: Option<String>,
    pub handler: String,
    pub role: String,
    pub timeout: Option<Timeout>,
    pub memory_size: Option<MemorySize>,
    pub vpc: Option<VpcConfig>,
}

/// Object store location the package is staged at before deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingTarget {
    pub bucket: String,
    pub key: Option<String>,
}

impl StagingTarget {
    /// Explicit key, else `<function>.zip`.
    pub fn effective_key(&self, function: &FunctionName) -> String {
        match &self.key {
            Some(key) => key.clone(),
            None => format!("{}.zip", function),
        }
    }
}

/// One declared event source binding.
///
/// The bag is opaque apart from the source identifier and the batch size,
/// which are checked when the binding is built.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSourceBinding {
    event_source_arn: String,
    batch_size: BatchSize,
    params: Map<String, Value>,
}

impl EventSourceBinding {
    /// Validate a raw binding; `index` is its position in the deploy file.
    pub fn new(params: Map<String, Value>, index: usize) -> Result<Self, HardValidationError> {
        let event_source_arn = match params.get(EVENT_SOURCE_ARN_KEY) {
            Some(Value::String(arn)) if !arn.is_empty() => arn.clone(),
            Some(other) => {
                return Err(HardValidationError::InvalidEventSource {
                    index,
                    reason: format!("{} must be a non-empty string, got {}", EVENT_SOURCE_ARN_KEY, other),
                })
            }
            None => {
                return Err(HardValidationError::InvalidEventSource {
                    index,
                    reason: format!("missing {}", EVENT_SOURCE_ARN_KEY),
                })
            }
        };

        let batch_size = match params.get(BATCH_SIZE_KEY) {
            Some(Value::Number(n)) => match n.as_u64() {
                Some(size) => BatchSize::new(size).map_err(|e| {
                    HardValidationError::InvalidEventSource {
                        index,
                        reason: e.to_string(),
                    }
                })?,
                None => {
                    return Err(HardValidationError::InvalidEventSource {
                        index,
                        reason: format!("{} must be a positive integer, got {}", BATCH_SIZE_KEY, n),
                    })
                }
            },
            Some(other) => {
                return Err(HardValidationError::InvalidEventSource {
                    index,
                    reason: format!("{} must be a positive integer, got {}", BATCH_SIZE_KEY, other),
                })
            }
            None => {
                return Err(HardValidationError::InvalidEventSource {
                    index,
                    reason: format!("missing {}", BATCH_SIZE_KEY),
                })
            }
        };

        Ok(Self {
            event_source_arn,
            batch_size,
            params,
        })
    }

    pub fn event_source_arn(&self) -> &str {
        &self.event_source_arn
    }

    pub fn batch_size(&self) -> BatchSize {
        self.batch_size
    }

    /// The function name overlaid with the binding; binding keys win.
    pub fn merged_with(&self, function: &FunctionName) -> Map<String, Value> {
        let mut merged = Map::new();
        merged.insert(
            FUNCTION_NAME_KEY.to_string(),
            Value::String(function.as_str().to_string()),
        );
        for (key, value) in &self.params {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

/// Validated deploy configuration. Read-only for the duration of a deploy.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub function: FunctionDefinition,
    pub runtime: String,
    pub publish: bool,
    pub event_sources: Vec<EventSourceBinding>,
    pub staging: Option<StagingTarget>,
    pub client: ClientConfig,
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a deploy file.
    pub fn load_file(path: impl AsRef<Path>) -> DeployResult<DeployConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DeployError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DeployError::Io {
            context: "reading deploy file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate a deploy file from a YAML string.
    pub fn load_string(content: &str) -> DeployResult<DeployConfig> {
        let raw: RawDeployConfig =
            serde_yaml::from_str(content).map_err(|e| DeployError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Ok(Self::validate(raw)?)
    }

    fn validate(raw: RawDeployConfig) -> Result<DeployConfig, HardValidationError> {
        let context = "deploy configuration";

        let name = raw
            .function_name
            .ok_or_else(|| HardValidationError::MissingRequiredField {
                field: "function_name",
                context: context.to_string(),
            })?;
        let name = FunctionName::new(name)?;

        let handler = Self::required(raw.handler, "handler", &name)?;
        let role = Self::required(raw.role, "role", &name)?;

        let timeout = raw.timeout.map(Timeout::from_secs).transpose()?;
        let memory_size = raw.memory_size.map(MemorySize::from_mb).transpose()?;

        let runtime = match raw.runtime {
            Some(runtime) if runtime.trim().is_empty() => {
                return Err(HardValidationError::InvalidFieldValue {
                    field: "runtime",
                    value: runtime,
                    reason: "Runtime cannot be blank".to_string(),
                })
            }
            Some(runtime) => runtime,
            None => DEFAULT_RUNTIME.to_string(),
        };

        let event_sources = raw
            .event_source
            .map(RawEventSources::into_vec)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, params)| EventSourceBinding::new(params, index))
            .collect::<Result<Vec<_>, _>>()?;

        let staging = match raw.s3 {
            Some(target) => {
                let bucket = target
                    .bucket
                    .filter(|b| !b.is_empty())
                    .ok_or_else(|| HardValidationError::MissingRequiredField {
                        field: "s3.bucket",
                        context: format!("function '{}'", name),
                    })?;
                if let Some(key) = &target.key {
                    if key.is_empty() {
                        return Err(HardValidationError::InvalidFieldValue {
                            field: "s3.key",
                            value: String::new(),
                            reason: "Staging key cannot be empty; omit it to use the default"
                                .to_string(),
                        });
                    }
                }
                Some(StagingTarget {
                    bucket,
                    key: target.key,
                })
            }
            None => None,
        };

        Ok(DeployConfig {
            function: FunctionDefinition {
                name,
                description: raw.description,
                handler,
                role,
                timeout,
                memory_size,
                vpc: raw.vpc,
            },
            runtime,
            publish: raw.publish,
            event_sources,
            staging,
            client: raw.client,
        })
    }

    fn required(
        value: Option<String>,
        field: &'static str,
        function: &FunctionName,
    ) -> Result<String, HardValidationError> {
        match value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(HardValidationError::MissingRequiredField {
                field,
                context: format!("function '{}'", function),
            }),
        }
    }
}
