// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! AWS implementations of the deploy capabilities.
//!
//! Clients are built once from the `client` section of the deploy file:
//! explicit region, named profile, or static keys with an optional session
//! token. Anything left unset falls through to the default provider chain.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_lambda::config::{Credentials, Region};
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_lambda::primitives::{Blob, DateTime};
use aws_sdk_lambda::types::{
    DestinationConfig, EventSourcePosition, Filter, FilterCriteria, FunctionCode,
    FunctionResponseType, OnFailure, Runtime, ScalingConfig,
};
use aws_sdk_s3::primitives::ByteStream;
use serde_json::{Map, Value};

use lambdeploy_core::{
    BatchSize, ClientConfig, CodeReference, CreateEventSourceMappingRequest,
    CreateFunctionRequest, EventSourceMapping, FunctionDefinition, ObjectStoreClient,
    RemoteComputeClient, RemoteError, RemoteFunctionState, UpdateFunctionCodeRequest, VpcConfig,
};

/// Binding keys understood by CreateEventSourceMapping. Anything else in a
/// binding is rejected before the request is sent.
const MAPPING_KEYS: &[&str] = &[
    "FunctionName",
    "EventSourceArn",
    "BatchSize",
    "Enabled",
    "StartingPosition",
    "StartingPositionTimestamp",
    "MaximumBatchingWindowInSeconds",
    "ParallelizationFactor",
    "MaximumRecordAgeInSeconds",
    "BisectBatchOnFunctionError",
    "MaximumRetryAttempts",
    "TumblingWindowInSeconds",
    "Topics",
    "Queues",
    "FunctionResponseTypes",
    "FilterCriteria",
    "DestinationConfig",
    "ScalingConfig",
];

pub struct Clients {
    pub lambda: LambdaClient,
    pub s3: S3Store,
}

/// Build the Lambda and S3 clients from one shared SDK configuration.
pub async fn connect(settings: &ClientConfig) -> Clients {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &settings.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &settings.profile {
        loader = loader.profile_name(profile);
    }
    if let (Some(access_key_id), Some(secret_access_key)) =
        (&settings.access_key_id, &settings.secret_access_key)
    {
        tracing::debug!("Using static credentials from deploy file");
        loader = loader.credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            settings.session_token.clone(),
            None,
            "lambdeploy",
        ));
    }

    let sdk_config = loader.load().await;
    tracing::debug!(region = ?sdk_config.region(), "AWS clients configured");

    Clients {
        lambda: LambdaClient {
            inner: aws_sdk_lambda::Client::new(&sdk_config),
        },
        s3: S3Store {
            inner: aws_sdk_s3::Client::new(&sdk_config),
        },
    }
}

fn remote_error<E, R>(err: SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err.code() {
        Some("AccessDeniedException") | Some("AccessDenied") => RemoteError::AccessDenied(message),
        Some("ResourceNotFoundException") | Some("NoSuchBucket") => RemoteError::NotFound(message),
        Some(code) => RemoteError::Service {
            code: code.to_string(),
            message,
        },
        None => RemoteError::Transport(message),
    }
}

fn vpc_config(vpc: &VpcConfig) -> aws_sdk_lambda::types::VpcConfig {
    aws_sdk_lambda::types::VpcConfig::builder()
        .set_subnet_ids(Some(vpc.subnet_ids.clone()))
        .set_security_group_ids(Some(vpc.security_group_ids.clone()))
        .build()
}

fn invalid(key: &str, expected: &str) -> RemoteError {
    RemoteError::InvalidParameter(format!("{} must be {}", key, expected))
}

/// Fail on any binding key CreateEventSourceMapping does not accept.
pub fn check_mapping_keys(params: &Map<String, Value>) -> Result<(), RemoteError> {
    let unknown: Vec<&str> = params
        .keys()
        .map(String::as_str)
        .filter(|k| !MAPPING_KEYS.contains(k))
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(RemoteError::InvalidParameter(format!(
            "unsupported event source mapping parameter(s): {}",
            unknown.join(", ")
        )))
    }
}

fn str_param(params: &Map<String, Value>, key: &str) -> Result<Option<String>, RemoteError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(key, "a string")),
    }
}

fn int_param(params: &Map<String, Value>, key: &str) -> Result<Option<i32>, RemoteError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| invalid(key, "a 32-bit integer")),
    }
}

fn bool_param(params: &Map<String, Value>, key: &str) -> Result<Option<bool>, RemoteError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(invalid(key, "a boolean")),
    }
}

fn list_param(params: &Map<String, Value>, key: &str) -> Result<Option<Vec<String>>, RemoteError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(Some)
            .ok_or_else(|| invalid(key, "a list of strings")),
        Some(_) => Err(invalid(key, "a list of strings")),
    }
}

/// Epoch seconds.
fn timestamp_param(
    params: &Map<String, Value>,
    key: &str,
) -> Result<Option<DateTime>, RemoteError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .map(|secs| Some(DateTime::from_secs(secs)))
            .ok_or_else(|| invalid(key, "epoch seconds")),
    }
}

fn response_types(
    params: &Map<String, Value>,
) -> Result<Option<Vec<FunctionResponseType>>, RemoteError> {
    Ok(list_param(params, "FunctionResponseTypes")?.map(|types| {
        types
            .iter()
            .map(|t| FunctionResponseType::from(t.as_str()))
            .collect()
    }))
}

/// `FilterCriteria: { Filters: [ { Pattern: "..." } ] }`
fn filter_criteria(params: &Map<String, Value>) -> Result<Option<FilterCriteria>, RemoteError> {
    let Some(value) = params.get("FilterCriteria") else {
        return Ok(None);
    };
    let filters = value
        .get("Filters")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("FilterCriteria", "an object with a Filters list"))?
        .iter()
        .map(|f| {
            f.get("Pattern")
                .and_then(Value::as_str)
                .map(|pattern| Filter::builder().pattern(pattern).build())
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| invalid("FilterCriteria.Filters", "a list of { Pattern } objects"))?;

    Ok(Some(
        FilterCriteria::builder().set_filters(Some(filters)).build(),
    ))
}

/// `DestinationConfig: { OnFailure: { Destination: "arn:..." } }`
fn destination_config(
    params: &Map<String, Value>,
) -> Result<Option<DestinationConfig>, RemoteError> {
    let Some(value) = params.get("DestinationConfig") else {
        return Ok(None);
    };
    let destination = value
        .pointer("/OnFailure/Destination")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("DestinationConfig", "{ OnFailure: { Destination } }"))?;

    Ok(Some(
        DestinationConfig::builder()
            .on_failure(OnFailure::builder().destination(destination).build())
            .build(),
    ))
}

fn scaling_config(params: &Map<String, Value>) -> Result<Option<ScalingConfig>, RemoteError> {
    let Some(value) = params.get("ScalingConfig") else {
        return Ok(None);
    };
    let concurrency = value
        .get("MaximumConcurrency")
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| invalid("ScalingConfig", "{ MaximumConcurrency: <integer> }"))?;

    Ok(Some(
        ScalingConfig::builder()
            .maximum_concurrency(concurrency)
            .build(),
    ))
}

/// Lambda-backed compute client.
pub struct LambdaClient {
    inner: aws_sdk_lambda::Client,
}

#[async_trait]
impl RemoteComputeClient for LambdaClient {
    async fn get_function(&self, name: &str) -> Result<RemoteFunctionState, RemoteError> {
        match self.inner.get_function().function_name(name).send().await {
            Ok(_) => Ok(RemoteFunctionState::Present),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                Ok(RemoteFunctionState::Absent)
            }
            Err(err) => Err(remote_error(err)),
        }
    }

    async fn create_function(&self, request: CreateFunctionRequest) -> Result<(), RemoteError> {
        let definition = &request.definition;
        let code = match request.code {
            CodeReference::Inline(bytes) => {
                FunctionCode::builder().zip_file(Blob::new(bytes)).build()
            }
            CodeReference::Staged { bucket, key } => {
                FunctionCode::builder().s3_bucket(bucket).s3_key(key).build()
            }
        };

        self.inner
            .create_function()
            .function_name(definition.name.as_str())
            .set_description(definition.description.clone())
            .handler(&definition.handler)
            .role(&definition.role)
            .set_timeout(definition.timeout.map(|t| t.seconds() as i32))
            .set_memory_size(definition.memory_size.map(|m| m.megabytes() as i32))
            .set_vpc_config(definition.vpc.as_ref().map(vpc_config))
            .runtime(Runtime::from(request.runtime.as_str()))
            .publish(request.publish)
            .code(code)
            .send()
            .await
            .map(|_| ())
            .map_err(remote_error)
    }

    async fn update_function_code(
        &self,
        request: UpdateFunctionCodeRequest,
    ) -> Result<(), RemoteError> {
        let call = self
            .inner
            .update_function_code()
            .function_name(request.function_name)
            .publish(request.publish);
        let call = match request.code {
            CodeReference::Inline(bytes) => call.zip_file(Blob::new(bytes)),
            CodeReference::Staged { bucket, key } => call.s3_bucket(bucket).s3_key(key),
        };

        call.send().await.map(|_| ()).map_err(remote_error)
    }

    async fn update_function_configuration(
        &self,
        definition: &FunctionDefinition,
    ) -> Result<(), RemoteError> {
        self.inner
            .update_function_configuration()
            .function_name(definition.name.as_str())
            .set_description(definition.description.clone())
            .handler(&definition.handler)
            .role(&definition.role)
            .set_timeout(definition.timeout.map(|t| t.seconds() as i32))
            .set_memory_size(definition.memory_size.map(|m| m.megabytes() as i32))
            .set_vpc_config(definition.vpc.as_ref().map(vpc_config))
            .send()
            .await
            .map(|_| ())
            .map_err(remote_error)
    }

    async fn list_event_source_mappings(
        &self,
        function_name: &str,
        event_source_arn: &str,
    ) -> Result<Vec<EventSourceMapping>, RemoteError> {
        let mut mappings = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .inner
                .list_event_source_mappings()
                .function_name(function_name)
                .event_source_arn(event_source_arn)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(remote_error)?;

            mappings.extend(
                page.event_source_mappings()
                    .iter()
                    .filter_map(|m| m.uuid())
                    .map(|uuid| EventSourceMapping {
                        uuid: uuid.to_string(),
                    }),
            );

            match page.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(mappings)
    }

    async fn create_event_source_mapping(
        &self,
        request: CreateEventSourceMappingRequest,
    ) -> Result<(), RemoteError> {
        let params = &request.params;
        check_mapping_keys(params)?;

        self.inner
            .create_event_source_mapping()
            .set_function_name(str_param(params, "FunctionName")?)
            .set_event_source_arn(str_param(params, "EventSourceArn")?)
            .set_batch_size(int_param(params, "BatchSize")?)
            .set_enabled(bool_param(params, "Enabled")?)
            .set_starting_position(
                str_param(params, "StartingPosition")?
                    .map(|p| EventSourcePosition::from(p.as_str())),
            )
            .set_starting_position_timestamp(timestamp_param(
                params,
                "StartingPositionTimestamp",
            )?)
            .set_maximum_batching_window_in_seconds(int_param(
                params,
                "MaximumBatchingWindowInSeconds",
            )?)
            .set_parallelization_factor(int_param(params, "ParallelizationFactor")?)
            .set_maximum_record_age_in_seconds(int_param(params, "MaximumRecordAgeInSeconds")?)
            .set_bisect_batch_on_function_error(bool_param(params, "BisectBatchOnFunctionError")?)
            .set_maximum_retry_attempts(int_param(params, "MaximumRetryAttempts")?)
            .set_tumbling_window_in_seconds(int_param(params, "TumblingWindowInSeconds")?)
            .set_topics(list_param(params, "Topics")?)
            .set_queues(list_param(params, "Queues")?)
            .set_function_response_types(response_types(params)?)
            .set_filter_criteria(filter_criteria(params)?)
            .set_destination_config(destination_config(params)?)
            .set_scaling_config(scaling_config(params)?)
            .send()
            .await
            .map(|_| ())
            .map_err(remote_error)
    }

    async fn update_event_source_mapping(
        &self,
        uuid: &str,
        batch_size: BatchSize,
    ) -> Result<(), RemoteError> {
        self.inner
            .update_event_source_mapping()
            .uuid(uuid)
            .batch_size(batch_size.value() as i32)
            .send()
            .await
            .map(|_| ())
            .map_err(remote_error)
    }
}

/// S3-backed staging store.
pub struct S3Store {
    inner: aws_sdk_s3::Client,
}

#[async_trait]
impl ObjectStoreClient for S3Store {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), RemoteError> {
        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map(|_| ())
            .map_err(remote_error)
    }
}
