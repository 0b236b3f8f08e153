// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for lambdeploy.
//!
//! Every failure in a deploy is terminal and strongly typed. Nothing is
//! retried and nothing is rolled back; the first error short-circuits the
//! remaining sequence and is handed back to the caller.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{BatchSize, FunctionName};

/// Top-level error type for a deploy call.
#[derive(Debug, Error)]
pub enum DeployError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Package & Staging Errors
    // =========================================================================
    #[error("Error reading specified package \"{}\": {source}", .path.display())]
    PackageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload to s3://{bucket}/{key} failed: {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: RemoteError,
    },

    // =========================================================================
    // Function Resource Errors
    // =========================================================================
    #[error("Existence probe for function {function} failed: {source}")]
    Probe {
        function: FunctionName,
        #[source]
        source: RemoteError,
    },

    #[error("Create function {function} failed: {source}")]
    Create {
        function: FunctionName,
        #[source]
        source: RemoteError,
    },

    #[error("Update function {stage} for {function} failed: {source}")]
    Update {
        function: FunctionName,
        stage: UpdateStage,
        #[source]
        source: RemoteError,
    },

    // =========================================================================
    // Event Source Mapping Errors
    // =========================================================================
    #[error("List event source mappings for {function} on {event_source_arn} failed: {source}")]
    ListMappings {
        function: String,
        event_source_arn: String,
        #[source]
        source: RemoteError,
    },

    #[error("Create event source mapping for {function} on {event_source_arn} failed: {source}")]
    CreateMapping {
        function: String,
        event_source_arn: String,
        #[source]
        source: RemoteError,
    },

    #[error("Update event source mapping {uuid} (batch size {batch_size}) failed: {source}")]
    UpdateMapping {
        uuid: String,
        batch_size: BatchSize,
        #[source]
        source: RemoteError,
    },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl DeployError {
    /// One-line hint pointing at the likely fix, written to the deploy logger.
    pub fn remediation(&self) -> String {
        match self {
            Self::HardValidation(e) => format!("Invalid deploy configuration: {}", e),
            Self::ConfigNotFound { path } => {
                format!("Deploy configuration not found at \"{}\"", path.display())
            }
            Self::ConfigParse { message } => format!("Deploy configuration is malformed: {}", message),
            Self::PackageRead { path, .. } => {
                format!("Error reading specified package \"{}\"", path.display())
            }
            Self::Upload { bucket, key, .. } => format!(
                "Package upload to s3://{}/{} failed. Check your s3:PutObject permissions.",
                bucket, key
            ),
            Self::Probe { .. } => {
                "AWS API request failed. Check your AWS credentials and permissions.".to_string()
            }
            Self::Create { .. } => {
                "Create function failed. Check your iam:PassRole permissions.".to_string()
            }
            Self::Update {
                stage: UpdateStage::Code,
                ..
            } => "Package upload failed. Check your iam:PassRole permissions.".to_string(),
            Self::Update {
                stage: UpdateStage::Configuration,
                ..
            } => "Update function configuration failed.".to_string(),
            Self::ListMappings { .. } => {
                "List event source mapping failed, please make sure you have permission".to_string()
            }
            Self::CreateMapping { .. } => "Failed to create event source mapping!".to_string(),
            Self::UpdateMapping { .. } => "Update event source mapping failed".to_string(),
            Self::Io { context, .. } => format!("IO failure while {}", context),
        }
    }
}

/// Which half of the update branch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    /// Code push; configuration was never attempted.
    Code,
    /// Configuration push; the new code is already live.
    Configuration,
}

impl std::fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code => write!(f, "code"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Failure reported by a remote capability (compute platform or object store).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("service error {code}: {message}")]
    Service { code: String, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    /// Rejected locally before anything was sent.
    #[error("invalid request parameter: {0}")]
    InvalidParameter(String),
}

/// Configuration validation errors.
/// A deploy never starts with an invalid configuration.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Missing required field: {field} in {context}")]
    MissingRequiredField {
        field: &'static str,
        context: String,
    },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Memory size out of bounds: {mb}MB (min: {min}, max: {max})")]
    MemorySizeOutOfBounds { mb: u32, min: u32, max: u32 },

    #[error("Timeout out of bounds: {seconds}s (min: {min}, max: {max})")]
    TimeoutOutOfBounds { seconds: u32, min: u32, max: u32 },

    #[error("Batch size out of bounds: {size} (min: {min}, max: {max})")]
    BatchSizeOutOfBounds { size: u64, min: u32, max: u32 },

    #[error("Invalid event source at index {index}: {reason}")]
    InvalidEventSource { index: usize, reason: String },
}

/// Result type alias using DeployError.
pub type DeployResult<T> = Result<T, DeployError>;
