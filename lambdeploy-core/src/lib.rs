//! lambdeploy Core Library
//!
//! Reconciliation core for deploying a packaged function to a serverless
//! platform. Decides create vs update, delivers code inline or through an
//! object store, and synchronizes event source mappings.

pub mod client;
pub mod config;
pub mod deploy;
pub mod error;
pub mod event_source;
pub mod stager;
pub mod types;
pub mod upserter;

// Re-export commonly used types
pub use client::{
    CreateEventSourceMappingRequest, CreateFunctionRequest, EventSourceMapping, FsPackageReader,
    Logger, ObjectStoreClient, PackageReader, RemoteComputeClient, RemoteFunctionState,
    TracingLogger, UpdateFunctionCodeRequest,
};
pub use config::{
    ClientConfig, ConfigLoader, DeployConfig, EventSourceBinding, FunctionDefinition,
    StagingTarget, VpcConfig, DEFAULT_RUNTIME,
};
pub use deploy::{DeployOrchestrator, DeployReport};
pub use error::{DeployError, DeployResult, HardValidationError, RemoteError, UpdateStage};
pub use event_source::{EventSourceReconciler, MappingAction, MappingOutcome};
pub use stager::{CodeReference, CodeStager};
pub use types::{BatchSize, FunctionName, MemorySize, Timeout};
pub use upserter::{FunctionAction, FunctionUpserter, UpsertOutcome};
