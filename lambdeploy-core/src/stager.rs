// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Code delivery: inline payload or staged object.
//!
//! Platforms reject inline packages past a size threshold, so a deploy file
//! may name an object store target instead. Either way the result is a
//! [`CodeReference`] that create and update calls accept unchanged.

use std::fmt;

use crate::client::ObjectStoreClient;
use crate::config::DeployConfig;
use crate::error::{DeployError, DeployResult};

/// How the package reaches the platform. Exactly one variant is active.
#[derive(Clone, PartialEq, Eq)]
pub enum CodeReference {
    /// The literal package bytes.
    Inline(Vec<u8>),
    /// A pointer to a package already written to the object store.
    Staged { bucket: String, key: String },
}

impl fmt::Debug for CodeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(bytes) => write!(f, "Inline({} bytes)", bytes.len()),
            Self::Staged { bucket, key } => write!(f, "Staged(s3://{}/{})", bucket, key),
        }
    }
}

impl fmt::Display for CodeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(bytes) => write!(f, "inline ({} bytes)", bytes.len()),
            Self::Staged { bucket, key } => write!(f, "s3://{}/{}", bucket, key),
        }
    }
}

/// Resolves the code delivery path for a deploy.
pub struct CodeStager<'a> {
    store: &'a dyn ObjectStoreClient,
}

impl<'a> CodeStager<'a> {
    pub fn new(store: &'a dyn ObjectStoreClient) -> Self {
        Self { store }
    }

    /// Stage the package if the config names a target, else pass it inline.
    ///
    /// At most one object store write is issued.
    pub async fn stage(&self, package: Vec<u8>, config: &DeployConfig) -> DeployResult<CodeReference> {
        let Some(target) = &config.staging else {
            tracing::debug!(bytes = package.len(), "Delivering package inline");
            return Ok(CodeReference::Inline(package));
        };

        let bucket = target.bucket.clone();
        let key = target.effective_key(&config.function.name);

        tracing::info!(bucket = %bucket, key = %key, bytes = package.len(), "Staging package in object store");

        self.store
            .put_object(&bucket, &key, package)
            .await
            .map_err(|source| DeployError::Upload {
                bucket: bucket.clone(),
                key: key.clone(),
                source,
            })?;

        Ok(CodeReference::Staged { bucket, key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_payload() {
        let inline = CodeReference::Inline(vec![0u8; 2048]);
        assert_eq!(format!("{:?}", inline), "Inline(2048 bytes)");
    }

    #[test]
    fn test_display_staged() {
        let staged = CodeReference::Staged {
            bucket: "my-bucket".to_string(),
            key: "fn1.zip".to_string(),
        };
        assert_eq!(staged.to_string(), "s3://my-bucket/fn1.zip");
    }
}
