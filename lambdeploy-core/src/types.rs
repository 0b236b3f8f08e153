// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Smallest memory size the platform accepts, in MB.
const MIN_MEMORY_MB: u32 = 128;
/// Largest memory size the platform accepts, in MB.
const MAX_MEMORY_MB: u32 = 10_240;
/// Function timeout bounds, in seconds.
const MIN_TIMEOUT_SECS: u32 = 1;
const MAX_TIMEOUT_SECS: u32 = 900;
/// Event source batch size bounds.
const MIN_BATCH_SIZE: u32 = 1;
const MAX_BATCH_SIZE: u32 = 10_000;

/// Validated function name.
/// Must be non-empty, alphanumeric with hyphens/underscores, max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FunctionName(String);

impl FunctionName {
    /// Create a new FunctionName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, HardValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "function_name",
                value: name,
                reason: "Function name cannot be empty".to_string(),
            });
        }

        if name.len() > 64 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "function_name",
                value: name.clone(),
                reason: format!("Function name too long: {} chars (max 64)", name.len()),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(HardValidationError::InvalidFieldValue {
                field: "function_name",
                value: name,
                reason: "Function name must contain only alphanumeric characters, hyphens, and underscores".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for FunctionName {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FunctionName> for String {
    fn from(name: FunctionName) -> Self {
        name.0
    }
}

/// Validated function memory size in megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MemorySize(u32);

impl MemorySize {
    /// Create a new MemorySize with bounds validation.
    pub fn from_mb(mb: u32) -> Result<Self, HardValidationError> {
        if !(MIN_MEMORY_MB..=MAX_MEMORY_MB).contains(&mb) {
            return Err(HardValidationError::MemorySizeOutOfBounds {
                mb,
                min: MIN_MEMORY_MB,
                max: MAX_MEMORY_MB,
            });
        }
        Ok(Self(mb))
    }

    /// Get the memory size in megabytes.
    pub fn megabytes(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MemorySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}MB", self.0)
    }
}

impl TryFrom<u32> for MemorySize {
    type Error = HardValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_mb(value)
    }
}

impl From<MemorySize> for u32 {
    fn from(size: MemorySize) -> Self {
        size.0
    }
}

/// Validated function timeout in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Timeout(u32);

impl Timeout {
    pub fn from_secs(seconds: u32) -> Result<Self, HardValidationError> {
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&seconds) {
            return Err(HardValidationError::TimeoutOutOfBounds {
                seconds,
                min: MIN_TIMEOUT_SECS,
                max: MAX_TIMEOUT_SECS,
            });
        }
        Ok(Self(seconds))
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl TryFrom<u32> for Timeout {
    type Error = HardValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_secs(value)
    }
}

impl From<Timeout> for u32 {
    fn from(timeout: Timeout) -> Self {
        timeout.0
    }
}

/// Validated event source batch size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchSize(u32);

impl BatchSize {
    /// Accepts a raw integer as it appears in a binding.
    pub fn new(size: u64) -> Result<Self, HardValidationError> {
        if size < u64::from(MIN_BATCH_SIZE) || size > u64::from(MAX_BATCH_SIZE) {
            return Err(HardValidationError::BatchSizeOutOfBounds {
                size,
                min: MIN_BATCH_SIZE,
                max: MAX_BATCH_SIZE,
            });
        }
        Ok(Self(size as u32))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_name_valid() {
        assert!(FunctionName::new("my-function").is_ok());
        assert!(FunctionName::new("function_123").is_ok());
        assert!(FunctionName::new("MyFunc").is_ok());
    }

    #[test]
    fn test_function_name_invalid() {
        assert!(FunctionName::new("").is_err());
        assert!(FunctionName::new("a".repeat(65)).is_err());
        assert!(FunctionName::new("func@name").is_err());
        assert!(FunctionName::new("func name").is_err());
        assert!(FunctionName::new("fünf").is_err());
    }

    #[test]
    fn test_memory_size_bounds() {
        assert!(MemorySize::from_mb(128).is_ok());
        assert!(MemorySize::from_mb(10_240).is_ok());
        assert!(MemorySize::from_mb(127).is_err());
        assert!(MemorySize::from_mb(10_241).is_err());
    }

    #[test]
    fn test_timeout_bounds() {
        assert!(Timeout::from_secs(1).is_ok());
        assert!(Timeout::from_secs(900).is_ok());
        assert!(Timeout::from_secs(0).is_err());
        assert!(Timeout::from_secs(901).is_err());
    }

    #[test]
    fn test_batch_size_bounds() {
        assert_eq!(BatchSize::new(10).unwrap().value(), 10);
        assert!(BatchSize::new(0).is_err());
        assert!(BatchSize::new(10_001).is_err());
        assert!(BatchSize::new(u64::MAX).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(MemorySize::from_mb(256).unwrap().to_string(), "256MB");
        assert_eq!(Timeout::from_secs(30).unwrap().to_string(), "30s");
    }
}
