// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tiller decision-and-dispatch layer.

use thiserror::Error;

/// The primary error type used across all Tiller crates.
///
/// Nothing in this layer is fatal to the host process: every variant is
/// caught at a component boundary and degraded to a conservative default
/// (safe classification, rejected descriptor, error tool result, or a
/// generic cache key).
#[derive(Debug, Error)]
pub enum TillerError {
    /// Classification errors (scoring or pattern matching failed).
    /// Converted to the safe-default classification at the classifier boundary.
    #[error("classification error: {0}")]
    Classification(String),

    /// Registry validation errors (malformed schema, unconvertible descriptor).
    #[error("registry error: {message}")]
    Registry { message: String },

    /// Tool execution errors from the external executor.
    #[error("execution error: {message}")]
    Execution {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cache errors (malformed call shape during fingerprinting).
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration errors (invalid TOML, out-of-range thresholds).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TillerError {
    /// Shorthand for an execution error with no underlying source.
    pub fn execution(message: impl Into<String>) -> Self {
        TillerError::Execution {
            message: message.into(),
            source: None,
        }
    }
}
