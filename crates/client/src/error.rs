// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use witrack_core::{RetryError, TransportError};

use crate::config::ConfigError;

/// All possible errors that can occur in the witrack library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] witrack_core::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("request failed: {0}")]
    Request(#[from] RetryError<TransportError>),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("{resource_type} '{id}' not found")]
    NotFound { resource_type: String, id: String },

    #[error("server returned no resource for {operation}")]
    EmptyResponse { operation: &'static str },

    #[error("server returned {returned} resources for a batch of {sent}")]
    BatchMismatch { sent: usize, returned: usize },

    #[error("unknown resource type '{0}'\n  hint: valid types are: work_item, project, user")]
    UnknownResourceType(String),

    #[error("no server configured\n  hint: set base_url in {path} or pass --base-url")]
    NoServer { path: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error is a terminal cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Error::Cancelled => true,
            Error::Request(e) => e.is_cancelled(),
            _ => false,
        }
    }
}

/// A specialized Result type for witrack operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
