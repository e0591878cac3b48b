// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for witrack-core operations.

use thiserror::Error;

/// All possible errors that can occur while encoding, decoding, diffing or
/// partitioning resources.
#[derive(Debug, Error)]
pub enum Error {
    #[error("field '{field}' is both a known and a dynamic field\n  hint: custom fields must not reuse a schema field name")]
    FieldCollision { field: String },

    #[error("field '{field}' is not declared by the {resource_type} schema")]
    UnknownField {
        field: String,
        resource_type: String,
    },

    #[error("invalid value for field '{field}': expected {expected}")]
    FieldType {
        field: String,
        expected: &'static str,
    },

    #[error("invalid value for field '{field}': {reason}")]
    FieldValue { field: String, reason: String },

    #[error("field '{field}' cannot be both set and cleared in one change set")]
    ConflictingClear { field: String },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("resource type mismatch: expected '{expected}', got '{actual}'")]
    TypeMismatch { expected: String, actual: String },

    #[error("{resource_type} resource has no id\n  hint: only resources returned by the server can be updated")]
    MissingId { resource_type: String },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("invalid batch limits: {0}")]
    InvalidLimits(String),

    #[error("item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attaches the position of the offending item in a caller-supplied list.
    pub fn at_item(self, index: usize) -> Self {
        Error::Item {
            index,
            source: Box::new(self),
        }
    }
}

/// A specialized Result type for witrack-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
