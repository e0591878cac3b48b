// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport failures as seen by the retry executor.
//!
//! The transport glue maps whatever its HTTP stack reports onto
//! [`TransportError`]; the executor only needs to know whether a failure is
//! transient.
//!
//! Transient is not the same as safe to send again. A timeout or a 502 may
//! arrive after the server acted on the request, so non-idempotent requests
//! retry only on [`TransportError::is_replay_safe`] failures.

use crate::retry::Retryable;

/// Error type for a single request attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No connection could be established; the request was never sent.
    #[error("cannot connect: {0}")]
    Connect(String),

    /// The connection failed after the request may have been sent.
    #[error("network error: {0}")]
    Network(String),

    /// No response within the request timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response arrived but could not be read.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// The HTTP status, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server refused the request because of the request itself.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Whether the failure proves the server did not act on the request.
    ///
    /// True for connection failures and for 425, 429 and 503, which servers
    /// return before processing. Use as the retry predicate for requests
    /// that must not be applied twice.
    pub fn is_replay_safe(&self) -> bool {
        match self {
            TransportError::Connect(_) => true,
            TransportError::Status { status, .. } => matches!(status, 425 | 429 | 503),
            _ => false,
        }
    }
}

impl Retryable for TransportError {
    fn is_retryable(&self) -> bool {
        match self {
            TransportError::Connect(_) | TransportError::Network(_) | TransportError::Timeout => {
                true
            }
            TransportError::Status { status, .. } => is_retryable_status(*status),
            TransportError::InvalidResponse(_) => false,
        }
    }
}

/// Statuses worth retrying: request timeout, too early, rate limiting and
/// transient server errors.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 425 | 429 | 500 | 502 | 503 | 504)
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
