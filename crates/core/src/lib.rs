// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! witrack-core: schema-flexible resource sync layer for the witrack client
//!
//! This crate provides the pieces the client composes for every request:
//! the flexible attribute codec, the change-set diff engine, the batch
//! partitioner and the retry executor. Everything except the executor is
//! pure and synchronous.

pub mod batch;
pub mod codec;
pub mod diff;
pub mod error;
pub mod fields;
pub mod resource;
pub mod retry;
pub mod schema;
pub mod transport;

pub use batch::{partition, partition_resources, Batch, BatchLimits, Oversized, Partition};
pub use codec::{Codec, DOCUMENT_ENVELOPE};
pub use diff::{diff, equals, ChangeSet};
pub use error::{Error, Result};
pub use fields::FieldTable;
pub use resource::{
    Arity, AttributeSet, FieldValue, Reference, Relationship, RelationshipSet, Resource,
    TextContent,
};
pub use retry::{execute, RetryError, RetryPolicy, RetryState, Retryable};
pub use schema::{FieldKind, Schema, SchemaBuilder};
pub use transport::{is_retryable_status, TransportError};

pub use tokio_util::sync::CancellationToken;
