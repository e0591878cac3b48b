// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Greedy batch partitioning under count and byte limits.
//!
//! Items are assigned to batches in input order. A batch is closed as soon
//! as the next item would push it over either limit. The byte estimate of a
//! batch is the envelope overhead plus every item's encoded size plus one
//! separator between consecutive items, so the estimate matches the size of
//! the request body actually sent.
//!
//! An item that cannot fit even in an otherwise empty batch is not sent. It
//! is returned in [`Partition::oversized`] with its input index, and the
//! remaining items are still partitioned.

use crate::codec::{Codec, DOCUMENT_ENVELOPE};
use crate::error::{Error, Result};
use crate::resource::Resource;

/// Size and count limits for one request batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    /// Maximum number of items per batch.
    pub max_count: usize,
    /// Maximum encoded size of a batch in bytes, envelope included.
    pub max_bytes: usize,
    /// Fixed bytes of the enclosing document.
    pub envelope_overhead: usize,
    /// Bytes added between two consecutive items.
    pub separator_overhead: usize,
}

impl BatchLimits {
    /// Limits for `{"data":[...]}` documents with comma-separated items.
    pub fn new(max_count: usize, max_bytes: usize) -> Self {
        BatchLimits {
            max_count,
            max_bytes,
            envelope_overhead: DOCUMENT_ENVELOPE.len(),
            separator_overhead: 1,
        }
    }

    pub fn with_envelope_overhead(mut self, bytes: usize) -> Self {
        self.envelope_overhead = bytes;
        self
    }

    pub fn with_separator_overhead(mut self, bytes: usize) -> Self {
        self.separator_overhead = bytes;
        self
    }

    /// Checks that at least one item could ever be placed in a batch.
    pub fn validate(&self) -> Result<()> {
        if self.max_count == 0 {
            return Err(Error::InvalidLimits("max_count must be at least 1".into()));
        }
        if self.max_bytes <= self.envelope_overhead {
            return Err(Error::InvalidLimits(format!(
                "max_bytes ({}) must exceed the envelope overhead ({})",
                self.max_bytes, self.envelope_overhead
            )));
        }
        Ok(())
    }
}

impl Default for BatchLimits {
    fn default() -> Self {
        BatchLimits::new(100, 2 * 1024 * 1024)
    }
}

/// An ordered group of items submitted in one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    items: Vec<T>,
    encoded_size: usize,
}

impl<T> Batch<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Estimated encoded size in bytes, envelope included.
    pub fn encoded_size(&self) -> usize {
        self.encoded_size
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An item excluded because it is larger than any batch may be.
#[derive(Debug, Clone, PartialEq)]
pub struct Oversized<T> {
    /// Position of the item in the input.
    pub index: usize,
    /// Encoded size of the item alone.
    pub size: usize,
    pub item: T,
}

/// Result of [`partition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub batches: Vec<Batch<T>>,
    pub oversized: Vec<Oversized<T>>,
}

impl<T> Partition<T> {
    /// Number of items placed in batches.
    pub fn batched_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }

    /// Whether every input item was placed in a batch.
    pub fn is_complete(&self) -> bool {
        self.oversized.is_empty()
    }
}

/// Partitions `items` into batches within `limits`.
///
/// `size_of` returns the encoded size of a single item; an error from it
/// aborts the partition and is tagged with the item's index.
pub fn partition<T, F>(
    items: impl IntoIterator<Item = T>,
    limits: &BatchLimits,
    mut size_of: F,
) -> Result<Partition<T>>
where
    F: FnMut(&T) -> Result<usize>,
{
    limits.validate()?;

    let mut batches = Vec::new();
    let mut oversized = Vec::new();
    let mut current: Vec<T> = Vec::new();
    let mut current_size = limits.envelope_overhead;

    for (index, item) in items.into_iter().enumerate() {
        let size = size_of(&item).map_err(|e| e.at_item(index))?;

        if limits.envelope_overhead + size > limits.max_bytes {
            oversized.push(Oversized { index, size, item });
            continue;
        }

        let fits = current.is_empty()
            || (current.len() < limits.max_count
                && current_size + limits.separator_overhead + size <= limits.max_bytes);

        if fits {
            if !current.is_empty() {
                current_size += limits.separator_overhead;
            }
        } else {
            batches.push(Batch {
                items: std::mem::take(&mut current),
                encoded_size: current_size,
            });
            current_size = limits.envelope_overhead;
        }
        current_size += size;
        current.push(item);
    }

    if !current.is_empty() {
        batches.push(Batch {
            items: current,
            encoded_size: current_size,
        });
    }

    Ok(Partition { batches, oversized })
}

/// Partitions resources by their compact JSON encoding.
pub fn partition_resources(
    codec: &Codec<'_>,
    resources: Vec<Resource>,
    limits: &BatchLimits,
) -> Result<Partition<Resource>> {
    partition(resources, limits, |resource| codec.encoded_size(resource))
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
