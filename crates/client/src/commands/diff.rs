// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use serde_json::Value;
use witrack_core::{diff, Codec};

use super::{decode_single, read_json};
use crate::error::Result;
use crate::schemas;

pub fn run(baseline: &Path, modified: &Path, resource_type: &str) -> Result<()> {
    let output = render(&read_json(baseline)?, &read_json(modified)?, resource_type)?;
    println!("{output}");
    Ok(())
}

/// The update body `modified` would send, or `no changes`.
///
/// A modified document without an id or revision inherits the baseline's.
pub(crate) fn render(baseline: &Value, modified: &Value, resource_type: &str) -> Result<String> {
    let schema = schemas::by_name(resource_type)?;
    let codec = Codec::new(&schema);
    let baseline = decode_single(&codec, baseline)?;
    let mut modified = decode_single(&codec, modified)?;
    if modified.id.is_none() {
        modified.id = baseline.id.clone();
    }
    if modified.revision.is_none() {
        modified.revision = baseline.revision.clone();
    }

    match diff(&baseline, &modified) {
        None => Ok("no changes".to_string()),
        Some(changes) => {
            tracing::debug!(fields = ?changes.field_names(), "computed change set");
            let body = codec.encode_change_set(&modified, &changes)?;
            Ok(serde_json::to_string_pretty(&body)?)
        }
    }
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
