// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use witrack_core::{partition, BatchLimits, Codec};

use super::{decode_resources, read_json};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::schemas;

#[derive(Debug, Serialize)]
struct PlanReport {
    total: usize,
    max_count: usize,
    max_bytes: usize,
    batches: Vec<PlannedBatch>,
    oversized: Vec<SkippedItem>,
}

#[derive(Debug, Serialize)]
struct PlannedBatch {
    count: usize,
    bytes: usize,
    items: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct SkippedItem {
    index: usize,
    bytes: usize,
}

pub fn run(
    config: &Config,
    file: &Path,
    resource_type: &str,
    max_count: Option<usize>,
    max_bytes: Option<usize>,
    output: OutputFormat,
) -> Result<()> {
    let mut limits = config.batch_limits();
    if let Some(max_count) = max_count {
        limits.max_count = max_count;
    }
    if let Some(max_bytes) = max_bytes {
        limits.max_bytes = max_bytes;
    }
    let text = render(&read_json(file)?, resource_type, &limits, output)?;
    print!("{text}");
    Ok(())
}

/// Describes the create requests `value` would be split into.
pub(crate) fn render(
    value: &Value,
    resource_type: &str,
    limits: &BatchLimits,
    output: OutputFormat,
) -> Result<String> {
    let schema = schemas::by_name(resource_type)?;
    let codec = Codec::new(&schema);
    let resources = decode_resources(&codec, value)?;
    let total = resources.len();

    let plan = partition(resources.iter().enumerate(), limits, |(_, resource)| {
        codec.encoded_size(resource)
    })?;
    let report = PlanReport {
        total,
        max_count: limits.max_count,
        max_bytes: limits.max_bytes,
        batches: plan
            .batches
            .iter()
            .map(|batch| PlannedBatch {
                count: batch.len(),
                bytes: batch.encoded_size(),
                items: batch.items().iter().map(|(index, _)| *index).collect(),
            })
            .collect(),
        oversized: plan
            .oversized
            .iter()
            .map(|skipped| SkippedItem {
                index: skipped.index,
                bytes: skipped.size,
            })
            .collect(),
    };

    match output {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&report)?)),
        OutputFormat::Text => Ok(format_text(&report)),
    }
}

fn format_text(report: &PlanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} in {} (max {} per request, {} bytes)",
        plural(report.total, "resource"),
        plural(report.batches.len(), "request"),
        report.max_count,
        report.max_bytes
    );
    for (number, batch) in report.batches.iter().enumerate() {
        let _ = writeln!(
            out,
            "  request {}: {}, {} bytes",
            number + 1,
            plural(batch.count, "resource"),
            batch.bytes
        );
    }
    if !report.oversized.is_empty() {
        let _ = writeln!(
            out,
            "skipped {} too large to send:",
            plural(report.oversized.len(), "resource")
        );
        for skipped in &report.oversized {
            let _ = writeln!(out, "  item {}: {} bytes", skipped.index, skipped.bytes);
        }
    }
    out
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
