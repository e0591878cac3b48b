// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write;
use std::path::Path;

use witrack_core::Codec;

use super::{block_on, connect, decode_resources, read_json};
use crate::api::CreateReport;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::schemas;

pub fn run(
    config: &Config,
    base_url: Option<String>,
    file: &Path,
    resource_type: &str,
    output: OutputFormat,
) -> Result<()> {
    let schema = schemas::by_name(resource_type)?;
    let resources = decode_resources(&Codec::new(&schema), &read_json(file)?)?;
    let api = connect(config, base_url, schema)?;

    let client = &api;
    let report = block_on(|cancel| async move { client.create(resources, &cancel).await })?;
    for skipped in &report.oversized {
        eprintln!(
            "warning: item {} not sent: {} bytes exceeds the {} byte request limit",
            skipped.index,
            skipped.size,
            config.batch.max_bytes
        );
    }

    print!("{}", render(&api.codec(), &report, output)?);
    Ok(())
}

/// Created ids one per line, or the created resources as a document.
pub(crate) fn render(codec: &Codec<'_>, report: &CreateReport, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => {
            let document = codec.encode_document(&report.created)?;
            Ok(format!("{}\n", serde_json::to_string_pretty(&document)?))
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for resource in &report.created {
                let _ = writeln!(out, "{}", resource.id.as_deref().unwrap_or("-"));
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
