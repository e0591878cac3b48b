// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod diff;
pub mod get;
pub mod plan;
pub mod push;

use std::fs;
use std::future::Future;
use std::path::Path;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use witrack_core::{Codec, Resource, Schema};

use crate::api::ResourceApi;
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::schemas::collection_path;
use crate::transport::HttpTransport;

/// Reads a JSON file.
pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Decodes a local document into resources.
///
/// Accepts a `{"data": ...}` document, a bare list of resource objects, or a
/// single resource object.
pub(crate) fn decode_resources(codec: &Codec<'_>, value: &Value) -> Result<Vec<Resource>> {
    if value.get("data").is_some() {
        return Ok(codec.decode_document(value)?);
    }
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                codec
                    .decode_resource(item)
                    .map_err(|e| Error::from(e.at_item(index)))
            })
            .collect(),
        _ => Ok(vec![codec.decode_resource(value)?]),
    }
}

/// Decodes a local document that must hold exactly one resource.
pub(crate) fn decode_single(codec: &Codec<'_>, value: &Value) -> Result<Resource> {
    let mut resources = decode_resources(codec, value)?;
    if resources.len() != 1 {
        return Err(witrack_core::Error::MalformedPayload(format!(
            "expected one resource, found {}",
            resources.len()
        ))
        .into());
    }
    Ok(resources.remove(0))
}

/// Builds the API client for `schema` from configuration.
pub(crate) fn connect(
    config: &Config,
    base_url: Option<String>,
    schema: Schema,
) -> Result<ResourceApi<HttpTransport>> {
    let base_url = base_url
        .or_else(|| config.base_url.clone())
        .ok_or_else(|| Error::NoServer {
            path: config::default_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "config.toml".to_string()),
        })?;
    tracing::debug!(%base_url, resource_type = schema.resource_type(), "connecting");
    let transport = HttpTransport::new(base_url, config.resolve_token(), config.request_timeout())?;
    let path = collection_path(&schema);
    Ok(ResourceApi::new(transport, schema, path)
        .with_limits(config.batch_limits())
        .with_retry_policy(config.retry_policy()))
}

/// Runs `task` to completion on a new runtime, cancelling it on Ctrl-C.
pub(crate) fn block_on<T, F, Fut>(task: F) -> Result<T>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, cancelling");
                on_signal.cancel();
            }
        });
        let result = task(cancel).await;
        match result {
            Err(e) if e.is_cancelled() => Err(Error::Cancelled),
            other => other,
        }
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
