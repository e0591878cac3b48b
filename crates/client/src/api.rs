// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resource API: the request glue around the sync core.
//!
//! Provides a high-level interface for:
//! - Fetching one resource
//! - Creating resources in size-limited batches
//! - Updating a resource with only the fields that changed
//! - Deleting resources
//!
//! Every request goes through the retry executor and honours the caller's
//! cancellation token. Creation is not idempotent, so its POSTs are replayed
//! only after failures that prove the server never acted on them.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use witrack_core::{
    diff, execute, partition_resources, BatchLimits, ChangeSet, Codec, Oversized, Resource,
    RetryError, RetryPolicy, Schema, TransportError,
};

use crate::error::{Error, Result};
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Characters escaped in an id path segment: all but RFC 3986 unreserved.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Outcome of [`ResourceApi::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateReport {
    /// Created resources in input order, with server ids and revisions.
    pub created: Vec<Resource>,
    /// Resources too large for any request; never sent.
    pub oversized: Vec<Oversized<Resource>>,
    /// Number of requests issued.
    pub batches: usize,
}

/// Outcome of [`ResourceApi::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Nothing changed; no request was sent.
    Unchanged,
    /// The change set was sent and the response merged.
    Updated(ChangeSet),
}

impl UpdateOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated(_))
    }
}

/// Client for one resource collection.
pub struct ResourceApi<T: Transport> {
    transport: T,
    schema: Schema,
    path: String,
    limits: BatchLimits,
    policy: RetryPolicy<TransportError>,
}

impl<T: Transport> ResourceApi<T> {
    /// An API for the collection at `path` (relative to the transport's base URL).
    pub fn new(transport: T, schema: Schema, path: impl Into<String>) -> Self {
        ResourceApi {
            transport,
            schema,
            path: path.into().trim_matches('/').to_string(),
            limits: BatchLimits::default(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy<TransportError>) -> Self {
        self.policy = policy;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn codec(&self) -> Codec<'_> {
        Codec::new(&self.schema)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn limits(&self) -> &BatchLimits {
        &self.limits
    }

    /// Path of one resource; the id is a single, escaped segment.
    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, utf8_percent_encode(id, SEGMENT))
    }

    /// Fetches one resource by id.
    pub async fn get(&self, id: &str, cancel: &CancellationToken) -> Result<Resource> {
        let response = match self.send(HttpRequest::get(self.item_path(id)), cancel).await {
            Err(Error::Request(RetryError::Rejected { source, .. }))
                if source.status() == Some(404) =>
            {
                return Err(self.not_found(id));
            }
            other => other?,
        };
        let body = response
            .body
            .ok_or(Error::EmptyResponse { operation: "get" })?;
        self.codec()
            .decode_document(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| self.not_found(id))
    }

    /// Creates `resources`, one request per batch.
    ///
    /// Returned ids and revisions are merged into the resources. Resources
    /// too large for a single request are reported in
    /// [`CreateReport::oversized`] and not sent. A failing batch stops the
    /// remaining ones.
    ///
    /// A batch is sent again only when the failure shows it never reached
    /// the server ([`TransportError::is_replay_safe`]). A timeout or a 5xx
    /// other than 503 ends the create, since retrying could duplicate it.
    pub async fn create(
        &self,
        resources: Vec<Resource>,
        cancel: &CancellationToken,
    ) -> Result<CreateReport> {
        let codec = self.codec();
        let post_policy = self.policy.clone().predicate(TransportError::is_replay_safe);
        let total = resources.len();
        let partition = partition_resources(&codec, resources, &self.limits)?;
        for dropped in &partition.oversized {
            tracing::warn!(
                index = dropped.index,
                size = dropped.size,
                max_bytes = self.limits.max_bytes,
                "resource too large for a single request, skipping"
            );
        }

        let batches = partition.batches.len();
        let mut created = Vec::with_capacity(total);
        for (index, batch) in partition.batches.into_iter().enumerate() {
            let body = codec.encode_document(batch.items())?;
            tracing::info!(
                batch = index + 1,
                of = batches,
                count = batch.len(),
                bytes = batch.encoded_size(),
                "creating batch"
            );

            let response = match self
                .send_with(&post_policy, HttpRequest::post(self.path.clone(), body), cancel)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    if index > 0 {
                        tracing::warn!(
                            committed = created.len(),
                            "batch failed after partial create"
                        );
                    }
                    return Err(e);
                }
            };

            let mut items = batch.into_items();
            let returned = response_items(&response, "create")?;
            if returned.len() != items.len() {
                return Err(Error::BatchMismatch {
                    sent: items.len(),
                    returned: returned.len(),
                });
            }
            for (position, (resource, wire)) in items.iter_mut().zip(returned).enumerate() {
                codec
                    .merge_response(resource, wire)
                    .map_err(|e| e.at_item(position))?;
            }
            created.extend(items);
        }

        Ok(CreateReport {
            created,
            oversized: partition.oversized,
            batches,
        })
    }

    /// Sends the fields of `modified` that differ from `baseline`.
    ///
    /// No request is made when nothing changed. Fields emptied in `modified`
    /// are left untouched on the server; use [`ResourceApi::update_with`] with
    /// explicit clears to remove them.
    pub async fn update(
        &self,
        baseline: &Resource,
        modified: &mut Resource,
        cancel: &CancellationToken,
    ) -> Result<UpdateOutcome> {
        let Some(changes) = diff(baseline, modified) else {
            tracing::debug!(id = ?modified.id, "no changes, skipping update");
            return Ok(UpdateOutcome::Unchanged);
        };
        self.update_with(modified, &changes, cancel).await?;
        Ok(UpdateOutcome::Updated(changes))
    }

    /// Sends an explicit change set for `resource` and merges the response.
    pub async fn update_with(
        &self,
        resource: &mut Resource,
        changes: &ChangeSet,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let codec = self.codec();
        let body = codec.encode_change_set(resource, changes)?;
        let id = resource.id.clone().unwrap_or_default();
        tracing::info!(%id, fields = ?changes.field_names(), "updating resource");

        let response = self
            .send(HttpRequest::patch(self.item_path(&id), body), cancel)
            .await?;
        if let Some(data) = response.body.as_ref().and_then(|body| body.get("data")) {
            if data.is_object() {
                codec.merge_response(resource, data)?;
            }
        }
        Ok(())
    }

    /// Deletes the resources with the given ids in one request.
    pub async fn delete(&self, ids: &[String], cancel: &CancellationToken) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let data: Vec<Value> = ids
            .iter()
            .map(|id| json!({"type": self.schema.resource_type(), "id": id}))
            .collect();
        tracing::info!(count = ids.len(), "deleting resources");
        self.send(
            HttpRequest::delete(self.path.clone(), json!({ "data": data })),
            cancel,
        )
        .await?;
        Ok(())
    }

    async fn send(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse> {
        self.send_with(&self.policy, request, cancel).await
    }

    async fn send_with(
        &self,
        policy: &RetryPolicy<TransportError>,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse> {
        let transport = &self.transport;
        let response = execute(policy, cancel, move || transport.send(request.clone())).await?;
        Ok(response)
    }

    fn not_found(&self, id: &str) -> Error {
        Error::NotFound {
            resource_type: self.schema.resource_type().to_string(),
            id: id.to_string(),
        }
    }
}

/// The resource objects under `data` in a response body.
fn response_items<'a>(response: &'a HttpResponse, operation: &'static str) -> Result<&'a [Value]> {
    let body = response
        .body
        .as_ref()
        .ok_or(Error::EmptyResponse { operation })?;
    match body.get("data") {
        Some(Value::Array(items)) => Ok(items),
        Some(item @ Value::Object(_)) => Ok(std::slice::from_ref(item)),
        _ => Err(Error::EmptyResponse { operation }),
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
