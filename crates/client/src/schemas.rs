// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in schemas for the standard resource types.
//!
//! Servers with additional standard fields can build their own [`Schema`];
//! anything not listed here still round-trips through the dynamic bag. The
//! work item `type` attribute is one of those: `type` is reserved for the
//! resource tag, so it always travels as a dynamic field.

use witrack_core::{Result, Schema};

use crate::error::Error;

/// Resource types understood by [`by_name`].
pub const NAMES: &[&str] = &["work_item", "project", "user"];

pub fn work_item() -> Result<Schema> {
    Schema::builder("workitems")
        .text("title")
        .rich("description")
        .text("status")
        .text("severity")
        .text("resolution")
        .timestamp("created")
        .timestamp("updated")
        .timestamp("dueDate")
        .to_one("author")
        .to_many("assignee")
        .to_one("project")
        .to_many("linkedWorkItems")
        .build()
}

pub fn project() -> Result<Schema> {
    Schema::builder("projects")
        .text("name")
        .rich("description")
        .text("trackerPrefix")
        .timestamp("start")
        .timestamp("finish")
        .to_one("lead")
        .build()
}

pub fn user() -> Result<Schema> {
    Schema::builder("users")
        .text("name")
        .text("email")
        .text("initials")
        .rich("description")
        .build()
}

/// Looks up a built-in schema by its command-line name.
pub fn by_name(name: &str) -> crate::Result<Schema> {
    let schema = match name {
        "work_item" | "workitem" | "workitems" => work_item(),
        "project" | "projects" => project(),
        "user" | "users" => user(),
        other => return Err(Error::UnknownResourceType(other.to_string())),
    };
    Ok(schema?)
}

/// Collection path for a schema's resource type.
pub fn collection_path(schema: &Schema) -> String {
    schema.resource_type().to_string()
}

#[cfg(test)]
#[path = "schemas_tests.rs"]
mod tests;
