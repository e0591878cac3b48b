// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! witrack - sync client for a work-item tracker's REST API.
//!
//! This crate wires the sync layer in `witrack-core` to HTTP and provides
//! the `witrack` command-line tool.
//!
//! # Main Components
//!
//! - [`ResourceApi`] - get, batched create, minimal update and delete for one collection
//! - [`HttpTransport`] - reqwest-backed [`Transport`]
//! - [`Config`] - server, token, batch limits and retry budget
//! - [`schemas`] - built-in schemas for work items, projects and users
//! - [`Error`] - Error types for all operations
//!
//! # Updating a work item
//!
//! ```rust,ignore
//! use witrack::{schemas, Config, ResourceApi, HttpTransport};
//!
//! let config = Config::load_default()?;
//! let transport = HttpTransport::new(base_url, config.resolve_token(), config.request_timeout())?;
//! let api = ResourceApi::new(transport, schemas::work_item()?, "workitems")
//!     .with_retry_policy(config.retry_policy());
//!
//! let baseline = api.get("proj/WI-1", &cancel).await?;
//! let mut modified = baseline.clone();
//! modified.attributes.set("status", "closed");
//! api.update(&baseline, &mut modified, &cancel).await?;
//! ```

mod cli;
mod commands;

pub mod api;
pub mod config;
pub mod error;
pub mod schemas;
pub mod transport;

pub use api::{CreateReport, ResourceApi, UpdateOutcome};
pub use cli::{Cli, Command, OutputFormat};
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, Transport};

/// Runs one parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let Cli {
        config,
        base_url,
        command,
    } = cli;

    match command {
        Command::Diff {
            baseline,
            modified,
            resource_type,
        } => commands::diff::run(&baseline, &modified, &resource_type),
        Command::Plan {
            file,
            resource_type,
            max_count,
            max_bytes,
            output,
        } => {
            let config = Config::load_from(config.as_deref())?;
            commands::plan::run(&config, &file, &resource_type, max_count, max_bytes, output)
        }
        Command::Push {
            file,
            resource_type,
            output,
        } => {
            let config = Config::load_from(config.as_deref())?;
            commands::push::run(&config, base_url, &file, &resource_type, output)
        }
        Command::Get { id, resource_type } => {
            let config = Config::load_from(config.as_deref())?;
            commands::get::run(&config, base_url, &id, &resource_type)
        }
    }
}
