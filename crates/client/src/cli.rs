// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "witrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sync work items, projects and users with a work-item tracker")]
#[command(
    long_about = "Sync work items, projects and users with a work-item tracker.\n\n\
    Local resources are JSON documents in the server's wire shape. Updates send only \
    changed fields, creation is split into size-limited batches, and every request is \
    retried on transient failures."
)]
pub struct Cli {
    /// Read configuration from <path> instead of the user config file
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Override the configured server URL
    #[arg(long, global = true, value_name = "url")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the update a modified resource would send
    #[command(after_help = "\
Examples:
  witrack diff before.json after.json              Print the PATCH body
  witrack diff before.json after.json -t project   Diff two projects")]
    Diff {
        /// Last known server state
        baseline: PathBuf,
        /// Locally modified state
        modified: PathBuf,
        /// Resource type (work_item, project, user)
        #[arg(short = 't', long = "type", default_value = "work_item")]
        resource_type: String,
    },

    /// Show how resources would be split into create requests
    #[command(after_help = "\
Examples:
  witrack plan items.json                      Plan with configured limits
  witrack plan items.json --max-count 10       Cap each request at 10 items
  witrack plan items.json -o json              Machine-readable plan")]
    Plan {
        /// JSON document with the resources to create
        file: PathBuf,
        /// Resource type (work_item, project, user)
        #[arg(short = 't', long = "type", default_value = "work_item")]
        resource_type: String,
        /// Maximum resources per request
        #[arg(long)]
        max_count: Option<usize>,
        /// Maximum request body size in bytes
        #[arg(long)]
        max_bytes: Option<usize>,
        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Create resources on the server
    Push {
        /// JSON document with the resources to create
        file: PathBuf,
        /// Resource type (work_item, project, user)
        #[arg(short = 't', long = "type", default_value = "work_item")]
        resource_type: String,
        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Fetch one resource from the server
    Get {
        /// Resource id
        id: String,
        /// Resource type (work_item, project, user)
        #[arg(short = 't', long = "type", default_value = "work_item")]
        resource_type: String,
    },
}
