// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use witrack::Cli;

fn main() {
    let cli = Cli::parse();
    setup_logging();
    if let Err(e) = witrack::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Logs to stderr so stdout stays machine-readable. `RUST_LOG` overrides.
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
