// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared command plumbing: connection options, session construction, and
// tracing setup.

use clap::Args;

use printwerk_client::Session;
use printwerk_core::SessionConfig;

/// Diagnostics go to stderr so report output on stdout stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Options every command accepts.
///
/// The commands use `-h` (or `-H`) for the server address, so the automatic
/// short help flag is disabled per command and `--help` re-added here.
#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Encrypt the connection to the server
    #[arg(short = 'E')]
    pub encrypt: bool,

    /// Username to use for authentication
    #[arg(short = 'U', value_name = "USERNAME")]
    pub user: Option<String>,

    /// Print help
    #[arg(long = "help", action = clap::ArgAction::Help)]
    help: Option<bool>,
}

/// Build the session for one invocation: environment defaults, then the
/// server flag, then the shared connection options.
pub fn build_session(host: Option<&str>, conn: &ConnectionArgs) -> Session {
    let mut config = SessionConfig::from_env();
    if let Some(host) = host {
        config.set_server(host);
    }
    if conn.encrypt {
        config.require_encryption();
    }
    if let Some(user) = &conn.user {
        config.set_user(user);
    }
    Session::new(config)
}
