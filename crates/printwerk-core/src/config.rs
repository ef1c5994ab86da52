// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-invocation connection settings.
//
// Every operation receives these through an explicit session object rather
// than process-global state, so one invocation cannot leak server/user
// settings into another code path.

use serde::{Deserialize, Serialize};

/// Default IPP port.
pub const DEFAULT_PORT: u16 = 631;

/// Connection settings for one command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Acting user attached to every request as requesting-user-name.
    pub user: String,
    /// Require an encrypted connection (`-E`).
    pub encrypt: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: DEFAULT_PORT,
            user: "unknown".into(),
            encrypt: false,
        }
    }
}

impl SessionConfig {
    /// Resolve settings from the environment: CUPS_SERVER (host[:port]),
    /// IPP_PORT, and USER/USERNAME, falling back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("IPP_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        if let Ok(server) = std::env::var("CUPS_SERVER") {
            if !server.is_empty() {
                config.set_server(&server);
            }
        }

        if let Ok(user) = std::env::var("USER").or_else(|_| std::env::var("USERNAME")) {
            if !user.is_empty() {
                config.user = user;
            }
        }

        config
    }

    /// Set the server from a `host[:port]` string (`-h`).
    ///
    /// An IPv6 literal keeps its colons unless a `]:port` suffix is present.
    pub fn set_server(&mut self, server: &str) {
        if let Some(rest) = server.strip_prefix('[') {
            // [v6]:port or [v6]
            if let Some((host, port)) = rest.rsplit_once("]:") {
                self.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.port = port;
                }
            } else {
                self.host = rest.trim_end_matches(']').to_string();
            }
            return;
        }

        match server.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) && !port.is_empty() => {
                self.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.port = port;
                }
            }
            _ => self.host = server.to_string(),
        }
    }

    /// Set the acting user (`-U`).
    pub fn set_user(&mut self, user: &str) {
        self.user = user.to_string();
    }

    /// Require encryption for all requests (`-E`).
    pub fn require_encryption(&mut self) {
        self.encrypt = true;
    }
}
