// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Printwerk.

use thiserror::Error;

/// Top-level error type for all Printwerk operations.
#[derive(Debug, Error)]
pub enum PrintwerkError {
    // -- Resolution errors --
    #[error("unknown destination \"{0}\"")]
    UnknownDestination(String),

    #[error("invalid destination name in list \"{0}\"")]
    InvalidDestinationList(String),

    #[error("no default destination")]
    NoDefaultDestination,

    // -- Transport errors --
    #[error("unable to connect to server: {0}")]
    Connect(String),

    #[error("IPP request failed: {0}")]
    IppRequest(String),

    // -- Protocol errors --
    //
    // The server accepted the connection but the operation came back with a
    // status above successful-ok-conflicting-attributes.  The payload is the
    // server-provided message shown to the operator verbatim.
    #[error("{0}")]
    IppStatus(String),

    #[error("scheduler is not running")]
    SchedulerNotRunning,

    // -- Local errors --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintwerkError>;
