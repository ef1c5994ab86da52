// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printwerk — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod matchlist;
pub mod types;

pub use config::SessionConfig;
pub use error::PrintwerkError;
pub use matchlist::match_list;
pub use types::*;
