// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printwerk CLI — one module per command, shared option handling, and thin
// binary wrappers under src/bin/.

pub mod commands;
pub mod common;
