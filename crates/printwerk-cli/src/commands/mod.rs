// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod admin;
pub mod cancel;
pub mod lpmove;
pub mod lpr;
pub mod lprm;
pub mod lpstat;
