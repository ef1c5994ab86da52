// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

fn main() {
    printwerk_cli::common::init_tracing();
    std::process::exit(printwerk_cli::commands::lpmove::run());
}
