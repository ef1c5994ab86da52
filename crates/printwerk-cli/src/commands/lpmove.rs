// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `lpmove` — move a job, or every job of a queue, to another destination.

use clap::Parser;

use printwerk_client::{request, resolve_target, Destinations};

use crate::common::{build_session, ConnectionArgs};

const PROG: &str = "lpmove";

/// Move jobs between destinations.
#[derive(Debug, Parser)]
#[command(
    name = "lpmove",
    version,
    about = "Move jobs to a new destination",
    disable_help_flag = true
)]
struct Cli {
    /// Connect to the named server and port
    #[arg(short = 'h', value_name = "SERVER[:PORT]")]
    host: Option<String>,

    #[command(flatten)]
    conn: ConnectionArgs,

    /// Job id, "queue-id" form, or source queue
    source: String,

    /// Destination queue
    dest: String,
}

pub fn run() -> i32 {
    let cli = Cli::parse();
    let session = build_session(cli.host.as_deref(), &cli.conn);

    if cli.source == "-" {
        eprintln!("{PROG}: error - need a job id or source destination");
        return 1;
    }

    let dests = match Destinations::fetch(&session) {
        Ok(dests) => dests,
        Err(e) => {
            eprintln!("{PROG}: {e}");
            return 1;
        }
    };

    let source = match resolve_target(&cli.source, &dests) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("{PROG}: error - {e}");
            return 1;
        }
    };

    let outcome = request::move_request(&session, &source, &cli.dest)
        .and_then(|request| session.send(request, "/jobs"));
    match outcome {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("{PROG}: {e}");
            1
        }
    }
}
