// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `lprm` — remove jobs, BSD calling convention.

use clap::Parser;
use ipp::model::Operation;

use printwerk_client::{dests, request, resolve_target, Destinations};
use printwerk_core::types::{JobScope, JobTarget};

use crate::common::{build_session, ConnectionArgs};

const PROG: &str = "lprm";

/// Remove print jobs.
#[derive(Debug, Parser)]
#[command(
    name = "lprm",
    version,
    about = "Remove print jobs",
    disable_help_flag = true
)]
struct Cli {
    /// Connect to the named server and port
    #[arg(short = 'h', value_name = "SERVER[:PORT]")]
    host: Option<String>,

    /// Specify the destination
    #[arg(short = 'P', value_name = "DEST[/INSTANCE]")]
    dest: Option<String>,

    #[command(flatten)]
    conn: ConnectionArgs,

    /// Job ids, or "-" to remove all jobs
    targets: Vec<String>,
}

pub fn run() -> i32 {
    let cli = Cli::parse();
    let session = build_session(cli.host.as_deref(), &cli.conn);

    let dests = match Destinations::fetch(&session) {
        Ok(dests) => dests,
        Err(e) => {
            eprintln!("{PROG}: {e}");
            return 1;
        }
    };

    // The working destination: -P (instance dropped), else the default.
    let selected: Option<String> = match &cli.dest {
        Some(spec) => {
            let (name, _) = dests::split_instance(spec);
            if !dests.contains(name) {
                eprintln!("{PROG}: error - unknown destination \"{name}\"");
                return 1;
            }
            Some(name.to_string())
        }
        None => dests.default_destination().map(|dest| dest.name.clone()),
    };

    let mut failed = false;

    for token in &cli.targets {
        // BSD convention: "-" removes every job on the working destination.
        let target = if token == "-" {
            match &selected {
                Some(dest) => JobTarget::all_on(dest.clone()),
                None => {
                    eprintln!("{PROG}: error - no default destination");
                    return 1;
                }
            }
        } else {
            match resolve_target(token, &dests) {
                Ok(target) => target,
                Err(e) => {
                    eprintln!("{PROG}: error - {e}");
                    return 1;
                }
            }
        };

        if let Err(e) = cancel_target(&session, &target) {
            eprintln!("{PROG}: {e}");
            failed = true;
        }
    }

    // Nothing named: remove the current job on the working destination.
    if cli.targets.is_empty() {
        match &selected {
            Some(dest) => {
                let target = JobTarget::current_on(dest.clone());
                if let Err(e) = cancel_target(&session, &target) {
                    eprintln!("{PROG}: {e}");
                    failed = true;
                }
            }
            None => {
                eprintln!("{PROG}: error - no default destination");
                return 1;
            }
        }
    }

    i32::from(failed)
}

fn cancel_target(
    session: &printwerk_client::Session,
    target: &JobTarget,
) -> printwerk_core::error::Result<()> {
    let op = match target.scope {
        JobScope::All => Operation::CancelJobs,
        _ => Operation::CancelJob,
    };
    let request = request::cancel_request(session, op, target, None, false)?;
    session.send(request, "/jobs/")?;
    Ok(())
}
