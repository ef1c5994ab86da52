// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `cancel` — cancel or purge jobs named by id or destination.

use clap::Parser;
use ipp::model::Operation;
use tracing::warn;

use printwerk_client::{request, resolve_target, Destinations};
use printwerk_core::types::JobScope;

use crate::common::{build_session, ConnectionArgs};

const PROG: &str = "cancel";

/// Cancel print jobs.
#[derive(Debug, Parser)]
#[command(
    name = "cancel",
    version,
    about = "Cancel print jobs",
    disable_help_flag = true
)]
struct Cli {
    /// Cancel all jobs
    #[arg(short = 'a')]
    all: bool,

    /// Connect to the named server and port
    #[arg(short = 'h', value_name = "SERVER[:PORT]")]
    host: Option<String>,

    /// Cancel jobs owned by this user only
    #[arg(short = 'u', value_name = "OWNER")]
    owner: Option<String>,

    /// Purge jobs rather than just cancelling
    #[arg(short = 'x')]
    purge: bool,

    #[command(flatten)]
    conn: ConnectionArgs,

    /// Job ids, destinations, or "-" for the current job
    targets: Vec<String>,
}

pub fn run() -> i32 {
    let cli = Cli::parse();
    let session = build_session(cli.host.as_deref(), &cli.conn);

    // An owner override without -a still means "that user's jobs", not the
    // single current job.
    let base_op = if cli.all {
        if cli.purge {
            Operation::PurgeJobs
        } else {
            Operation::CancelJobs
        }
    } else if cli.owner.is_some() {
        Operation::CancelMyJobs
    } else {
        Operation::CancelJob
    };

    let mut failed = false;

    if !cli.targets.is_empty() {
        // Resolution needs the destination list; if it cannot be fetched the
        // numeric target forms still work.
        let dests = match Destinations::fetch(&session) {
            Ok(dests) => dests,
            Err(e) => {
                warn!(error = %e, "unable to load destinations");
                Destinations::default()
            }
        };

        let mut index = 0;
        while index < cli.targets.len() {
            let token = &cli.targets[index];
            index += 1;

            let target = match resolve_target(token, &dests) {
                Ok(target) => target,
                Err(e) => {
                    eprintln!("{PROG}: error - {e}");
                    return 1;
                }
            };

            // Legacy calling convention: a bare job id may be followed by a
            // destination name, which is consumed and ignored.
            if matches!(target.scope, JobScope::Id(_)) && target.dest.is_none() {
                if let Some(next) = cli.targets.get(index) {
                    if dests.contains(next) {
                        index += 1;
                    }
                }
            }

            // An explicit id always cancels that one job, even under -a.
            let op = if matches!(target.scope, JobScope::Id(_)) {
                Operation::CancelJob
            } else {
                base_op
            };
            let resource = cancel_resource(op, cli.owner.as_deref(), session.user());

            let outcome =
                request::cancel_request(&session, op, &target, cli.owner.as_deref(), cli.purge)
                    .and_then(|request| session.send(request, resource));
            if let Err(e) = outcome {
                eprintln!("{PROG}: {} failed: {e}", op_label(op));
                failed = true;
            }
        }
    } else if cli.all || cli.owner.is_some() {
        // Nothing named on the command line: cancel across every destination.
        let outcome =
            request::broadcast_cancel_request(&session, base_op, cli.owner.as_deref(), cli.purge)
                .and_then(|request| session.send(request, "/admin/"));
        if let Err(e) = outcome {
            eprintln!("{PROG}: {} failed: {e}", op_label(base_op));
            failed = true;
        }
    }

    i32::from(failed)
}

/// Blanket cancellations go through the administrative resource unless they
/// are scoped to the acting user's own jobs.
fn cancel_resource(op: Operation, owner: Option<&str>, session_user: &str) -> &'static str {
    let own_jobs_only = owner.is_some_and(|owner| owner.eq_ignore_ascii_case(session_user));
    if matches!(op, Operation::CancelJobs) && !own_jobs_only {
        "/admin/"
    } else {
        "/jobs/"
    }
}

fn op_label(op: Operation) -> &'static str {
    match op {
        Operation::PurgeJobs => "purge-jobs",
        Operation::CancelJobs => "cancel-jobs",
        Operation::CancelMyJobs => "cancel-my-jobs",
        _ => "cancel-job",
    }
}
