// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Destination administration: pwaccept, pwreject, pwenable, pwdisable.
//
// One implementation, four verbs.  The verb fixes the base operation;
// --hold and --release swap in the hold-new-jobs variants.

use clap::{CommandFactory, FromArgMatches, Parser};
use ipp::model::Operation;

use printwerk_client::request;

use crate::common::{build_session, ConnectionArgs};

/// Which administrative command this binary is acting as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminVerb {
    Accept,
    Reject,
    Enable,
    Disable,
}

impl AdminVerb {
    pub fn prog(self) -> &'static str {
        match self {
            Self::Accept => "pwaccept",
            Self::Reject => "pwreject",
            Self::Enable => "pwenable",
            Self::Disable => "pwdisable",
        }
    }

    fn op(self) -> Operation {
        match self {
            Self::Accept => Operation::CupsAcceptJobs,
            Self::Reject => Operation::CupsRejectJobs,
            Self::Enable => Operation::ResumePrinter,
            Self::Disable => Operation::PausePrinter,
        }
    }

    fn about(self) -> &'static str {
        match self {
            Self::Accept => "Accept jobs on destinations",
            Self::Reject => "Reject jobs on destinations",
            Self::Enable => "Start destinations",
            Self::Disable => "Stop destinations",
        }
    }
}

#[derive(Debug, Parser)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Connect to the named server and port
    #[arg(short = 'h', value_name = "SERVER[:PORT]")]
    host: Option<String>,

    /// Reason message that others can see
    #[arg(short = 'r', value_name = "REASON")]
    reason: Option<String>,

    /// Cancel all jobs on the destinations as well
    #[arg(short = 'c')]
    cancel: bool,

    /// Hold new jobs instead of stopping the destination
    #[arg(long)]
    hold: bool,

    /// Release previously held jobs instead of starting the destination
    #[arg(long)]
    release: bool,

    #[command(flatten)]
    conn: ConnectionArgs,

    /// Destinations to administer
    destinations: Vec<String>,
}

pub fn run(verb: AdminVerb) -> i32 {
    let matches = Cli::command()
        .name(verb.prog())
        .about(verb.about())
        .get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let session = build_session(cli.host.as_deref(), &cli.conn);
    let prog = verb.prog();

    let op = if cli.hold {
        Operation::HoldNewJobs
    } else if cli.release {
        Operation::ReleaseHeldNewJobs
    } else {
        verb.op()
    };

    let mut failed = false;

    for dest in &cli.destinations {
        let outcome = request::admin_request(&session, op, dest, cli.reason.as_deref())
            .and_then(|request| session.send(request, "/admin/"));
        if let Err(e) = outcome {
            eprintln!("{prog}: operation failed: {e}");
            failed = true;
            continue;
        }

        if cli.cancel {
            let outcome = request::cancel_all_request(dest)
                .and_then(|request| session.send(request, "/admin/"));
            if let Err(e) = outcome {
                eprintln!("{prog}: {e}");
                failed = true;
            }
        }
    }

    i32::from(failed)
}
