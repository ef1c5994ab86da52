// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `lpstat` — status reports: printers, classes, jobs, devices, defaults.
//
// Each report builds one request, decodes the grouped response, filters
// with the name-list matcher, and prints the rendered lines.  Reports run
// in the composite (-t) order; a report failure sets the exit status but
// does not stop the remaining reports.

use clap::Parser;
use ipp::model::{DelimiterTag, JobState, PrinterState};
use ipp::prelude::Uri;

use printwerk_client::decode::{assemble_classes, assemble_jobs, assemble_printers, GroupCursor};
use printwerk_client::{dests, report, request, ClassRecord, Destinations, Session};
use printwerk_core::error::Result;
use printwerk_core::types::WhichJobs;
use printwerk_core::{match_list, PrintwerkError};

use crate::common::{build_session, ConnectionArgs};

const PROG: &str = "lpstat";

/// Show status information.
#[derive(Debug, Parser)]
#[command(
    name = "lpstat",
    version,
    about = "Show printer, class, and job status",
    disable_help_flag = true
)]
struct Cli {
    /// Show description sub-lines
    #[arg(short = 'D')]
    description: bool,

    /// Show the default server and port
    #[arg(short = 'H')]
    server: bool,

    /// Show paper types (not supported)
    #[arg(short = 'P', hide = true)]
    paper: bool,

    /// Show the ranking of jobs
    #[arg(short = 'R')]
    ranking: bool,

    /// Show charsets (not supported)
    #[arg(
        short = 'S',
        hide = true,
        num_args = 0..=1,
        default_missing_value = "",
        value_name = "CHARSETS"
    )]
    charsets: Option<String>,

    /// Show completed, not-completed, or all jobs
    #[arg(short = 'W', value_name = "WHICH", value_parser = ["completed", "not-completed", "all"])]
    which: Option<String>,

    /// Show the accepting state of destinations
    #[arg(short = 'a', num_args = 0..=1, default_missing_value = "", value_name = "DESTS")]
    accepting: Option<String>,

    /// Show classes and their member printers
    #[arg(short = 'c', num_args = 0..=1, default_missing_value = "", value_name = "CLASSES")]
    classes: Option<String>,

    /// Show the default destination
    #[arg(short = 'd')]
    default_dest: bool,

    /// Show available destinations
    #[arg(short = 'e')]
    list_dests: bool,

    /// Show forms (not supported)
    #[arg(
        short = 'f',
        hide = true,
        num_args = 0..=1,
        default_missing_value = "",
        value_name = "FORMS"
    )]
    forms: Option<String>,

    /// Connect to the named server and port
    #[arg(short = 'h', value_name = "SERVER[:PORT]")]
    host: Option<String>,

    /// Show verbose (long) output
    #[arg(short = 'l')]
    long: bool,

    /// Show jobs for the named destinations
    #[arg(short = 'o', num_args = 0..=1, default_missing_value = "", value_name = "DESTS")]
    jobs_for: Option<String>,

    /// Show the processing state of destinations
    #[arg(short = 'p', num_args = 0..=1, default_missing_value = "", value_name = "PRINTERS")]
    printers: Option<String>,

    /// Show whether the scheduler is running
    #[arg(short = 'r')]
    scheduler: bool,

    /// Show a status summary
    #[arg(short = 's')]
    summary: bool,

    /// Show all status information
    #[arg(short = 't')]
    all_info: bool,

    /// Show jobs queued by the named users
    #[arg(short = 'u', num_args = 0..=1, default_missing_value = "", value_name = "USERS")]
    users: Option<String>,

    /// Show the devices for each destination
    #[arg(short = 'v', num_args = 0..=1, default_missing_value = "", value_name = "PRINTERS")]
    devices: Option<String>,

    #[command(flatten)]
    conn: ConnectionArgs,

    /// Destinations whose jobs to show
    dest_args: Vec<String>,
}

pub fn run() -> i32 {
    let cli = Cli::parse();
    let session = build_session(cli.host.as_deref(), &cli.conn);

    let long: u8 = if cli.long {
        2
    } else if cli.description {
        1
    } else {
        0
    };
    let which = cli
        .which
        .as_deref()
        .and_then(WhichJobs::from_keyword)
        .unwrap_or_default();

    let any_op = cli.server
        || cli.paper
        || cli.charsets.is_some()
        || cli.forms.is_some()
        || cli.accepting.is_some()
        || cli.classes.is_some()
        || cli.default_dest
        || cli.list_dests
        || cli.jobs_for.is_some()
        || cli.printers.is_some()
        || cli.scheduler
        || cli.summary
        || cli.all_info
        || cli.users.is_some()
        || cli.devices.is_some()
        || !cli.dest_args.is_empty();

    let mut status = 0;

    // Scheduler reachability comes first; a silent scheduler ends the run.
    if cli.scheduler || cli.all_info {
        if session.ping() {
            println!("scheduler is running");
        } else {
            println!("scheduler is not running");
            return status;
        }
    }

    if cli.server {
        println!("{}", session.server_display());
    }

    let needs_dests = cli.accepting.is_some()
        || cli.classes.is_some()
        || cli.default_dest
        || cli.list_dests
        || cli.jobs_for.is_some()
        || cli.printers.is_some()
        || cli.summary
        || cli.all_info
        || cli.devices.is_some();
    let dests = if needs_dests {
        match Destinations::fetch(&session) {
            Ok(dests) => dests,
            Err(e) => {
                eprintln!("{PROG}: {e}");
                return 1;
            }
        }
    } else {
        Destinations::default()
    };

    // A filter naming an unknown destination is a hard error before any
    // report request goes out.
    for filter in [&cli.accepting, &cli.classes, &cli.jobs_for, &cli.printers, &cli.devices]
        .into_iter()
        .flatten()
    {
        if let Err(e) = check_filter(filter, &dests) {
            eprintln!("{PROG}: {e}");
            return 1;
        }
    }

    if cli.default_dest || cli.summary || cli.all_info {
        print_lines(&show_default(&dests));
    }

    if cli.list_dests {
        for dest in dests.iter() {
            println!("{}", report::destination_listing_line(dest, long > 0));
        }
    }

    if cli.classes.is_some() || cli.summary || cli.all_info {
        let filter = if cli.summary || cli.all_info {
            None
        } else {
            filter_of(&cli.classes)
        };
        status |= run_report(show_classes(&session, filter));
    }

    if cli.devices.is_some() || cli.summary || cli.all_info {
        let filter = if cli.summary || cli.all_info {
            None
        } else {
            filter_of(&cli.devices)
        };
        status |= run_report(show_devices(&session, &dests, filter));
    }

    if cli.accepting.is_some() || cli.all_info {
        status |= run_report(show_accepting(&session, &dests, filter_of(&cli.accepting)));
    }

    if cli.printers.is_some() || cli.all_info {
        status |= run_report(show_printers(
            &session,
            &dests,
            filter_of(&cli.printers),
            long,
        ));
    }

    // Jobs: one pass per -o filter / positional destination, then the user
    // report, then the composite/default pass.
    let mut ran_jobs = false;
    if let Some(filter) = filter_of(&cli.jobs_for) {
        status |= run_report(show_jobs(&session, Some(filter), None, long, cli.ranking, which));
        ran_jobs = true;
    } else if cli.jobs_for.is_some() {
        status |= run_report(show_jobs(&session, None, None, long, cli.ranking, which));
        ran_jobs = true;
    }
    for dest_arg in &cli.dest_args {
        status |= run_report(show_jobs(
            &session,
            Some(dest_arg.as_str()),
            None,
            long,
            cli.ranking,
            which,
        ));
        ran_jobs = true;
    }
    if cli.users.is_some() {
        status |= run_report(show_jobs(
            &session,
            None,
            filter_of(&cli.users),
            long,
            cli.ranking,
            which,
        ));
        ran_jobs = true;
    }
    if cli.all_info && !ran_jobs {
        status |= run_report(show_jobs(&session, None, None, long, cli.ranking, which));
    }
    if !any_op {
        let user = session.user().to_string();
        status |= run_report(show_jobs(
            &session,
            None,
            Some(user.as_str()),
            long,
            cli.ranking,
            which,
        ));
    }

    status
}

/// Treat an empty value or the literal "all" as "no filter".
fn filter_of(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|filter| !filter.is_empty() && *filter != "all")
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn run_report(outcome: Result<Vec<String>>) -> i32 {
    match outcome {
        Ok(lines) => {
            print_lines(&lines);
            0
        }
        Err(e) => {
            eprintln!("{PROG}: {e}");
            1
        }
    }
}

/// Verify every name in a filter list exists before a report runs.
fn check_filter(filter: &str, dests: &Destinations) -> Result<()> {
    for token in filter.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() || token == "all" {
            continue;
        }
        let (name, instance) = dests::split_instance(token);
        let known = match instance {
            Some(instance) => dests.find(name, Some(instance)).is_some(),
            None => dests.contains(name),
        };
        if !known {
            return Err(PrintwerkError::UnknownDestination(token.to_string()));
        }
    }
    Ok(())
}

fn show_default(dests: &Destinations) -> Vec<String> {
    let default = dests.default_destination();
    let mismatch = if default.is_none() {
        dests::env_default()
    } else {
        None
    };
    report::default_block(
        default,
        mismatch.as_ref().map(|(var, name)| (*var, name.as_str())),
    )
}

fn show_accepting(
    session: &Session,
    dests: &Destinations,
    filter: Option<&str>,
) -> Result<Vec<String>> {
    let request = request::get_printers_request(session, request::ACCEPTING_ATTRS);
    let response = session.send(request, "/")?;

    let mut lines = Vec::new();
    for record in assemble_printers(response.attributes()) {
        let Some(name) = record.name.clone() else {
            continue;
        };
        if !match_list(filter, Some(name.as_str())) {
            continue;
        }
        lines.extend(report::accepting_block(&record, None));
        for instance in report::matching_instances(dests, &name) {
            lines.extend(report::accepting_block(&record, Some(instance)));
        }
    }
    Ok(lines)
}

fn show_devices(
    session: &Session,
    dests: &Destinations,
    filter: Option<&str>,
) -> Result<Vec<String>> {
    let request = request::get_printers_request(session, request::DEVICE_ATTRS);
    let response = session.send(request, "/")?;

    let mut lines = Vec::new();
    for record in assemble_printers(response.attributes()) {
        let Some(name) = record.name.clone() else {
            continue;
        };
        if !match_list(filter, Some(name.as_str())) {
            continue;
        }
        lines.extend(report::device_block(&record, None));
        for instance in report::matching_instances(dests, &name) {
            lines.extend(report::device_block(&record, Some(instance)));
        }
    }
    Ok(lines)
}

fn show_printers(
    session: &Session,
    dests: &Destinations,
    filter: Option<&str>,
    long: u8,
) -> Result<Vec<String>> {
    let request = request::get_printers_request(session, request::PRINTER_ATTRS);
    let response = session.send(request, "/")?;

    let mut lines = Vec::new();
    for record in assemble_printers(response.attributes()) {
        let Some(name) = record.name.clone() else {
            continue;
        };
        if !match_list(filter, Some(name.as_str())) {
            continue;
        }

        // A printer that is working needs its active job id for the
        // "now printing" line.
        let current_job = if matches!(record.state, PrinterState::Processing) {
            active_job_id(session, &name)
        } else {
            None
        };

        lines.extend(report::printer_block(&record, None, long, current_job));
        for instance in report::matching_instances(dests, &name) {
            lines.extend(report::printer_block(&record, Some(instance), long, current_job));
        }
    }
    Ok(lines)
}

fn active_job_id(session: &Session, printer: &str) -> Option<i32> {
    let request = request::get_jobs_request(
        session,
        Some(printer),
        request::ACTIVE_JOB_ATTRS,
        WhichJobs::NotCompleted,
    )
    .ok()?;
    let response = session.send(request, "/").ok()?;
    assemble_jobs(response.attributes())
        .into_iter()
        .find(|job| matches!(job.state, JobState::Processing))
        .map(|job| job.id)
}

fn show_classes(session: &Session, filter: Option<&str>) -> Result<Vec<String>> {
    let request = request::get_classes_request(session, request::CLASS_ATTRS);
    let response = session.send(request, "/")?;

    let mut lines = Vec::new();
    for mut record in assemble_classes(response.attributes()) {
        let Some(name) = record.name.clone() else {
            continue;
        };
        if !match_list(filter, Some(name.as_str())) {
            continue;
        }
        // A remote class reports no members here; ask its home server.
        if record.member_names.is_none() && record.uri_supported.is_some() {
            fetch_remote_members(session, &mut record);
        }
        lines.extend(report::class_block(&record));
    }
    Ok(lines)
}

fn fetch_remote_members(session: &Session, record: &mut ClassRecord) {
    let Some(uri) = record.uri_supported.clone() else {
        return;
    };
    let Ok(parsed) = uri.parse::<Uri>() else {
        return;
    };

    let host = parsed.host().unwrap_or("localhost").to_string();
    let port = parsed
        .port_u16()
        .unwrap_or(printwerk_core::config::DEFAULT_PORT);

    let remote;
    let target = if host.eq_ignore_ascii_case(&session.config().host) {
        session
    } else {
        let mut config = session.config().clone();
        config.host = host;
        config.port = port;
        remote = Session::new(config);
        &remote
    };

    let Ok(request) = request::get_printer_attributes_request(&uri, request::CLASS_ATTRS) else {
        return;
    };
    let Ok(response) = target.send(request, "/") else {
        return;
    };

    let mut cursor = GroupCursor::new(response.attributes());
    if let Some(group) = cursor.next_group(DelimiterTag::PrinterAttributes) {
        record.member_names = ClassRecord::from_group(group).member_names;
    }
}

fn show_jobs(
    session: &Session,
    dest_filter: Option<&str>,
    user_filter: Option<&str>,
    long: u8,
    ranking: bool,
    which: WhichJobs,
) -> Result<Vec<String>> {
    let request = request::get_jobs_request(session, None, request::JOB_ATTRS, which)?;
    let response = session.send(request, "/")?;

    let records = assemble_jobs(response.attributes());
    Ok(report::jobs_report(
        &records,
        dest_filter,
        user_filter,
        ranking,
        which.uses_completed_time(),
        long,
    ))
}
