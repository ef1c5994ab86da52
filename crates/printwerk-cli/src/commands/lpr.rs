// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `lpr` — submit files (or stdin) for printing.

use std::path::PathBuf;

use clap::Parser;

use printwerk_client::{dests, submit, Destinations};
use printwerk_core::types::Destination;

use crate::common::{build_session, ConnectionArgs};

const PROG: &str = "lpr";

/// Print files.
#[derive(Debug, Parser)]
#[command(
    name = "lpr",
    version,
    about = "Print files",
    disable_help_flag = true
)]
struct Cli {
    /// Connect to the named server and port
    #[arg(short = 'H', value_name = "SERVER[:PORT]")]
    host: Option<String>,

    /// Number of copies to print
    #[arg(short = '#', value_name = "COPIES", value_parser = clap::value_parser!(u32).range(1..))]
    copies: Option<u32>,

    /// Printer-specific option
    #[arg(short = 'o', value_name = "OPTION[=VALUE]", action = clap::ArgAction::Append)]
    options: Vec<String>,

    /// Print the file without filtering
    #[arg(short = 'l')]
    raw: bool,

    /// Prettyprint text files
    #[arg(short = 'p')]
    prettyprint: bool,

    /// Suppress the banner page
    #[arg(short = 'h')]
    no_banner: bool,

    /// Send an email notification when the job completes
    #[arg(short = 'm')]
    mail: bool,

    /// Hold the job for printing
    #[arg(short = 'q')]
    hold: bool,

    /// Remove the files after submission
    #[arg(short = 'r')]
    delete_after: bool,

    /// Don't use symlinks (ignored)
    #[arg(short = 's', hide = true)]
    no_symlinks: bool,

    /// Specify the destination
    #[arg(short = 'P', value_name = "DEST[/INSTANCE]")]
    dest: Option<String>,

    /// Specify the job title
    #[arg(short = 'T', value_name = "TITLE")]
    title: Option<String>,

    /// Specify the job name (same as -T)
    #[arg(short = 'J', value_name = "NAME", hide = true)]
    job_name: Option<String>,

    /// Specify the job class (same as -T)
    #[arg(short = 'C', value_name = "CLASS", hide = true)]
    class_name: Option<String>,

    // Legacy BSD format modifiers: accepted, warned about, otherwise
    // ignored.
    #[arg(short = 'c', hide = true)]
    fmt_cifplot: bool,
    #[arg(short = 'd', hide = true)]
    fmt_dvi: bool,
    #[arg(short = 'f', hide = true)]
    fmt_fortran: bool,
    #[arg(short = 'g', hide = true)]
    fmt_plot: bool,
    #[arg(short = 'n', hide = true)]
    fmt_ditroff: bool,
    #[arg(short = 't', hide = true)]
    fmt_troff: bool,
    #[arg(short = 'v', hide = true)]
    fmt_raster: bool,
    #[arg(short = '1', hide = true, value_name = "FONT")]
    troff_font_1: Option<String>,
    #[arg(short = '2', hide = true, value_name = "FONT")]
    troff_font_2: Option<String>,
    #[arg(short = '3', hide = true, value_name = "FONT")]
    troff_font_3: Option<String>,
    #[arg(short = '4', hide = true, value_name = "FONT")]
    troff_font_4: Option<String>,
    #[arg(short = 'i', hide = true, value_name = "COLS")]
    indent: Option<String>,
    #[arg(short = 'w', hide = true, value_name = "COLS")]
    width: Option<String>,

    #[command(flatten)]
    conn: ConnectionArgs,

    /// Files to print (stdin when omitted)
    files: Vec<PathBuf>,
}

pub fn run() -> i32 {
    let cli = Cli::parse();
    let session = build_session(cli.host.as_deref(), &cli.conn);

    warn_legacy_modifiers(&cli);

    let dest = match resolve_destination(&session, &cli) {
        Ok(dest) => dest,
        Err(code) => return code,
    };

    // Every file must be readable before the job is created.
    for path in &cli.files {
        if let Err(e) = std::fs::metadata(path) {
            eprintln!(
                "{PROG}: error - unable to access \"{}\" - {e}",
                path.display()
            );
            return 1;
        }
    }

    let options = assemble_options(&cli, &session, &dest);
    let title = job_title(&cli);

    match submit::submit(&session, &dest.name, &title, &options, &cli.files) {
        Ok(_job_id) => {
            if cli.delete_after {
                for path in &cli.files {
                    let _ = std::fs::remove_file(path);
                }
            }
            0
        }
        Err(e) => {
            eprintln!("{PROG}: {e}");
            1
        }
    }
}

fn resolve_destination(
    session: &printwerk_client::Session,
    cli: &Cli,
) -> std::result::Result<Destination, i32> {
    match &cli.dest {
        Some(spec) => {
            let (name, instance) = dests::split_instance(spec);
            match dests::named(session, name, instance) {
                Ok(Some(dest)) => Ok(dest),
                Ok(None) => {
                    eprintln!("{PROG}: error - the printer or class does not exist");
                    Err(1)
                }
                Err(e) => {
                    eprintln!("{PROG}: {e}");
                    Err(1)
                }
            }
        }
        None => match Destinations::fetch(session) {
            Ok(dests) => match dests.default_destination() {
                Some(dest) => Ok(dest.clone()),
                None => {
                    eprintln!("{PROG}: error - no default destination");
                    Err(1)
                }
            },
            Err(e) => {
                eprintln!("{PROG}: {e}");
                Err(1)
            }
        },
    }
}

/// Explicit options first, then the destination's defaults fill the gaps.
fn assemble_options(
    cli: &Cli,
    session: &printwerk_client::Session,
    dest: &Destination,
) -> Vec<(String, String)> {
    let mut options: Vec<(String, String)> = Vec::new();
    for spec in &cli.options {
        options.extend(dests::parse_options(spec));
    }

    if cli.raw {
        options.push(("raw".into(), "true".into()));
    }
    if cli.prettyprint {
        options.push(("prettyprint".into(), "true".into()));
    }
    if cli.no_banner {
        options.push(("job-sheets".into(), "none".into()));
    }
    if cli.mail {
        let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".into());
        options.push((
            "notify-recipient-uri".into(),
            format!("mailto:{}@{}", session.user(), host),
        ));
    }
    if cli.hold {
        options.push(("job-hold-until".into(), "indefinite".into()));
    }
    if let Some(copies) = cli.copies {
        options.push(("copies".into(), copies.to_string()));
    }

    for (key, value) in &dest.options {
        if !options.iter().any(|(existing, _)| existing == key) {
            options.push((key.clone(), value.clone()));
        }
    }

    options
}

fn job_title(cli: &Cli) -> String {
    cli.title
        .clone()
        .or_else(|| cli.job_name.clone())
        .or_else(|| cli.class_name.clone())
        .or_else(|| {
            cli.files.first().and_then(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| "(stdin)".into())
}

fn warn_legacy_modifiers(cli: &Cli) {
    let modifiers = [
        (cli.fmt_cifplot, 'c'),
        (cli.fmt_dvi, 'd'),
        (cli.fmt_fortran, 'f'),
        (cli.fmt_plot, 'g'),
        (cli.fmt_ditroff, 'n'),
        (cli.fmt_troff, 't'),
        (cli.fmt_raster, 'v'),
        (cli.troff_font_1.is_some(), '1'),
        (cli.troff_font_2.is_some(), '2'),
        (cli.troff_font_3.is_some(), '3'),
        (cli.troff_font_4.is_some(), '4'),
        (cli.indent.is_some(), 'i'),
        (cli.width.is_some(), 'w'),
    ];
    for (used, ch) in modifiers {
        if used {
            eprintln!(
                "{PROG}: warning - \"{ch}\" format modifier not supported - output may not be correct"
            );
        }
    }
}
