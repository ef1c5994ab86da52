// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report rendering: assembled records in, ordered text lines out.
//
// Everything here is pure so the line formats are testable without a
// server; the commands decide what to fetch and do the printing.  Each
// block renderer takes an optional instance suffix and is called once for
// the primary destination and once per matching user instance.

use chrono::{Local, TimeZone};
use ipp::model::PrinterState;

use printwerk_core::match_list;
use printwerk_core::types::Destination;

use crate::decode::{ClassRecord, JobRecord, PrinterRecord};
use crate::dests::Destinations;

/// Locale-style date for state-change and queue timestamps.
pub fn format_date(timestamp: i64) -> String {
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|date| date.format("%c").to_string())
        .unwrap_or_default()
}

/// Instance names the user defined for a printer.
pub fn matching_instances<'a>(dests: &'a Destinations, printer: &str) -> Vec<&'a str> {
    dests
        .iter()
        .filter(|dest| dest.name.eq_ignore_ascii_case(printer))
        .filter_map(|dest| dest.instance.as_deref())
        .collect()
}

fn display_name(primary: &str, instance: Option<&str>) -> String {
    match instance {
        Some(instance) => format!("{primary}/{instance}"),
        None => primary.to_string(),
    }
}

/// Lines of the acceptance report for one destination (or instance).
pub fn accepting_block(record: &PrinterRecord, instance: Option<&str>) -> Vec<String> {
    let primary = record.name.as_deref().unwrap_or_default();
    let name = display_name(primary, instance);
    let since = format_date(record.state_change_time);

    if record.accepting {
        vec![format!("{name} accepting requests since {since}")]
    } else {
        let reason = record
            .state_message
            .as_deref()
            .filter(|message| !message.is_empty())
            .unwrap_or("reason unknown");
        vec![
            format!("{name} not accepting requests since {since} -"),
            format!("\t{reason}"),
        ]
    }
}

/// Lines of the devices report for one destination (or instance).
pub fn device_block(record: &PrinterRecord, instance: Option<&str>) -> Vec<String> {
    let primary = record.name.as_deref().unwrap_or_default();
    let name = display_name(primary, instance);

    let device = match record.device_uri.as_deref() {
        None => record.uri_supported.clone().unwrap_or_default(),
        Some(device) => device.strip_prefix("file:").unwrap_or(device).to_string(),
    };

    vec![format!("device for {name}: {device}")]
}

/// Lines of the classes report for one class.
pub fn class_block(record: &ClassRecord) -> Vec<String> {
    let name = record.name.as_deref().unwrap_or_default();
    let mut lines = vec![format!("members of class {name}:")];

    match &record.member_names {
        Some(members) if !members.is_empty() => {
            lines.extend(members.iter().map(|member| format!("\t{member}")));
        }
        _ => lines.push("\tunknown".to_string()),
    }

    lines
}

/// The default-destination report.  `env_mismatch` carries the environment
/// variable and name when the environment names a destination that does not
/// exist.
pub fn default_block(
    dest: Option<&Destination>,
    env_mismatch: Option<(&str, &str)>,
) -> Vec<String> {
    if let Some(dest) = dest {
        return vec![format!("system default destination: {}", dest.full_name())];
    }
    if let Some((variable, name)) = env_mismatch {
        return vec![format!(
            "error - {variable} environment variable names non-existent destination \"{name}\""
        )];
    }
    vec!["no system default destination".to_string()]
}

/// One line of the destination listing (`-e`): bare name, or the long form
/// with the destination's kind and URIs.
pub fn destination_listing_line(dest: &Destination, long: bool) -> String {
    if !long {
        return dest.full_name();
    }

    let uri_supported = dest.option("printer-uri-supported");
    let kind = if dest.option("printer-is-temporary") == Some("true") {
        "temporary"
    } else if uri_supported.is_some() {
        "permanent"
    } else {
        "network"
    };

    format!(
        "{} {} {} {}",
        dest.full_name(),
        kind,
        uri_supported.unwrap_or("none"),
        dest.option("device-uri").unwrap_or("none"),
    )
}

/// Lines of the printers report for one destination (or instance).
///
/// `current_job` is the id of the job the printer is working on, fetched by
/// the caller when the state is processing.  Verbosity tiers are strictly
/// additive: tier 1 adds description and alerts, tier 2 adds the static
/// information and access-list lines.
pub fn printer_block(
    record: &PrinterRecord,
    instance: Option<&str>,
    long: u8,
    current_job: Option<i32>,
) -> Vec<String> {
    let primary = record.name.as_deref().unwrap_or_default();
    let name = display_name(primary, instance);
    let since = format_date(record.state_change_time);
    let mut lines = Vec::new();

    match record.state {
        PrinterState::Idle => {
            if record.state_reasons.iter().any(|r| r == "hold-new-jobs") {
                lines.push(format!(
                    "printer {name} is holding new jobs.  enabled since {since}"
                ));
            } else {
                lines.push(format!("printer {name} is idle.  enabled since {since}"));
            }
        }
        PrinterState::Processing => lines.push(format!(
            "printer {name} now printing {primary}-{}.  enabled since {since}",
            current_job.unwrap_or(0)
        )),
        PrinterState::Stopped => {
            lines.push(format!("printer {name} disabled since {since} -"));
        }
    }

    let message = record
        .state_message
        .as_deref()
        .filter(|message| !message.is_empty());
    if message.is_some() || matches!(record.state, PrinterState::Stopped) {
        match message {
            Some(message) => lines.push(format!("\t{message}")),
            None => lines.push("\treason unknown".to_string()),
        }
    }

    if long > 1 {
        lines.push("\tForm mounted:".to_string());
        lines.push("\tContent types: any".to_string());
        lines.push("\tPrinter types: unknown".to_string());
    }

    if long > 0 {
        lines.push(format!(
            "\tDescription: {}",
            record.info.as_deref().unwrap_or_default()
        ));
        if !record.state_reasons.is_empty() {
            lines.push(format!("\tAlerts: {}", record.state_reasons.join(" ")));
        }
    }

    if long > 1 {
        lines.push(format!(
            "\tLocation: {}",
            record.location.as_deref().unwrap_or_default()
        ));
        lines.push("\tOn fault: no alert".to_string());
        lines.push("\tAfter fault: continue".to_string());

        match (&record.allowed_users, &record.denied_users) {
            (Some(users), _) => {
                lines.push("\tUsers allowed:".to_string());
                lines.extend(users.iter().map(|user| format!("\t\t{user}")));
            }
            (None, Some(users)) => {
                lines.push("\tUsers denied:".to_string());
                lines.extend(users.iter().map(|user| format!("\t\t{user}")));
            }
            (None, None) => {
                lines.push("\tUsers allowed:".to_string());
                lines.push("\t\t(all)".to_string());
            }
        }

        lines.push("\tForms allowed:".to_string());
        lines.push("\t\t(none)".to_string());
        lines.push("\tBanner required".to_string());
        lines.push("\tCharset sets:".to_string());
        lines.push("\t\t(none)".to_string());
        lines.push("\tDefault pitch:".to_string());
        lines.push("\tDefault page size:".to_string());
        lines.push("\tDefault port settings:".to_string());
    }

    lines
}

/// The whole jobs report: every identified record in response order,
/// filtered by destination and user lists.
///
/// The ranking counter starts at 0 and is pre-incremented for every job
/// seen, whether or not the filters let it display — queue position, not
/// display position.
pub fn jobs_report(
    records: &[JobRecord],
    dest_filter: Option<&str>,
    user_filter: Option<&str>,
    ranking: bool,
    use_completed_time: bool,
    long: u8,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rank: u32 = 0;

    for record in records {
        if !record.is_identified() {
            continue;
        }

        rank += 1;

        if !match_list(dest_filter, record.dest.as_deref()) {
            continue;
        }
        if !match_list(user_filter, record.user.as_deref()) {
            continue;
        }

        lines.extend(job_block(
            record,
            ranking.then_some(rank),
            use_completed_time,
            long,
        ));
    }

    lines
}

/// Lines of the jobs report for one job.  `rank` is the traversal-order
/// counter when ranking was requested; `use_completed_time` selects which
/// timestamp dates the line.
pub fn job_block(
    record: &JobRecord,
    rank: Option<u32>,
    use_completed_time: bool,
    long: u8,
) -> Vec<String> {
    let dest = record.dest.as_deref().unwrap_or_default();
    let id_name = format!("{dest}-{}", record.id);
    let user = record.user.as_deref().unwrap_or("unknown");
    let bytes = 1024.0 * f64::from(record.size_kb);
    let date = format_date(if use_completed_time {
        record.time_at_completed
    } else {
        record.time_at_creation
    });

    let mut lines = vec![match rank {
        Some(rank) => format!("{rank:>3} {id_name:<21} {user:<13} {bytes:>8.0} {date}"),
        None => format!("{id_name:<23} {user:<13} {bytes:>8.0}   {date}"),
    }];

    if long > 0 {
        if let Some(message) = record.printer_state_message.as_deref() {
            lines.push(format!("\tStatus: {message}"));
        }
        if !record.state_reasons.is_empty() {
            lines.push(format!("\tAlerts: {}", record.state_reasons.join(" ")));
        }
        lines.push(format!("\tqueued for {dest}"));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printer(name: &str) -> PrinterRecord {
        PrinterRecord {
            name: Some(name.to_string()),
            ..PrinterRecord::default()
        }
    }

    fn job(id: i32, dest: &str, user: &str) -> JobRecord {
        JobRecord {
            id,
            dest: Some(dest.to_string()),
            user: Some(user.to_string()),
            size_kb: 4,
            ..JobRecord::default()
        }
    }

    #[test]
    fn accepting_block_formats_both_states() {
        let mut record = printer("office");
        let lines = accepting_block(&record, None);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("office accepting requests since "));

        record.accepting = false;
        let lines = accepting_block(&record, None);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("office not accepting requests since "));
        assert_eq!(lines[1], "\treason unknown");

        record.state_message = Some("queue drained".into());
        let lines = accepting_block(&record, None);
        assert_eq!(lines[1], "\tqueue drained");
    }

    #[test]
    fn instance_lines_reuse_the_primary_fields() {
        let record = printer("office");
        let lines = accepting_block(&record, Some("duplex"));
        assert!(lines[0].starts_with("office/duplex accepting requests since "));
    }

    #[test]
    fn device_block_strips_file_prefix() {
        let mut record = printer("office");
        record.device_uri = Some("file:/dev/null".into());
        assert_eq!(device_block(&record, None), vec!["device for office: /dev/null"]);

        record.device_uri = Some("socket://10.0.0.9:9100".into());
        assert_eq!(
            device_block(&record, None),
            vec!["device for office: socket://10.0.0.9:9100"]
        );

        record.device_uri = None;
        record.uri_supported = Some("ipp://server/printers/office".into());
        assert_eq!(
            device_block(&record, None),
            vec!["device for office: ipp://server/printers/office"]
        );
    }

    #[test]
    fn class_block_lists_members_or_unknown() {
        let mut record = ClassRecord {
            name: Some("frontdesk".into()),
            ..ClassRecord::default()
        };
        assert_eq!(
            class_block(&record),
            vec!["members of class frontdesk:", "\tunknown"]
        );

        record.member_names = Some(vec!["office".into(), "lab".into()]);
        assert_eq!(
            class_block(&record),
            vec!["members of class frontdesk:", "\toffice", "\tlab"]
        );
    }

    #[test]
    fn default_block_variants() {
        let mut dest = Destination::new("office");
        dest.instance = Some("duplex".into());
        assert_eq!(
            default_block(Some(&dest), None),
            vec!["system default destination: office/duplex"]
        );

        assert_eq!(
            default_block(None, Some(("LPDEST", "gone"))),
            vec!["error - LPDEST environment variable names non-existent destination \"gone\""]
        );

        assert_eq!(default_block(None, None), vec!["no system default destination"]);
    }

    #[test]
    fn printer_block_states() {
        let mut record = printer("office");
        let lines = printer_block(&record, None, 0, None);
        assert!(lines[0].starts_with("printer office is idle.  enabled since "));

        record.state = PrinterState::Processing;
        let lines = printer_block(&record, None, 0, Some(17));
        assert!(lines[0].starts_with("printer office now printing office-17."));

        record.state = PrinterState::Stopped;
        let lines = printer_block(&record, None, 0, None);
        assert!(lines[0].starts_with("printer office disabled since "));
        assert_eq!(lines[1], "\treason unknown");
    }

    #[test]
    fn hold_new_jobs_renders_the_holding_variant() {
        let mut record = printer("office");
        record.state_reasons = vec!["hold-new-jobs".into()];
        let lines = printer_block(&record, None, 0, None);
        assert!(lines[0].starts_with("printer office is holding new jobs."));
    }

    #[test]
    fn printer_block_tiers_are_additive() {
        let mut record = printer("office");
        record.info = Some("front desk".into());
        record.state_reasons = vec!["toner-low".into(), "cover-open".into()];

        let base = printer_block(&record, None, 0, None).len();
        let described = printer_block(&record, None, 1, None);
        let full = printer_block(&record, None, 2, None);

        assert!(described.len() > base);
        assert!(full.len() > described.len());
        assert!(described.contains(&"\tDescription: front desk".to_string()));
        assert!(described.contains(&"\tAlerts: toner-low cover-open".to_string()));
        assert!(full.contains(&"\tUsers allowed:".to_string()));
        assert!(full.contains(&"\t\t(all)".to_string()));
    }

    #[test]
    fn printer_block_access_lists() {
        let mut record = printer("office");
        record.allowed_users = Some(vec!["pat".into(), "kim".into()]);
        let lines = printer_block(&record, None, 2, None);
        assert!(lines.contains(&"\t\tpat".to_string()));
        assert!(lines.contains(&"\t\tkim".to_string()));

        record.allowed_users = None;
        record.denied_users = Some(vec!["mallory".into()]);
        let lines = printer_block(&record, None, 2, None);
        assert!(lines.contains(&"\tUsers denied:".to_string()));
        assert!(lines.contains(&"\t\tmallory".to_string()));
    }

    #[test]
    fn job_block_plain_and_ranked() {
        let record = job(42, "office", "pat");

        let plain = job_block(&record, None, false, 0);
        assert_eq!(plain.len(), 1);
        assert!(plain[0].starts_with("office-42"));
        assert!(plain[0].contains("pat"));
        assert!(plain[0].contains("4096"));

        let ranked = job_block(&record, Some(3), false, 0);
        assert!(ranked[0].starts_with("  3 office-42"));
    }

    #[test]
    fn job_block_long_lines() {
        let mut record = job(42, "office", "pat");
        record.printer_state_message = Some("printing page 3".into());
        record.state_reasons = vec!["job-printing".into()];

        let lines = job_block(&record, None, false, 1);
        assert_eq!(lines[1], "\tStatus: printing page 3");
        assert_eq!(lines[2], "\tAlerts: job-printing");
        assert_eq!(lines[3], "\tqueued for office");
    }

    #[test]
    fn ranking_counts_traversal_order_not_display_order() {
        let records = vec![
            job(1, "office", "pat"),
            job(2, "lab", "kim"),
            job(3, "office", "pat"),
        ];

        // Only the office jobs display, but the lab job still advanced the
        // counter: ranks are 1 and 3, not 1 and 2.
        let lines = jobs_report(&records, Some("office"), None, true, false, 0);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1 office-1"));
        assert!(lines[1].starts_with("  3 office-3"));
    }

    #[test]
    fn jobs_report_skips_unidentified_records() {
        let records = vec![
            JobRecord {
                id: 9,
                dest: None,
                ..JobRecord::default()
            },
            job(1, "office", "pat"),
        ];

        let lines = jobs_report(&records, None, None, true, false, 0);
        assert_eq!(lines.len(), 1);
        // The incomplete record advanced nothing.
        assert!(lines[0].starts_with("  1 office-1"));
    }

    #[test]
    fn jobs_report_filters_by_user_case_insensitively() {
        let records = vec![job(1, "office", "Pat"), job(2, "office", "kim")];
        let lines = jobs_report(&records, None, Some("pat"), false, false, 0);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("office-1"));
    }

    #[test]
    fn matching_instances_are_case_insensitive_on_name() {
        let mut plain = Destination::new("Office");
        plain.instance = None;
        let mut duplex = Destination::new("office");
        duplex.instance = Some("duplex".into());
        let mut other = Destination::new("lab");
        other.instance = Some("draft".into());

        let dests = Destinations::from_vec(vec![plain, duplex, other]);
        assert_eq!(matching_instances(&dests, "OFFICE"), vec!["duplex"]);
    }

    #[test]
    fn destination_listing_long_form() {
        let mut dest = Destination::new("office");
        assert_eq!(destination_listing_line(&dest, false), "office");
        assert_eq!(
            destination_listing_line(&dest, true),
            "office network none none"
        );

        dest.options
            .insert("printer-uri-supported".into(), "ipp://s/printers/office".into());
        dest.options
            .insert("device-uri".into(), "usb://printer".into());
        assert_eq!(
            destination_listing_line(&dest, true),
            "office permanent ipp://s/printers/office usb://printer"
        );

        dest.options
            .insert("printer-is-temporary".into(), "true".into());
        assert!(destination_listing_line(&dest, true).contains(" temporary "));
    }
}
