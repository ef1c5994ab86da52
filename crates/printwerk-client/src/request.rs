// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request builders for every operation the commands issue.
//
// Addressing rules: job-scoped operations with a known id carry a job-uri;
// job-scoped operations with only a destination carry printer-uri + job-id
// and let the server resolve "current job"; printer-scoped operations always
// carry a printer-uri.  Every request carries the acting user.  Invalid
// combinations are unrepresentable here, not user-facing errors.

use ipp::model::Operation;
use ipp::prelude::*;

use printwerk_core::error::Result;
use printwerk_core::types::{JobScope, JobTarget, WhichJobs};

use crate::session::Session;

/// Attributes fetched for the acceptance report.
pub const ACCEPTING_ATTRS: &[&str] = &[
    "printer-name",
    "printer-state-change-time",
    "printer-state-message",
    "printer-is-accepting-jobs",
];

/// Attributes fetched for the devices report.
pub const DEVICE_ATTRS: &[&str] = &["printer-name", "printer-uri-supported", "device-uri"];

/// Attributes fetched for the classes report.
pub const CLASS_ATTRS: &[&str] = &["printer-name", "printer-uri-supported", "member-names"];

/// Attributes fetched for the printers report.
pub const PRINTER_ATTRS: &[&str] = &[
    "printer-name",
    "printer-state",
    "printer-state-message",
    "printer-state-reasons",
    "printer-state-change-time",
    "printer-type",
    "printer-info",
    "printer-location",
    "printer-make-and-model",
    "printer-uri-supported",
    "requesting-user-name-allowed",
    "requesting-user-name-denied",
];

/// Attributes fetched for the jobs report.
pub const JOB_ATTRS: &[&str] = &[
    "job-id",
    "job-k-octets",
    "job-name",
    "job-originating-user-name",
    "job-printer-state-message",
    "job-printer-uri",
    "job-state-reasons",
    "time-at-creation",
    "time-at-completed",
];

/// Attributes fetched when looking for a printer's active job.
pub const ACTIVE_JOB_ATTRS: &[&str] = &["job-id", "job-state"];

/// Attributes fetched when listing destinations by name.
pub const DEST_NAME_ATTRS: &[&str] = &["printer-name"];

/// Attributes fetched when building the destination list.
pub const DEST_LIST_ATTRS: &[&str] = &[
    "printer-name",
    "printer-uri-supported",
    "device-uri",
    "printer-is-temporary",
];

fn new_request(op: Operation, uri: Option<Uri>) -> IppRequestResponse {
    IppRequestResponse::new(IppVersion::v1_1(), op, uri)
}

fn add_operation_attr(request: &mut IppRequestResponse, attribute: IppAttribute) {
    request
        .attributes_mut()
        .add(DelimiterTag::OperationAttributes, attribute);
}

fn requesting_user(user: &str) -> IppAttribute {
    IppAttribute::new(
        "requesting-user-name",
        IppValue::NameWithoutLanguage(user.to_string()),
    )
}

fn requested_attributes(names: &[&str]) -> IppAttribute {
    IppAttribute::new(
        "requested-attributes",
        IppValue::Array(
            names
                .iter()
                .map(|name| IppValue::Keyword((*name).to_string()))
                .collect(),
        ),
    )
}

/// Cancel/purge the job(s) named by `target`.
///
/// An explicit `owner` override restricts the request to that user's own
/// jobs and upgrades a blanket cancel-all (or purge-all) to its my-jobs-only
/// variant.
pub fn cancel_request(
    session: &Session,
    op: Operation,
    target: &JobTarget,
    owner: Option<&str>,
    purge: bool,
) -> Result<IppRequestResponse> {
    let op = upgrade_for_owner(op, owner);

    let mut request = match &target.dest {
        Some(dest) => {
            let mut request = new_request(op, Some(Session::printer_uri(dest)?));
            add_operation_attr(
                &mut request,
                IppAttribute::new(
                    IppAttribute::JOB_ID,
                    IppValue::Integer(target.scope.wire_id()),
                ),
            );
            request
        }
        None => {
            let job_id = target.scope.wire_id();
            let mut request = new_request(op, None);
            add_operation_attr(
                &mut request,
                IppAttribute::new("job-uri", IppValue::Uri(Session::job_uri(job_id))),
            );
            request
        }
    };

    add_owner_or_user(&mut request, session, owner);

    if purge {
        add_operation_attr(
            &mut request,
            IppAttribute::new("purge-jobs", IppValue::Boolean(true)),
        );
    }

    Ok(request)
}

/// Cancel/purge across every destination (no target named on the command
/// line).
pub fn broadcast_cancel_request(
    session: &Session,
    op: Operation,
    owner: Option<&str>,
    purge: bool,
) -> Result<IppRequestResponse> {
    let op = upgrade_for_owner(op, owner);
    let mut request = new_request(op, Some(Session::all_printers_uri()?));

    add_owner_or_user(&mut request, session, owner);
    add_operation_attr(
        &mut request,
        IppAttribute::new("purge-jobs", IppValue::Boolean(purge)),
    );

    Ok(request)
}

fn upgrade_for_owner(op: Operation, owner: Option<&str>) -> Operation {
    if owner.is_some() && matches!(op, Operation::CancelJobs | Operation::PurgeJobs) {
        Operation::CancelMyJobs
    } else {
        op
    }
}

fn add_owner_or_user(request: &mut IppRequestResponse, session: &Session, owner: Option<&str>) {
    match owner {
        Some(owner) => {
            add_operation_attr(request, requesting_user(owner));
            add_operation_attr(
                request,
                IppAttribute::new("my-jobs", IppValue::Boolean(true)),
            );
        }
        None => add_operation_attr(request, requesting_user(session.user())),
    }
}

/// Move a job (or a whole queue) to another destination.
pub fn move_request(
    session: &Session,
    source: &JobTarget,
    target_dest: &str,
) -> Result<IppRequestResponse> {
    let mut request = match source.scope {
        JobScope::Id(job_id) => {
            let mut request = new_request(Operation::CupsMoveJob, None);
            add_operation_attr(
                &mut request,
                IppAttribute::new("job-uri", IppValue::Uri(Session::job_uri(job_id))),
            );
            request
        }
        _ => {
            let dest = source.dest.as_deref().unwrap_or_default();
            new_request(Operation::CupsMoveJob, Some(Session::printer_uri(dest)?))
        }
    };

    add_operation_attr(&mut request, requesting_user(session.user()));
    request.attributes_mut().add(
        DelimiterTag::JobAttributes,
        IppAttribute::new(
            "job-printer-uri",
            IppValue::Uri(Session::printer_uri(target_dest)?.to_string()),
        ),
    );

    Ok(request)
}

/// Accept/reject/pause/resume/hold/release a destination, with an optional
/// operator-visible reason.
pub fn admin_request(
    session: &Session,
    op: Operation,
    dest: &str,
    reason: Option<&str>,
) -> Result<IppRequestResponse> {
    let mut request = new_request(op, Some(Session::printer_uri(dest)?));
    add_operation_attr(&mut request, requesting_user(session.user()));

    if let Some(reason) = reason {
        add_operation_attr(
            &mut request,
            IppAttribute::new(
                "printer-state-message",
                IppValue::TextWithoutLanguage(reason.to_string()),
            ),
        );
    }

    Ok(request)
}

/// Cancel every job on a destination (the `-c` follow-up after disabling).
pub fn cancel_all_request(dest: &str) -> Result<IppRequestResponse> {
    Ok(new_request(
        Operation::CancelJobs,
        Some(Session::printer_uri(dest)?),
    ))
}

/// List printers known to the server.
pub fn get_printers_request(session: &Session, attrs: &[&str]) -> IppRequestResponse {
    let mut request = new_request(Operation::CupsGetPrinters, None);
    add_operation_attr(&mut request, requested_attributes(attrs));
    add_operation_attr(&mut request, requesting_user(session.user()));
    request
}

/// List classes known to the server.
pub fn get_classes_request(session: &Session, attrs: &[&str]) -> IppRequestResponse {
    let mut request = new_request(Operation::CupsGetClasses, None);
    add_operation_attr(&mut request, requested_attributes(attrs));
    add_operation_attr(&mut request, requesting_user(session.user()));
    request
}

/// Ask the server for its default destination.
pub fn get_default_request(session: &Session) -> IppRequestResponse {
    let mut request = new_request(Operation::CupsGetDefault, None);
    add_operation_attr(&mut request, requested_attributes(DEST_NAME_ATTRS));
    add_operation_attr(&mut request, requesting_user(session.user()));
    request
}

/// List jobs, either server-wide or for one destination.
pub fn get_jobs_request(
    session: &Session,
    dest: Option<&str>,
    attrs: &[&str],
    which: WhichJobs,
) -> Result<IppRequestResponse> {
    let uri = match dest {
        Some(dest) => Session::printer_uri(dest)?,
        None => "ipp://localhost/"
            .parse()
            .map_err(|e| printwerk_core::PrintwerkError::IppRequest(format!("{e}")))?,
    };

    let mut request = new_request(Operation::GetJobs, Some(uri));
    add_operation_attr(&mut request, requested_attributes(attrs));
    add_operation_attr(&mut request, requesting_user(session.user()));
    add_operation_attr(
        &mut request,
        IppAttribute::new(
            "which-jobs",
            IppValue::Keyword(which.as_keyword().to_string()),
        ),
    );

    Ok(request)
}

/// Fetch attributes of one printer by its full URI (used for remote class
/// member lookups).
pub fn get_printer_attributes_request(printer_uri: &str, attrs: &[&str]) -> Result<IppRequestResponse> {
    let uri: Uri = printer_uri
        .parse()
        .map_err(|e| printwerk_core::PrintwerkError::IppRequest(format!("invalid printer URI: {e}")))?;
    let mut request = new_request(Operation::GetPrinterAttributes, Some(uri));
    add_operation_attr(&mut request, requested_attributes(attrs));
    Ok(request)
}

/// Create a job on a destination, carrying the job title and the encoded
/// option set.
pub fn create_job_request(
    session: &Session,
    dest: &str,
    title: &str,
    options: &[(String, String)],
) -> Result<IppRequestResponse> {
    let mut request = new_request(Operation::CreateJob, Some(Session::printer_uri(dest)?));
    add_operation_attr(&mut request, requesting_user(session.user()));
    add_operation_attr(
        &mut request,
        IppAttribute::new("job-name", IppValue::NameWithoutLanguage(title.to_string())),
    );

    for (key, value) in options {
        request
            .attributes_mut()
            .add(DelimiterTag::JobAttributes, encode_option(key, value));
    }

    Ok(request)
}

/// Send one document of a previously created job.  The payload is attached
/// by the caller.
pub fn send_document_request(
    session: &Session,
    dest: &str,
    job_id: i32,
    doc_name: &str,
    format: &str,
    last: bool,
) -> Result<IppRequestResponse> {
    let mut request = new_request(Operation::SendDocument, Some(Session::printer_uri(dest)?));
    add_operation_attr(
        &mut request,
        IppAttribute::new(IppAttribute::JOB_ID, IppValue::Integer(job_id)),
    );
    add_operation_attr(&mut request, requesting_user(session.user()));
    add_operation_attr(
        &mut request,
        IppAttribute::new(
            "document-name",
            IppValue::NameWithoutLanguage(doc_name.to_string()),
        ),
    );
    add_operation_attr(
        &mut request,
        IppAttribute::new(
            "document-format",
            IppValue::MimeMediaType(format.to_string()),
        ),
    );
    add_operation_attr(
        &mut request,
        IppAttribute::new("last-document", IppValue::Boolean(last)),
    );
    Ok(request)
}

/// Map one option key/value pair onto a typed job attribute: integers stay
/// integers, true/false become booleans, anything else is a keyword.
fn encode_option(key: &str, value: &str) -> IppAttribute {
    if let Ok(number) = value.parse::<i32>() {
        return IppAttribute::new(key, IppValue::Integer(number));
    }
    match value {
        "true" => IppAttribute::new(key, IppValue::Boolean(true)),
        "false" => IppAttribute::new(key, IppValue::Boolean(false)),
        _ => IppAttribute::new(key, IppValue::Keyword(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printwerk_core::SessionConfig;

    fn test_session() -> Session {
        let mut config = SessionConfig::default();
        config.user = "pat".into();
        Session::new(config)
    }

    fn operation_attr<'a>(request: &'a IppRequestResponse, name: &str) -> Option<&'a IppValue> {
        request
            .attributes()
            .groups_of(DelimiterTag::OperationAttributes)
            .find_map(|group| group.attributes().get(name))
            .map(|attr| attr.value())
    }

    #[test]
    fn cancel_by_destination_addresses_printer_and_current_job() {
        let session = test_session();
        let target = JobTarget::current_on("office");
        let request =
            cancel_request(&session, Operation::CancelJob, &target, None, false).expect("request");

        assert_eq!(
            operation_attr(&request, "printer-uri"),
            Some(&IppValue::Uri("ipp://localhost/printers/office".into()))
        );
        assert_eq!(
            operation_attr(&request, "job-id"),
            Some(&IppValue::Integer(0))
        );
        assert_eq!(
            operation_attr(&request, "requesting-user-name"),
            Some(&IppValue::NameWithoutLanguage("pat".into()))
        );
    }

    #[test]
    fn cancel_by_id_addresses_job_uri() {
        let session = test_session();
        let target = JobTarget::job(42);
        let request =
            cancel_request(&session, Operation::CancelJob, &target, None, false).expect("request");

        assert_eq!(
            operation_attr(&request, "job-uri"),
            Some(&IppValue::Uri("ipp://localhost/jobs/42".into()))
        );
        assert!(operation_attr(&request, "printer-uri").is_none());
    }

    #[test]
    fn owner_override_restricts_to_my_jobs() {
        let session = test_session();
        let target = JobTarget::current_on("office");
        let request = cancel_request(&session, Operation::CancelJobs, &target, Some("kim"), false)
            .expect("request");

        assert_eq!(
            operation_attr(&request, "requesting-user-name"),
            Some(&IppValue::NameWithoutLanguage("kim".into()))
        );
        assert_eq!(
            operation_attr(&request, "my-jobs"),
            Some(&IppValue::Boolean(true))
        );
    }

    #[test]
    fn purge_all_with_owner_upgrades_to_cancel_my_jobs() {
        assert!(matches!(
            upgrade_for_owner(Operation::PurgeJobs, Some("kim")),
            Operation::CancelMyJobs
        ));
        assert!(matches!(
            upgrade_for_owner(Operation::CancelJobs, Some("kim")),
            Operation::CancelMyJobs
        ));
        assert!(matches!(
            upgrade_for_owner(Operation::PurgeJobs, None),
            Operation::PurgeJobs
        ));
        assert!(matches!(
            upgrade_for_owner(Operation::CancelJob, Some("kim")),
            Operation::CancelJob
        ));
    }

    #[test]
    fn purge_adds_the_purge_flag() {
        let session = test_session();
        let target = JobTarget::current_on("office");
        let request =
            cancel_request(&session, Operation::CancelJob, &target, None, true).expect("request");

        assert_eq!(
            operation_attr(&request, "purge-jobs"),
            Some(&IppValue::Boolean(true))
        );
    }

    #[test]
    fn move_by_queue_uses_source_printer_uri() {
        let session = test_session();
        let source = JobTarget::current_on("oldqueue");
        let request = move_request(&session, &source, "newqueue").expect("request");

        assert_eq!(
            operation_attr(&request, "printer-uri"),
            Some(&IppValue::Uri("ipp://localhost/printers/oldqueue".into()))
        );

        let target_uri = request
            .attributes()
            .groups_of(DelimiterTag::JobAttributes)
            .find_map(|group| group.attributes().get("job-printer-uri"))
            .map(|attr| attr.value());
        assert_eq!(
            target_uri,
            Some(&IppValue::Uri("ipp://localhost/printers/newqueue".into()))
        );
    }

    #[test]
    fn move_by_id_uses_job_uri() {
        let session = test_session();
        let source = JobTarget::job(7);
        let request = move_request(&session, &source, "newqueue").expect("request");

        assert_eq!(
            operation_attr(&request, "job-uri"),
            Some(&IppValue::Uri("ipp://localhost/jobs/7".into()))
        );
    }

    #[test]
    fn admin_request_carries_reason_text() {
        let session = test_session();
        let request = admin_request(
            &session,
            Operation::PausePrinter,
            "office",
            Some("toner change"),
        )
        .expect("request");

        assert_eq!(
            operation_attr(&request, "printer-state-message"),
            Some(&IppValue::TextWithoutLanguage("toner change".into()))
        );
    }

    #[test]
    fn get_jobs_request_carries_which_jobs_keyword() {
        let session = test_session();
        let request = get_jobs_request(&session, None, JOB_ATTRS, WhichJobs::Completed)
            .expect("request");

        assert_eq!(
            operation_attr(&request, "which-jobs"),
            Some(&IppValue::Keyword("completed".into()))
        );
    }

    #[test]
    fn option_encoding_heuristic() {
        assert_eq!(
            encode_option("copies", "3").value(),
            &IppValue::Integer(3)
        );
        assert_eq!(
            encode_option("fit-to-page", "true").value(),
            &IppValue::Boolean(true)
        );
        assert_eq!(
            encode_option("job-hold-until", "indefinite").value(),
            &IppValue::Keyword("indefinite".into())
        );
    }
}
