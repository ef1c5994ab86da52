// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job submission: create the job, stream each document, clean up on
// failure.
//
// Submission is order-sensitive: the job must exist before any document
// upload, and a failure mid-upload cancels the partially created job before
// the error surfaces.  Documents stream straight from disk (or stdin); the
// client never buffers a whole file.

use std::fs::File;
use std::path::Path;

use ipp::model::DelimiterTag;
use ipp::prelude::*;
use tracing::{debug, info, warn};

use printwerk_core::error::{PrintwerkError, Result};
use printwerk_core::types::JobTarget;

use crate::request;
use crate::session::Session;

/// Raw pass-through document format.
pub const FORMAT_RAW: &str = "application/vnd.cups-raw";

/// Auto-detect document format.
pub const FORMAT_AUTO: &str = "application/octet-stream";

/// Pick the document format from the option set: `raw` wins, then an
/// explicit `document-format`, then auto-detection.
pub fn document_format(options: &[(String, String)]) -> &str {
    if options.iter().any(|(key, _)| key == "raw") {
        return FORMAT_RAW;
    }
    options
        .iter()
        .find(|(key, _)| key == "document-format")
        .map(|(_, value)| value.as_str())
        .unwrap_or(FORMAT_AUTO)
}

/// Create a job on the destination and return its server-assigned id.
pub fn create_job(
    session: &Session,
    dest: &str,
    title: &str,
    options: &[(String, String)],
) -> Result<i32> {
    let request = request::create_job_request(session, dest, title, options)?;
    let response = session.send(request, &format!("/printers/{dest}"))?;

    let job_id = job_id_from(&response).ok_or_else(|| {
        PrintwerkError::IppRequest("create-job response missing job-id attribute".into())
    })?;

    info!(dest, job_id, "job created");
    Ok(job_id)
}

/// The job-id integer from a response's job attributes group.
fn job_id_from(response: &IppRequestResponse) -> Option<i32> {
    for group in response.attributes().groups_of(DelimiterTag::JobAttributes) {
        if let Some(attr) = group.attributes().get("job-id") {
            if let IppValue::Integer(id) = attr.value() {
                return Some(*id);
            }
        }
    }
    None
}

/// Stream one document into an existing job.
fn send_document(
    session: &Session,
    dest: &str,
    job_id: i32,
    doc_name: &str,
    format: &str,
    last: bool,
    payload: IppPayload,
) -> Result<()> {
    let mut request =
        request::send_document_request(session, dest, job_id, doc_name, format, last)?;
    *request.payload_mut() = payload;

    debug!(dest, job_id, doc_name, last, "sending document");
    session.send(request, &format!("/printers/{dest}"))?;
    Ok(())
}

/// Cancel a job we created but could not finish.  Best effort: the original
/// failure is what the operator needs to see.
fn cancel_created_job(session: &Session, job_id: i32) {
    let target = JobTarget::job(job_id);
    let cancel = request::cancel_request(
        session,
        ipp::model::Operation::CancelJob,
        &target,
        None,
        false,
    );
    match cancel.and_then(|request| session.send(request, "/jobs/")) {
        Ok(_) => info!(job_id, "cancelled partially created job"),
        Err(e) => warn!(job_id, error = %e, "unable to cancel partially created job"),
    }
}

/// Submit the named files (or stdin when the list is empty) as one job.
///
/// Returns the job id on success.  Stops at the first hard failure and
/// cancels the created job before returning the error.
pub fn submit(
    session: &Session,
    dest: &str,
    title: &str,
    options: &[(String, String)],
    files: &[std::path::PathBuf],
) -> Result<i32> {
    let format = document_format(options);
    let job_id = create_job(session, dest, title, options)?;

    let outcome = if files.is_empty() {
        send_document(
            session,
            dest,
            job_id,
            "(stdin)",
            format,
            true,
            IppPayload::new(std::io::stdin()),
        )
    } else {
        send_files(session, dest, job_id, format, files)
    };

    if let Err(e) = outcome {
        cancel_created_job(session, job_id);
        return Err(e);
    }

    Ok(job_id)
}

fn send_files(
    session: &Session,
    dest: &str,
    job_id: i32,
    format: &str,
    files: &[std::path::PathBuf],
) -> Result<()> {
    let count = files.len();
    for (index, path) in files.iter().enumerate() {
        let file = File::open(path)?;
        send_document(
            session,
            dest,
            job_id,
            doc_name(path),
            format,
            index + 1 == count,
            IppPayload::new(file),
        )?;
    }
    Ok(())
}

fn doc_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("(unknown)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn raw_option_selects_raw_format() {
        let opts = options(&[("raw", "true"), ("document-format", "application/pdf")]);
        assert_eq!(document_format(&opts), FORMAT_RAW);
    }

    #[test]
    fn explicit_format_wins_over_auto() {
        let opts = options(&[("document-format", "application/pdf")]);
        assert_eq!(document_format(&opts), "application/pdf");
    }

    #[test]
    fn default_format_is_auto() {
        assert_eq!(document_format(&[]), FORMAT_AUTO);
    }

    #[test]
    fn doc_name_is_the_basename() {
        assert_eq!(doc_name(Path::new("/tmp/report.pdf")), "report.pdf");
        assert_eq!(doc_name(Path::new("notes.txt")), "notes.txt");
    }
}
