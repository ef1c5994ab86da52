// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-invocation session: server address, acting user, encryption mode.
//
// Every operation receives the session explicitly; nothing about the
// connection lives in process-global state.  One request is sent at a time
// and its response fully decoded before the next is issued.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use ipp::model::StatusCode;
use ipp::prelude::*;
use tracing::debug;
use url::Url;

use printwerk_core::config::SessionConfig;
use printwerk_core::error::{PrintwerkError, Result};

/// Connect timeout for the scheduler reachability probe.
const PROBE_TIMEOUT_SECS: u64 = 30;

/// One command invocation's connection context.
pub struct Session {
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The acting user attached to requests as requesting-user-name.
    pub fn user(&self) -> &str {
        &self.config.user
    }

    /// `host:port` as shown by the server report.
    pub fn server_display(&self) -> String {
        if self.config.host.starts_with('/') {
            self.config.host.clone()
        } else {
            format!("{}:{}", self.config.host, self.config.port)
        }
    }

    /// URL the HTTP layer posts to for a given resource path.
    fn base_url(&self) -> Result<Url> {
        let scheme = if self.config.encrypt { "https" } else { "http" };
        Url::parse(&format!(
            "{}://{}:{}/",
            scheme, self.config.host, self.config.port
        ))
        .map_err(|e| PrintwerkError::IppRequest(format!("invalid server address: {e}")))
    }

    fn resource_uri(&self, resource: &str) -> Result<Uri> {
        let url = self
            .base_url()?
            .join(resource.trim_start_matches('/'))
            .map_err(|e| PrintwerkError::IppRequest(format!("invalid resource path: {e}")))?;
        url.as_str()
            .parse()
            .map_err(|e| PrintwerkError::IppRequest(format!("invalid request URI: {e}")))
    }

    /// Addressing URI for a destination, as placed in printer-uri
    /// attributes.  The scheduler resolves these relative to itself, so the
    /// host part is always localhost regardless of the connected server.
    pub fn printer_uri(name: &str) -> Result<Uri> {
        let url = Url::parse("ipp://localhost/printers/")
            .and_then(|base| base.join(name))
            .map_err(|e| PrintwerkError::IppRequest(format!("invalid destination name: {e}")))?;
        url.as_str()
            .parse()
            .map_err(|e| PrintwerkError::IppRequest(format!("invalid destination name: {e}")))
    }

    /// Addressing URI for the broadcast destination (all printers).
    pub fn all_printers_uri() -> Result<Uri> {
        "ipp://localhost/printers/"
            .parse()
            .map_err(|e| PrintwerkError::IppRequest(format!("invalid destination URI: {e}")))
    }

    /// Addressing URI for a job id.
    pub fn job_uri(job_id: i32) -> String {
        format!("ipp://localhost/jobs/{job_id}")
    }

    /// Send one request to the given resource path and check its status.
    ///
    /// A status above successful-ok-conflicting-attributes is a failure; the
    /// distinguished service-unavailable status means the scheduler is not
    /// running at all.
    pub fn send(&self, request: IppRequestResponse, resource: &str) -> Result<IppRequestResponse> {
        let uri = self.resource_uri(resource)?;
        debug!(uri = %uri, "sending IPP request");

        let client = IppClient::builder(uri).build();
        let response = client
            .send(request)
            .map_err(|e| PrintwerkError::IppRequest(e.to_string()))?;

        let code = response.header().status_code();
        debug!(status = ?code, "received IPP response");

        if matches!(code, StatusCode::ServerErrorServiceUnavailable) {
            return Err(PrintwerkError::SchedulerNotRunning);
        }
        if !code.is_success() {
            return Err(PrintwerkError::IppStatus(server_message(&response, code)));
        }

        Ok(response)
    }

    /// Probe whether the scheduler is reachable at all (TCP connect).
    pub fn ping(&self) -> bool {
        let addr = (self.config.host.as_str(), self.config.port);
        match addr.to_socket_addrs() {
            Ok(mut addrs) => addrs.any(|addr| {
                TcpStream::connect_timeout(&addr, Duration::from_secs(PROBE_TIMEOUT_SECS)).is_ok()
            }),
            Err(_) => false,
        }
    }
}

/// Operator-facing message for a failed response: the server-provided
/// status-message when present, otherwise the status keyword.
fn server_message(response: &IppRequestResponse, code: StatusCode) -> String {
    for group in response
        .attributes()
        .groups_of(DelimiterTag::OperationAttributes)
    {
        if let Some(attr) = group.attributes().get("status-message") {
            if let IppValue::TextWithoutLanguage(text) = attr.value() {
                return text.clone();
            }
        }
    }
    status_keyword(code)
}

/// IPP status keyword strings for the codes the scheduler commonly returns.
fn status_keyword(code: StatusCode) -> String {
    match code {
        StatusCode::ClientErrorBadRequest => "client-error-bad-request".into(),
        StatusCode::ClientErrorForbidden => "client-error-forbidden".into(),
        StatusCode::ClientErrorNotAuthenticated => "client-error-not-authenticated".into(),
        StatusCode::ClientErrorNotAuthorized => "client-error-not-authorized".into(),
        StatusCode::ClientErrorNotPossible => "client-error-not-possible".into(),
        StatusCode::ClientErrorNotFound => "client-error-not-found".into(),
        StatusCode::ServerErrorInternalError => "server-error-internal-error".into(),
        StatusCode::ServerErrorOperationNotSupported => {
            "server-error-operation-not-supported".into()
        }
        StatusCode::ServerErrorVersionNotSupported => "server-error-version-not-supported".into(),
        StatusCode::ServerErrorNotAcceptingJobs => "server-error-not-accepting-jobs".into(),
        StatusCode::ServerErrorBusy => "server-error-busy".into(),
        other => format!("{other:?}"),
    }
}
