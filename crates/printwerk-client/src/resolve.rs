// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Disambiguation of positional command-line tokens into job targets.
//
// Resolution order: literal "-", exact destination match, trailing
// "-<digits>" suffix, all-digits token, error.  An exact destination match
// always beats the suffix heuristic — a queue literally named "printer-42"
// resolves as that queue, never as job 42.

use printwerk_core::error::{PrintwerkError, Result};
use printwerk_core::types::JobTarget;

use crate::dests::Destinations;

/// Resolve one positional token.
pub fn resolve_target(token: &str, dests: &Destinations) -> Result<JobTarget> {
    // 1. "-" means the current job on the default destination.
    if token == "-" {
        return Ok(JobTarget::current());
    }

    // 2. A known destination name: operate on its current job.
    if dests.contains(token) {
        return Ok(JobTarget::current_on(token));
    }

    // 3. A trailing "-<digits>" suffix names a job id.
    if let Some(job_id) = job_suffix(token) {
        return Ok(JobTarget::job(job_id));
    }

    // 4. A bare number is a job id too.
    if !token.is_empty() && token.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(job_id) = token.parse::<i32>() {
            return Ok(JobTarget::job(job_id));
        }
    }

    // 5. Nothing fits.
    Err(PrintwerkError::UnknownDestination(token.to_string()))
}

/// Job id from a `name-<digits>` token, if the suffix is all digits.
fn job_suffix(token: &str) -> Option<i32> {
    let (_, digits) = token.rsplit_once('-')?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use printwerk_core::types::{Destination, JobScope};

    fn known(names: &[&str]) -> Destinations {
        Destinations::from_vec(names.iter().map(|name| Destination::new(*name)).collect())
    }

    #[test]
    fn dash_is_the_current_job_on_no_destination() {
        let target = resolve_target("-", &known(&[])).expect("resolve");
        assert_eq!(target, JobTarget::current());
    }

    #[test]
    fn known_destination_wins() {
        let target = resolve_target("office", &known(&["office"])).expect("resolve");
        assert_eq!(target, JobTarget::current_on("office"));
    }

    #[test]
    fn destination_match_beats_suffix_heuristic() {
        // A queue literally named "printer-42" is that queue, not job 42.
        let target = resolve_target("printer-42", &known(&["printer-42"])).expect("resolve");
        assert_eq!(target, JobTarget::current_on("printer-42"));
    }

    #[test]
    fn suffix_resolves_to_bare_job_id() {
        // "printer" being a known queue does not capture the job id form.
        let target = resolve_target("printer-5", &known(&["printer"])).expect("resolve");
        assert_eq!(target, JobTarget::job(5));
        assert_eq!(target.dest, None);
    }

    #[test]
    fn all_digit_token_is_a_job_id() {
        let target = resolve_target("117", &known(&["office"])).expect("resolve");
        assert_eq!(target.scope, JobScope::Id(117));
    }

    #[test]
    fn numeric_destination_name_still_wins() {
        let target = resolve_target("42", &known(&["42"])).expect("resolve");
        assert_eq!(target, JobTarget::current_on("42"));
    }

    #[test]
    fn unknown_token_is_an_error() {
        let err = resolve_target("nosuch", &known(&["office"])).expect_err("must fail");
        assert!(matches!(err, PrintwerkError::UnknownDestination(name) if name == "nosuch"));
    }

    #[test]
    fn non_digit_suffix_is_not_a_job_id() {
        assert!(resolve_target("print-queue", &known(&["office"])).is_err());
        assert_eq!(job_suffix("a-1x2"), None);
        assert_eq!(job_suffix("a-12"), Some(12));
        assert_eq!(job_suffix("a-1-2"), Some(2));
        assert_eq!(job_suffix("-"), None);
    }

    #[test]
    fn destination_lookup_is_case_insensitive() {
        let target = resolve_target("Office", &known(&["office"])).expect("resolve");
        assert_eq!(target, JobTarget::current_on("Office"));
    }
}
