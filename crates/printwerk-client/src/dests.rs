// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Destination lookup: server queues merged with the user's local instance
// definitions.
//
// The server knows queue names and its own default; instances and
// per-destination default options come from the user's lpoptions file.  A
// destination list lives for one invocation only.

use std::path::PathBuf;

use ipp::model::DelimiterTag;
use tracing::debug;

use printwerk_core::error::Result;
use printwerk_core::types::Destination;

use crate::decode::{assemble_printers, GroupCursor, PrinterRecord};
use crate::request;
use crate::session::Session;

/// The set of destinations visible to one invocation.
#[derive(Debug, Clone, Default)]
pub struct Destinations {
    dests: Vec<Destination>,
}

impl Destinations {
    /// Fetch the server's queues and merge the user's local overrides.
    pub fn fetch(session: &Session) -> Result<Self> {
        let request = request::get_printers_request(session, request::DEST_LIST_ATTRS);
        let response = session.send(request, "/")?;

        let mut dests: Vec<Destination> = assemble_printers(response.attributes())
            .into_iter()
            .filter(PrinterRecord::is_identified)
            .map(destination_from)
            .collect();

        // The server's default, if it has one.  Absence is not an error.
        if let Ok(response) = session.send(request::get_default_request(session), "/") {
            let mut cursor = GroupCursor::new(response.attributes());
            if let Some(group) = cursor.next_group(DelimiterTag::PrinterAttributes) {
                if let Some(name) = PrinterRecord::from_group(group).name {
                    for dest in &mut dests {
                        dest.is_default = dest.name.eq_ignore_ascii_case(&name);
                    }
                }
            }
        }

        if let Some(path) = lpoptions_path() {
            match std::fs::read_to_string(&path) {
                Ok(text) => apply_lpoptions(&mut dests, &text),
                Err(e) => debug!(path = %path.display(), error = %e, "no lpoptions file"),
            }
        }

        debug!(count = dests.len(), "destinations loaded");
        Ok(Self { dests })
    }

    /// Build from an explicit list (tests, and callers that already fetched).
    pub fn from_vec(dests: Vec<Destination>) -> Self {
        Self { dests }
    }

    pub fn is_empty(&self) -> bool {
        self.dests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.dests.iter()
    }

    /// Whether any destination (primary or instance) carries this name.
    pub fn contains(&self, name: &str) -> bool {
        self.dests
            .iter()
            .any(|dest| dest.name.eq_ignore_ascii_case(name))
    }

    /// Exact lookup by compound key.  Names compare case-insensitively,
    /// instances too.
    pub fn find(&self, name: &str, instance: Option<&str>) -> Option<&Destination> {
        self.dests.iter().find(|dest| {
            dest.name.eq_ignore_ascii_case(name)
                && match (&dest.instance, instance) {
                    (None, None) => true,
                    (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                    _ => false,
                }
        })
    }

    /// The user's default destination: LPDEST, then PRINTER (ignoring the
    /// historical `lp` value), then whatever the merge flagged as default.
    ///
    /// When the environment names a destination that does not exist, there
    /// is no default — the caller reports the mismatch via [`env_default`].
    pub fn default_destination(&self) -> Option<&Destination> {
        if let Some((_, name)) = env_default() {
            let (name, instance) = split_instance(&name);
            return self.find(name, instance);
        }
        self.dests.iter().find(|dest| dest.is_default)
    }
}

/// A server queue record as a destination, carrying the listing attributes
/// as default options.
fn destination_from(record: PrinterRecord) -> Destination {
    let mut dest = Destination::new(record.name.unwrap_or_default());
    if let Some(uri) = record.uri_supported {
        dest.options.insert("printer-uri-supported".into(), uri);
    }
    if let Some(device) = record.device_uri {
        dest.options.insert("device-uri".into(), device);
    }
    if record.is_temporary {
        dest.options
            .insert("printer-is-temporary".into(), "true".into());
    }
    dest
}

/// The environment's default-destination override, as (variable, value).
pub fn env_default() -> Option<(&'static str, String)> {
    if let Ok(name) = std::env::var("LPDEST") {
        if !name.is_empty() {
            return Some(("LPDEST", name));
        }
    }
    if let Ok(name) = std::env::var("PRINTER") {
        if !name.is_empty() && name != "lp" {
            return Some(("PRINTER", name));
        }
    }
    None
}

/// Split a `name[/instance]` token.
pub fn split_instance(token: &str) -> (&str, Option<&str>) {
    match token.split_once('/') {
        Some((name, instance)) if !instance.is_empty() => (name, Some(instance)),
        Some((name, _)) => (name, None),
        None => (token, None),
    }
}

/// Path of the user's lpoptions file.
fn lpoptions_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CUPS_LPOPTIONS") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".cups").join("lpoptions"))
}

/// Merge lpoptions lines into the destination list.
///
/// Lines are `Dest name[/instance] key=value ...` or `Default ...`; the
/// keyword compares case-insensitively.  Unknown names still create entries
/// (an instance can outlive its queue on the server side).
pub fn apply_lpoptions(dests: &mut Vec<Destination>, text: &str) {
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let keyword = match parts.next() {
            Some(k) => k,
            None => continue,
        };
        let target = match parts.next() {
            Some(t) => t,
            None => continue,
        };
        let options: Vec<&str> = parts.collect();
        let options = options.join(" ");

        let is_default = keyword.eq_ignore_ascii_case("default");
        if !is_default && !keyword.eq_ignore_ascii_case("dest") {
            continue;
        }

        let (name, instance) = split_instance(target);
        let index = match dests.iter().position(|dest| {
            dest.name.eq_ignore_ascii_case(name)
                && dest.instance.as_deref().map(str::to_ascii_lowercase)
                    == instance.map(str::to_ascii_lowercase)
        }) {
            Some(index) => index,
            None => {
                let mut dest = Destination::new(name);
                dest.instance = instance.map(str::to_string);
                dests.push(dest);
                dests.len() - 1
            }
        };

        for (key, value) in parse_options(&options) {
            dests[index].options.insert(key, value);
        }

        if is_default {
            for (i, dest) in dests.iter_mut().enumerate() {
                dest.is_default = i == index;
            }
        }
    }
}

/// Parse a space-separated `key=value` option list; a bare key means
/// `true`.  Values may be single- or double-quoted.
pub fn parse_options(text: &str) -> Vec<(String, String)> {
    let mut options = Vec::new();

    for word in text.split_whitespace() {
        match word.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                let value = value
                    .trim_matches('"')
                    .trim_matches('\'')
                    .to_string();
                options.push((key.to_string(), value));
            }
            _ => {
                if !word.is_empty() {
                    options.push((word.to_string(), "true".to_string()));
                }
            }
        }
    }

    options
}

/// Single-destination lookup, fetching fresh state from the server.
pub fn named(session: &Session, name: &str, instance: Option<&str>) -> Result<Option<Destination>> {
    let dests = Destinations::fetch(session)?;
    Ok(dests.find(name, instance).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_dests(names: &[&str]) -> Vec<Destination> {
        names.iter().map(|name| Destination::new(*name)).collect()
    }

    #[test]
    fn lpoptions_adds_instances_and_options() {
        let mut dests = server_dests(&["office", "lab"]);
        apply_lpoptions(
            &mut dests,
            "Dest office/duplex sides=two-sided-long-edge media=a4\n\
             Dest lab landscape\n",
        );

        let set = Destinations::from_vec(dests);
        let duplex = set.find("office", Some("duplex")).expect("instance");
        assert_eq!(duplex.option("sides"), Some("two-sided-long-edge"));
        assert_eq!(duplex.option("media"), Some("a4"));

        let lab = set.find("lab", None).expect("lab");
        assert_eq!(lab.option("landscape"), Some("true"));
    }

    #[test]
    fn lpoptions_default_marks_exactly_one() {
        let mut dests = server_dests(&["office", "lab"]);
        dests[0].is_default = true;
        apply_lpoptions(&mut dests, "Default lab\n");

        let set = Destinations::from_vec(dests);
        assert!(!set.find("office", None).expect("office").is_default);
        assert!(set.find("lab", None).expect("lab").is_default);
    }

    #[test]
    fn lpoptions_keyword_is_case_insensitive_and_comments_skipped() {
        let mut dests = server_dests(&["office"]);
        apply_lpoptions(
            &mut dests,
            "# local overrides\n\
             dest office media=letter\n\
             bogus office sides=one-sided\n",
        );

        let set = Destinations::from_vec(dests);
        let office = set.find("office", None).expect("office");
        assert_eq!(office.option("media"), Some("letter"));
        assert_eq!(office.option("sides"), None);
    }

    #[test]
    fn lpoptions_creates_unknown_destinations() {
        let mut dests = server_dests(&[]);
        apply_lpoptions(&mut dests, "Dest retired-queue\n");
        assert!(Destinations::from_vec(dests).contains("retired-queue"));
    }

    #[test]
    fn find_is_case_insensitive_on_the_compound_key() {
        let mut dests = server_dests(&["Office"]);
        apply_lpoptions(&mut dests, "Dest Office/Duplex\n");
        let set = Destinations::from_vec(dests);

        assert!(set.find("office", None).is_some());
        assert!(set.find("OFFICE", Some("duplex")).is_some());
        assert!(set.find("office", Some("simplex")).is_none());
        assert!(set.contains("oFFice"));
    }

    #[test]
    fn split_instance_forms() {
        assert_eq!(split_instance("office"), ("office", None));
        assert_eq!(split_instance("office/duplex"), ("office", Some("duplex")));
        assert_eq!(split_instance("office/"), ("office", None));
    }

    #[test]
    fn parse_options_quoting_and_bare_keys() {
        let options = parse_options("media=a4 banner=\"none\" raw");
        assert_eq!(
            options,
            vec![
                ("media".to_string(), "a4".to_string()),
                ("banner".to_string(), "none".to_string()),
                ("raw".to_string(), "true".to_string()),
            ]
        );
    }
}
