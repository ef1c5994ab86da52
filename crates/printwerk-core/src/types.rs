// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Printwerk print clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named print target (printer or class) as seen by one invocation.
///
/// Destinations are fetched from the server and merged with the user's local
/// instance definitions; they are never persisted by the client.  The pair
/// (name, instance) forms the compound key — `office` and `office/duplex`
/// are distinct destinations sharing one server queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Queue name, unique within a server.
    pub name: String,
    /// Optional instance (sub-configuration) qualifier.
    pub instance: Option<String>,
    /// Whether this destination is the user's default.
    pub is_default: bool,
    /// Default option key/value pairs attached to this destination.
    pub options: BTreeMap<String, String>,
}

impl Destination {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instance: None,
            is_default: false,
            options: BTreeMap::new(),
        }
    }

    /// `name` or `name/instance` as shown to the operator.
    pub fn full_name(&self) -> String {
        match &self.instance {
            Some(instance) => format!("{}/{}", self.name, instance),
            None => self.name.clone(),
        }
    }

    /// Look up a default option value by key.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// Which job(s) of a destination an operation addresses.
///
/// Exactly one of the three outcomes; the wire sentinels (0 = current,
/// -1 = all) appear only when a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobScope {
    /// The current/default job for the destination.
    Current,
    /// Every job on the destination.
    All,
    /// One specific job.
    Id(i32),
}

impl JobScope {
    /// Sentinel encoding used by the protocol.
    pub fn wire_id(self) -> i32 {
        match self {
            Self::Current => 0,
            Self::All => -1,
            Self::Id(id) => id,
        }
    }
}

/// Outcome of resolving one positional command-line token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTarget {
    /// Owning destination name; `None` leaves resolution to the server.
    pub dest: Option<String>,
    pub scope: JobScope,
}

impl JobTarget {
    /// The current job on the given destination.
    pub fn current_on(dest: impl Into<String>) -> Self {
        Self {
            dest: Some(dest.into()),
            scope: JobScope::Current,
        }
    }

    /// The current job, destination unspecified.
    pub fn current() -> Self {
        Self {
            dest: None,
            scope: JobScope::Current,
        }
    }

    /// A specific job id, destination unspecified.
    pub fn job(id: i32) -> Self {
        Self {
            dest: None,
            scope: JobScope::Id(id),
        }
    }

    /// All jobs on the given destination.
    pub fn all_on(dest: impl Into<String>) -> Self {
        Self {
            dest: Some(dest.into()),
            scope: JobScope::All,
        }
    }
}

/// Job selection keyword for job reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WhichJobs {
    #[default]
    NotCompleted,
    Completed,
    All,
}

impl WhichJobs {
    pub fn as_keyword(self) -> &'static str {
        match self {
            Self::NotCompleted => "not-completed",
            Self::Completed => "completed",
            Self::All => "all",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "not-completed" => Some(Self::NotCompleted),
            "completed" => Some(Self::Completed),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Completed jobs are dated by their completion time, everything else by
    /// submission time.
    pub fn uses_completed_time(self) -> bool {
        matches!(self, Self::Completed)
    }
}
