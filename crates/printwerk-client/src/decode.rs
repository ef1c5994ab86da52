// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grouped-attribute response decoding.
//
// A response is a flat sequence of attribute groups in stream order.  The
// cursor walks it strictly forward, skipping groups that carry no record,
// and each record constructor keeps only the (name, value-type) pairs it
// recognises.  Unknown or mistyped attributes are ignored, never errors; a
// group missing its identifying field yields a record the caller discards.

use ipp::model::{DelimiterTag, JobState, PrinterState};
use ipp::prelude::*;

/// Forward-only cursor over a response's attribute groups.
///
/// Re-entrant: call `next_group` repeatedly until it returns `None`.  The
/// cursor never revisits a consumed group, so interleaved printer and job
/// groups decode with no state beyond the position.
pub struct GroupCursor<'a> {
    groups: &'a [IppAttributeGroup],
    pos: usize,
}

impl<'a> GroupCursor<'a> {
    pub fn new(attributes: &'a IppAttributes) -> Self {
        Self {
            groups: attributes.groups(),
            pos: 0,
        }
    }

    /// Slice-based constructor, used by tests and by callers that already
    /// hold a group list.
    pub fn over(groups: &'a [IppAttributeGroup]) -> Self {
        Self { groups, pos: 0 }
    }

    /// Advance to the next group with the given delimiter tag, skipping any
    /// other groups on the way.  Returns `None` at end of stream.
    pub fn next_group(&mut self, tag: DelimiterTag) -> Option<&'a IppAttributeGroup> {
        while self.pos < self.groups.len() {
            let group = &self.groups[self.pos];
            self.pos += 1;
            if group.tag() == tag {
                return Some(group);
            }
        }
        None
    }

    /// Position of the first unconsumed group.
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// One printer as assembled from a printer group.
#[derive(Debug, Clone)]
pub struct PrinterRecord {
    pub name: Option<String>,
    pub state: PrinterState,
    pub state_message: Option<String>,
    pub state_change_time: i64,
    pub state_reasons: Vec<String>,
    pub info: Option<String>,
    pub location: Option<String>,
    pub make_and_model: Option<String>,
    pub uri_supported: Option<String>,
    pub device_uri: Option<String>,
    pub accepting: bool,
    pub is_temporary: bool,
    pub allowed_users: Option<Vec<String>>,
    pub denied_users: Option<Vec<String>>,
}

impl Default for PrinterRecord {
    fn default() -> Self {
        Self {
            name: None,
            state: PrinterState::Idle,
            state_message: None,
            state_change_time: 0,
            state_reasons: Vec::new(),
            info: None,
            location: None,
            make_and_model: None,
            uri_supported: None,
            device_uri: None,
            accepting: true,
            is_temporary: false,
            allowed_users: None,
            denied_users: None,
        }
    }
}

impl PrinterRecord {
    /// Assemble from one printer group.
    pub fn from_group(group: &IppAttributeGroup) -> Self {
        let mut record = Self::default();

        for (name, attr) in group.attributes() {
            let value = attr.value();
            match name.as_str() {
                "printer-name" => record.name = as_name(value).map(str::to_string),
                "printer-state" => {
                    if let Some(state) = as_enum(value).and_then(PrinterState::from_i32) {
                        record.state = state;
                    }
                }
                "printer-state-message" => record.state_message = as_text(value).map(str::to_string),
                "printer-state-change-time" => {
                    if let Some(time) = as_integer(value) {
                        record.state_change_time = i64::from(time);
                    }
                }
                "printer-state-reasons" => {
                    if let Some(reasons) = as_keyword_list(value) {
                        record.state_reasons = reasons;
                    }
                }
                "printer-info" => record.info = as_text(value).map(str::to_string),
                "printer-location" => record.location = as_text(value).map(str::to_string),
                "printer-make-and-model" => {
                    record.make_and_model = as_text(value).map(str::to_string)
                }
                "printer-uri-supported" => record.uri_supported = as_uri(value).map(str::to_string),
                "device-uri" => record.device_uri = as_uri(value).map(str::to_string),
                "printer-is-accepting-jobs" => {
                    if let Some(accepting) = as_boolean(value) {
                        record.accepting = accepting;
                    }
                }
                "printer-is-temporary" => {
                    if let Some(temporary) = as_boolean(value) {
                        record.is_temporary = temporary;
                    }
                }
                "requesting-user-name-allowed" => record.allowed_users = as_name_list(value),
                "requesting-user-name-denied" => record.denied_users = as_name_list(value),
                _ => {}
            }
        }

        record
    }

    /// A record with no printer name identifies nothing and is discarded by
    /// callers.
    pub fn is_identified(&self) -> bool {
        self.name.is_some()
    }
}

/// One class as assembled from a printer group (the protocol reuses the
/// printer group for classes).
#[derive(Debug, Clone, Default)]
pub struct ClassRecord {
    pub name: Option<String>,
    pub uri_supported: Option<String>,
    pub member_names: Option<Vec<String>>,
}

impl ClassRecord {
    pub fn from_group(group: &IppAttributeGroup) -> Self {
        let mut record = Self::default();

        for (name, attr) in group.attributes() {
            let value = attr.value();
            match name.as_str() {
                "printer-name" => record.name = as_name(value).map(str::to_string),
                "printer-uri-supported" => record.uri_supported = as_uri(value).map(str::to_string),
                "member-names" => record.member_names = as_name_list(value),
                _ => {}
            }
        }

        record
    }

    pub fn is_identified(&self) -> bool {
        self.name.is_some()
    }
}

/// One job as assembled from a job group.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub id: i32,
    pub size_kb: i32,
    pub name: Option<String>,
    pub user: Option<String>,
    /// Destination name, parsed from the tail of job-printer-uri.
    pub dest: Option<String>,
    pub state: JobState,
    pub state_reasons: Vec<String>,
    pub printer_state_message: Option<String>,
    pub time_at_creation: i64,
    pub time_at_completed: i64,
}

impl Default for JobRecord {
    fn default() -> Self {
        Self {
            id: 0,
            size_kb: 0,
            name: None,
            user: None,
            dest: None,
            state: JobState::Pending,
            state_reasons: Vec::new(),
            printer_state_message: None,
            time_at_creation: 0,
            time_at_completed: 0,
        }
    }
}

impl JobRecord {
    /// Assemble from one job group.
    pub fn from_group(group: &IppAttributeGroup) -> Self {
        let mut record = Self::default();

        for (name, attr) in group.attributes() {
            let value = attr.value();
            match name.as_str() {
                "job-id" => {
                    if let Some(id) = as_integer(value) {
                        record.id = id;
                    }
                }
                "job-k-octets" => {
                    if let Some(size) = as_integer(value) {
                        record.size_kb = size;
                    }
                }
                "job-name" => record.name = as_name(value).map(str::to_string),
                "job-originating-user-name" => record.user = as_name(value).map(str::to_string),
                "job-printer-uri" => {
                    record.dest = as_uri(value)
                        .and_then(|uri| uri.rsplit('/').next())
                        .filter(|tail| !tail.is_empty())
                        .map(str::to_string)
                }
                "job-state" => {
                    if let Some(state) = as_enum(value).and_then(JobState::from_i32) {
                        record.state = state;
                    }
                }
                "job-state-reasons" => {
                    if let Some(reasons) = as_keyword_list(value) {
                        record.state_reasons = reasons;
                    }
                }
                "job-printer-state-message" => {
                    record.printer_state_message = as_text(value).map(str::to_string)
                }
                "time-at-creation" => {
                    if let Some(time) = as_integer(value) {
                        record.time_at_creation = i64::from(time);
                    }
                }
                "time-at-completed" => {
                    if let Some(time) = as_integer(value) {
                        record.time_at_completed = i64::from(time);
                    }
                }
                _ => {}
            }
        }

        record
    }

    /// The jobs report needs both the id and the owning queue to display a
    /// job; anything less is an incomplete record.
    pub fn is_identified(&self) -> bool {
        self.id != 0 && self.dest.is_some()
    }
}

/// Assemble every printer record in response order.
pub fn assemble_printers(attributes: &IppAttributes) -> Vec<PrinterRecord> {
    let mut cursor = GroupCursor::new(attributes);
    let mut records = Vec::new();
    while let Some(group) = cursor.next_group(DelimiterTag::PrinterAttributes) {
        records.push(PrinterRecord::from_group(group));
    }
    records
}

/// Assemble every class record in response order.
pub fn assemble_classes(attributes: &IppAttributes) -> Vec<ClassRecord> {
    let mut cursor = GroupCursor::new(attributes);
    let mut records = Vec::new();
    while let Some(group) = cursor.next_group(DelimiterTag::PrinterAttributes) {
        records.push(ClassRecord::from_group(group));
    }
    records
}

/// Assemble every job record in response order.
pub fn assemble_jobs(attributes: &IppAttributes) -> Vec<JobRecord> {
    let mut cursor = GroupCursor::new(attributes);
    let mut records = Vec::new();
    while let Some(group) = cursor.next_group(DelimiterTag::JobAttributes) {
        records.push(JobRecord::from_group(group));
    }
    records
}

// Value-type checks.  Each returns `None` for a mistyped attribute so the
// caller leaves the field unset.

fn as_name(value: &IppValue) -> Option<&str> {
    match value {
        IppValue::NameWithoutLanguage(name) => Some(name),
        IppValue::NameWithLanguage { name, .. } => Some(name),
        _ => None,
    }
}

fn as_text(value: &IppValue) -> Option<&str> {
    match value {
        IppValue::TextWithoutLanguage(text) => Some(text),
        IppValue::TextWithLanguage { text, .. } => Some(text),
        _ => None,
    }
}

fn as_uri(value: &IppValue) -> Option<&str> {
    match value {
        IppValue::Uri(uri) => Some(uri),
        _ => None,
    }
}

fn as_integer(value: &IppValue) -> Option<i32> {
    match value {
        IppValue::Integer(number) => Some(*number),
        _ => None,
    }
}

fn as_enum(value: &IppValue) -> Option<i32> {
    match value {
        IppValue::Enum(number) => Some(*number),
        _ => None,
    }
}

fn as_boolean(value: &IppValue) -> Option<bool> {
    match value {
        IppValue::Boolean(flag) => Some(*flag),
        _ => None,
    }
}

/// Keyword values arrive as a single keyword or as an array of keywords;
/// either way they stay an ordered list of strings.
fn as_keyword_list(value: &IppValue) -> Option<Vec<String>> {
    match value {
        IppValue::Keyword(keyword) => Some(vec![keyword.clone()]),
        IppValue::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    IppValue::Keyword(keyword) => Some(keyword.clone()),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

fn as_name_list(value: &IppValue) -> Option<Vec<String>> {
    match value {
        IppValue::NameWithoutLanguage(_) | IppValue::NameWithLanguage { .. } => {
            as_name(value).map(|name| vec![name.to_string()])
        }
        IppValue::Array(items) => Some(items.iter().filter_map(as_name).map(str::to_string).collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(tag: DelimiterTag, attrs: Vec<(&str, IppValue)>) -> IppAttributeGroup {
        let mut group = IppAttributeGroup::new(tag);
        for (name, value) in attrs {
            group
                .attributes_mut()
                .insert(name.to_string(), IppAttribute::new(name, value));
        }
        group
    }

    fn printer_group(name: &str) -> IppAttributeGroup {
        group(
            DelimiterTag::PrinterAttributes,
            vec![
                (
                    "printer-name",
                    IppValue::NameWithoutLanguage(name.to_string()),
                ),
                ("printer-state", IppValue::Enum(4)),
                (
                    "printer-state-message",
                    IppValue::TextWithoutLanguage("busy".into()),
                ),
            ],
        )
    }

    fn job_group(id: i32, dest: &str) -> IppAttributeGroup {
        group(
            DelimiterTag::JobAttributes,
            vec![
                ("job-id", IppValue::Integer(id)),
                (
                    "job-printer-uri",
                    IppValue::Uri(format!("ipp://localhost/printers/{dest}")),
                ),
                ("job-originating-user-name", IppValue::NameWithoutLanguage("pat".into())),
            ],
        )
    }

    #[test]
    fn cursor_returns_groups_in_order_and_advances() {
        let groups = vec![
            group(DelimiterTag::OperationAttributes, vec![]),
            printer_group("alpha"),
            job_group(7, "alpha"),
        ];
        let mut cursor = GroupCursor::over(&groups);

        let printer = cursor.next_group(DelimiterTag::PrinterAttributes).expect("printer");
        assert_eq!(
            PrinterRecord::from_group(printer).name.as_deref(),
            Some("alpha")
        );
        assert_eq!(cursor.position(), 2);

        let job = cursor.next_group(DelimiterTag::JobAttributes).expect("job");
        assert_eq!(JobRecord::from_group(job).id, 7);
        assert_eq!(cursor.position(), 3);

        assert!(cursor.next_group(DelimiterTag::JobAttributes).is_none());
        assert!(cursor.next_group(DelimiterTag::PrinterAttributes).is_none());
    }

    #[test]
    fn cursor_never_looks_backward() {
        let groups = vec![printer_group("alpha"), printer_group("beta")];
        let mut cursor = GroupCursor::over(&groups);

        // Asking for jobs first exhausts the stream; the printers before the
        // end are gone for good.
        assert!(cursor.next_group(DelimiterTag::JobAttributes).is_none());
        assert!(cursor.next_group(DelimiterTag::PrinterAttributes).is_none());
    }

    #[test]
    fn unrecognised_and_mistyped_attributes_are_ignored() {
        let mixed = group(
            DelimiterTag::PrinterAttributes,
            vec![
                (
                    "printer-name",
                    IppValue::NameWithoutLanguage("gamma".into()),
                ),
                // Wrong value type: must not populate the state message.
                ("printer-state-message", IppValue::Keyword("paused".into())),
                // Unknown attribute: skipped.
                ("x-vendor-frobnication", IppValue::Integer(9)),
                // Wrong type for the state enum.
                ("printer-state", IppValue::Keyword("processing".into())),
            ],
        );

        let record = PrinterRecord::from_group(&mixed);
        assert_eq!(record.name.as_deref(), Some("gamma"));
        assert!(record.state_message.is_none());
        assert!(matches!(record.state, PrinterState::Idle));
    }

    #[test]
    fn record_without_identifier_is_flagged() {
        let nameless = group(
            DelimiterTag::PrinterAttributes,
            vec![("printer-state", IppValue::Enum(3))],
        );
        assert!(!PrinterRecord::from_group(&nameless).is_identified());

        let job_without_queue = group(
            DelimiterTag::JobAttributes,
            vec![("job-id", IppValue::Integer(3))],
        );
        assert!(!JobRecord::from_group(&job_without_queue).is_identified());
    }

    #[test]
    fn job_dest_comes_from_printer_uri_tail() {
        let record = JobRecord::from_group(&job_group(12, "office"));
        assert_eq!(record.dest.as_deref(), Some("office"));
        assert_eq!(record.user.as_deref(), Some("pat"));
        assert!(record.is_identified());
    }

    #[test]
    fn keyword_lists_keep_order_and_drop_mistyped_items() {
        let reasons = group(
            DelimiterTag::PrinterAttributes,
            vec![
                (
                    "printer-name",
                    IppValue::NameWithoutLanguage("delta".into()),
                ),
                (
                    "printer-state-reasons",
                    IppValue::Array(vec![
                        IppValue::Keyword("media-low".into()),
                        IppValue::Integer(4),
                        IppValue::Keyword("toner-low".into()),
                    ]),
                ),
            ],
        );

        let record = PrinterRecord::from_group(&reasons);
        assert_eq!(record.state_reasons, vec!["media-low", "toner-low"]);
    }

    #[test]
    fn single_keyword_becomes_one_element_list() {
        let reasons = group(
            DelimiterTag::JobAttributes,
            vec![
                ("job-id", IppValue::Integer(1)),
                (
                    "job-state-reasons",
                    IppValue::Keyword("job-printing".into()),
                ),
            ],
        );

        let record = JobRecord::from_group(&reasons);
        assert_eq!(record.state_reasons, vec!["job-printing"]);
    }

    #[test]
    fn interleaved_groups_decode_with_one_cursor_each() {
        let groups = vec![
            printer_group("alpha"),
            job_group(1, "alpha"),
            printer_group("beta"),
            job_group(2, "beta"),
        ];

        let mut cursor = GroupCursor::over(&groups);
        let mut printers = Vec::new();
        while let Some(group) = cursor.next_group(DelimiterTag::PrinterAttributes) {
            printers.push(PrinterRecord::from_group(group));
        }
        assert_eq!(printers.len(), 2);

        let mut cursor = GroupCursor::over(&groups);
        let mut jobs = Vec::new();
        while let Some(group) = cursor.next_group(DelimiterTag::JobAttributes) {
            jobs.push(JobRecord::from_group(group));
        }
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, 1);
        assert_eq!(jobs[1].id, 2);
    }
}
