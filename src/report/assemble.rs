//! Record assembly for vpncmd reports
//!
//! A report is a flat stream of `(key, value)` pairs. Singleton commands
//! (ServerStatusGet, SessionGet, UserGet) emit one record; list commands
//! (SessionList, UserList) re-emit the same field labels per entity and mark
//! the end of each entity with a fixed terminal field. The grouping policy is
//! carried as layout data per endpoint rather than scattered string
//! comparisons.

use std::collections::HashMap;

/// One logical entity parsed from a report: field label → raw value.
///
/// A later occurrence of a key overwrites an earlier one, matching how the
/// tool re-emits labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(HashMap<String, String>);

/// Ordered records of one list report, in appearance order.
pub type RecordSet = Vec<Record>;

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Field value with surrounding whitespace removed; empty when absent.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(str::trim).unwrap_or_default().to_string()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Record {
    fn from(fields: [(&str, &str); N]) -> Self {
        Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Layout of a single-record report
#[derive(Debug, Clone, Copy)]
pub struct RecordLayout {
    /// Table-header label to skip rather than store
    pub header_key: &'static str,
}

/// Layout of a list report
#[derive(Debug, Clone, Copy)]
pub struct ListLayout {
    /// Table-header label to skip rather than store
    pub header_key: &'static str,
    /// Last field label emitted per entity; closes the current record
    pub terminal_key: &'static str,
}

/// Assemble one record from a pair stream, skipping the header key.
pub fn assemble_record<I>(pairs: I, layout: RecordLayout) -> Record
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut record = Record::new();
    for (key, value) in pairs {
        if key == layout.header_key {
            continue;
        }
        record.insert(key, value);
    }
    record
}

/// Assembler state: which record the next pair belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblerState {
    /// Accumulating fields into the record at this index
    Accumulating(usize),
}

/// Groups a flat pair stream into per-entity records.
///
/// Pairs are inserted into the current record; the terminal key is inserted
/// first and *then* advances the index, so a sibling label sharing a prefix
/// (e.g. "Transfer Bytes" next to the terminal "Transfer Packets") never
/// closes a record early. The stream simply ends; there is no explicit done
/// transition.
#[derive(Debug)]
pub struct ListAssembler {
    layout: ListLayout,
    state: AssemblerState,
    records: RecordSet,
    current: Record,
}

impl ListAssembler {
    pub fn new(layout: ListLayout) -> Self {
        Self {
            layout,
            state: AssemblerState::Accumulating(0),
            records: Vec::new(),
            current: Record::new(),
        }
    }

    /// Feed one `(key, value)` pair into the current record.
    pub fn push(&mut self, key: String, value: String) {
        if key == self.layout.header_key {
            return;
        }

        let advance = key == self.layout.terminal_key;
        self.current.insert(key, value);

        if advance {
            let AssemblerState::Accumulating(index) = self.state;
            self.records.push(std::mem::take(&mut self.current));
            self.state = AssemblerState::Accumulating(index + 1);
        }
    }

    /// Finish the stream and return the closed records.
    ///
    /// A record still open at end of stream was never closed by its terminal
    /// key (truncated output); it is dropped from the result, with a warning
    /// so the truncation is visible.
    pub fn finish(self) -> RecordSet {
        if !self.current.is_empty() {
            log::warn!(
                "dropping unterminated trailing record with {} field(s); report ended before {:?}",
                self.current.len(),
                self.layout.terminal_key
            );
        }
        self.records
    }

    /// Assemble a whole pair stream in one call.
    pub fn assemble<I>(pairs: I, layout: ListLayout) -> RecordSet
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut assembler = Self::new(layout);
        for (key, value) in pairs {
            assembler.push(key, value);
        }
        assembler.finish()
    }
}
