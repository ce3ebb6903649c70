//! Priority-ordered admission queue: severity first, arrival order within a
//! severity class.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::record::{AdmissionRecord, Severity};

/// Min-ordered multiset of waiting admissions. Not internally synchronized;
/// the session layer serializes all mutation behind one mutex.
#[derive(Clone, Debug, Default)]
pub struct TriageQueue {
    heap: BinaryHeap<Reverse<AdmissionRecord>>,
}

impl TriageQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from persisted records. Input order is irrelevant;
    /// the ordering rule is re-derived here.
    pub fn from_records(records: impl IntoIterator<Item = AdmissionRecord>) -> Self {
        Self {
            heap: records.into_iter().map(Reverse).collect(),
        }
    }

    /// Insert a record. Always succeeds.
    pub fn admit(&mut self, record: AdmissionRecord) {
        self.heap.push(Reverse(record));
    }

    /// Remove and return the most urgent record, or `None` when nobody is
    /// waiting. The caller is responsible for counting the treatment.
    pub fn serve_next(&mut self) -> Option<AdmissionRecord> {
        self.heap.pop().map(|Reverse(record)| record)
    }

    /// The record `serve_next` would return, without removing it.
    pub fn peek_next(&self) -> Option<&AdmissionRecord> {
        self.heap.peek().map(|Reverse(record)| record)
    }

    /// All waiting records, fully sorted under the ordering rule. Serving
    /// the whole queue yields exactly this sequence.
    pub fn snapshot_in_order(&self) -> Vec<AdmissionRecord> {
        let mut records: Vec<AdmissionRecord> =
            self.heap.iter().map(|Reverse(record)| record.clone()).collect();
        records.sort_unstable();
        records
    }

    /// Waiting records in arbitrary order, for persistence.
    pub fn iter(&self) -> impl Iterator<Item = &AdmissionRecord> {
        self.heap.iter().map(|Reverse(record)| record)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// How many waiting records carry the given severity.
    pub fn count_with_severity(&self, severity: Severity) -> usize {
        self.iter().filter(|record| record.severity == severity).count()
    }

    /// Waiting records in the critical class.
    pub fn critical_count(&self) -> usize {
        self.count_with_severity(Severity::Critical)
    }
}
