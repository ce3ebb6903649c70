//! The session controller: owns the one queue/allocator pair for the process
//! lifetime and brackets it with durable load and save.

use parking_lot::Mutex;
use tracing::{info, instrument, warn};

use triage_core::{AdmissionRecord, AdmitError, SequenceAllocator, Severity, TriageQueue};
use triage_store::{LoadOutcome, PersistedState, StateFile, StoreError};

/// Waiting/critical/treated totals for the stats surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionStats {
    pub waiting: usize,
    pub critical: usize,
    pub treated: u64,
}

/// Everything that must mutate together, behind one lock so admit and
/// treat never interleave partially.
struct Inner {
    queue: TriageQueue,
    seq: SequenceAllocator,
}

/// One triage session. Constructed once at process start and passed down;
/// the state file is touched only in `start` and `shutdown`.
pub struct Session {
    inner: Mutex<Inner>,
    store: StateFile,
}

impl Session {
    /// Open a session, rehydrating prior state if any. Absent state means a
    /// first run; corrupt state is reported and discarded, since starting
    /// with an empty queue beats refusing to start.
    pub fn start(store: StateFile) -> Self {
        let mut queue = TriageQueue::new();
        let mut seq = SequenceAllocator::new();

        match store.load() {
            LoadOutcome::Loaded(state) => {
                seq.restore(state.next_arrival, state.treated);
                queue = TriageQueue::from_records(state.waiting);
            }
            LoadOutcome::Absent => {
                info!(path = %store.path().display(), "no prior state, starting fresh");
            }
            LoadOutcome::Corrupt(detail) => {
                warn!(%detail, "prior state unreadable, starting fresh");
            }
        }

        Self {
            inner: Mutex::new(Inner { queue, seq }),
            store,
        }
    }

    /// Register a patient. Validation happens before an arrival token is
    /// allocated, so a rejected admission consumes nothing.
    #[instrument(skip(self))]
    pub fn admit(
        &self,
        name: &str,
        severity: u8,
        condition: Option<&str>,
    ) -> Result<AdmissionRecord, AdmitError> {
        if name.trim().is_empty() {
            return Err(AdmitError::EmptyName);
        }
        let severity = Severity::try_from(severity)?;
        let condition = condition.unwrap_or(severity.label());

        let mut inner = self.inner.lock();
        let arrival = inner.seq.next_arrival();
        let record = AdmissionRecord::new(name, severity, arrival, condition)?;
        inner.queue.admit(record.clone());

        info!(name = %record.name, severity = %record.severity, arrival, "patient admitted");
        Ok(record)
    }

    /// Treat the most urgent waiting patient. `None` means nothing to treat;
    /// the treated counter only moves on an actual treatment.
    #[instrument(skip(self))]
    pub fn treat_next(&self) -> Option<AdmissionRecord> {
        let mut inner = self.inner.lock();
        let record = inner.queue.serve_next()?;
        inner.seq.record_treated();
        info!(name = %record.name, severity = %record.severity, "patient treated");
        Some(record)
    }

    /// The patient `treat_next` would pick, for display.
    pub fn peek_next(&self) -> Option<AdmissionRecord> {
        self.inner.lock().queue.peek_next().cloned()
    }

    /// Fully ordered view of the waiting queue.
    pub fn snapshot(&self) -> Vec<AdmissionRecord> {
        self.inner.lock().queue.snapshot_in_order()
    }

    pub fn waiting(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn count_with_severity(&self, severity: Severity) -> usize {
        self.inner.lock().queue.count_with_severity(severity)
    }

    pub fn treated_count(&self) -> u64 {
        self.inner.lock().seq.treated()
    }

    pub fn stats(&self) -> SessionStats {
        let inner = self.inner.lock();
        SessionStats {
            waiting: inner.queue.len(),
            critical: inner.queue.critical_count(),
            treated: inner.seq.treated(),
        }
    }

    /// Persist the full current state. Called on every termination path;
    /// a failure here is reported by the caller but does not block exit.
    #[instrument(skip(self))]
    pub fn shutdown(&self) -> Result<(), StoreError> {
        let state = {
            let inner = self.inner.lock();
            PersistedState {
                waiting: inner.queue.iter().cloned().collect(),
                next_arrival: inner.seq.peek_next_arrival(),
                treated: inner.seq.treated(),
            }
        };
        self.store.save(&state)
    }
}
