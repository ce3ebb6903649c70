/// Monotonic counters for arrival tokens and lifetime treated total.
/// Both survive restarts via the state store; neither ever decreases.
#[derive(Clone, Debug)]
pub struct SequenceAllocator {
    next_arrival: u64,
    treated: u64,
}

impl SequenceAllocator {
    /// Fresh counters: first arrival token is 1, nothing treated yet.
    pub fn new() -> Self {
        Self {
            next_arrival: 1,
            treated: 0,
        }
    }

    /// Allocate the next arrival token. Called exactly once per admitted
    /// record, after validation passes; a rejected admission must not
    /// consume a token.
    pub fn next_arrival(&mut self) -> u64 {
        let token = self.next_arrival;
        self.next_arrival += 1;
        token
    }

    /// The token the next admission will receive, without consuming it.
    pub fn peek_next_arrival(&self) -> u64 {
        self.next_arrival
    }

    /// Count one successful treatment.
    pub fn record_treated(&mut self) {
        self.treated += 1;
    }

    pub fn treated(&self) -> u64 {
        self.treated
    }

    /// Rehydrate counters from persisted state. Never moves a counter
    /// backwards, so a stale or default-valued save cannot cause arrival
    /// token reuse.
    pub fn restore(&mut self, next_arrival: u64, treated: u64) {
        self.next_arrival = self.next_arrival.max(next_arrival);
        self.treated = self.treated.max(treated);
    }
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}
