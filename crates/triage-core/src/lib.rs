pub mod errors;
pub mod queue;
pub mod record;
pub mod sequence;

pub use errors::AdmitError;
pub use queue::TriageQueue;
pub use record::{AdmissionRecord, Severity};
pub use sequence::SequenceAllocator;
