pub mod error;
pub mod state;

pub use error::StoreError;
pub use state::{LoadOutcome, PersistedState, StateFile};
