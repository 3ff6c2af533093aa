pub mod executor;
pub mod selector;

pub use executor::{execute, DeletionOutcome, OutcomeStatus, RunMode};
pub use selector::{order_candidates, select, DeletionDecision, Ordering};
