pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod policy;
pub mod retention;
pub mod scanner;

pub use config::{ConfigDocument, PolicySet};
pub use engine::{RunSummary, Sweep, SweepOptions};
pub use error::Error;
pub use matcher::MatchRule;
pub use policy::{GlobalDefaults, ResolvedItem};
pub use retention::{Ordering, RunMode};
