pub mod pattern;

pub use pattern::{DateField, MatchRule};
