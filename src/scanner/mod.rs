pub mod classify;

pub use classify::{classify_dir, Candidate, Classification};
