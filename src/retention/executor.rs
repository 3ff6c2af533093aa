use crate::retention::DeletionDecision;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Report what would be removed without touching the filesystem.
    #[default]
    Preview,
    Delete,
}

impl RunMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            RunMode::Preview
        } else {
            RunMode::Delete
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Previewed,
    Removed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub path: PathBuf,
    pub status: OutcomeStatus,
}

/// Apply the `delete` half of a decision. Every removal is attempted
/// independently; one failure does not stop the rest.
pub fn execute(decision: &DeletionDecision, mode: RunMode) -> Vec<DeletionOutcome> {
    decision
        .delete
        .iter()
        .map(|candidate| {
            let status = match mode {
                RunMode::Preview => {
                    info!("Dry run, would delete: {}", candidate.path.display());
                    OutcomeStatus::Previewed
                }
                RunMode::Delete => {
                    info!("Deleting: {}", candidate.path.display());
                    match fs::remove_file(&candidate.path) {
                        Ok(()) => {
                            info!("Deleted: {}", candidate.path.display());
                            OutcomeStatus::Removed
                        }
                        Err(e) => {
                            error!("Failed to delete '{}': {}", candidate.path.display(), e);
                            OutcomeStatus::Failed(e.to_string())
                        }
                    }
                }
            };
            DeletionOutcome {
                path: candidate.path.clone(),
                status,
            }
        })
        .collect()
}
