use crate::scanner::Candidate;
use clap::ValueEnum;

/// How matched candidates are arranged (oldest first) before selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Ordering {
    /// Lexical by file name.
    #[default]
    Name,
    /// Directory enumeration order, untouched.
    Listing,
    /// By the date embedded in the file name; undated names sort last.
    Date,
}

/// Candidates of one scan split into the ones to delete and the ones kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeletionDecision {
    pub delete: Vec<Candidate>,
    pub retain: Vec<Candidate>,
}

pub fn order_candidates(candidates: &mut [Candidate], ordering: Ordering) {
    match ordering {
        Ordering::Listing => {}
        Ordering::Name => candidates.sort_by(|a, b| a.file_name.cmp(&b.file_name)),
        Ordering::Date => candidates.sort_by(|a, b| {
            (a.date.is_none(), a.date, &a.file_name).cmp(&(b.date.is_none(), b.date, &b.file_name))
        }),
    }
}

/// Split oldest-first `candidates` so that exactly `retain_count` of the
/// newest survive. With `retain_count` or fewer candidates nothing is deleted.
pub fn select(mut candidates: Vec<Candidate>, retain_count: usize) -> DeletionDecision {
    if candidates.len() <= retain_count {
        return DeletionDecision {
            delete: Vec::new(),
            retain: candidates,
        };
    }

    let retain = candidates.split_off(candidates.len() - retain_count);
    DeletionDecision {
        delete: candidates,
        retain,
    }
}
