use crate::config;
use crate::error::Error;
use crate::matcher::MatchRule;
use crate::policy::ResolvedItem;
use crate::retention::{self, DeletionOutcome, OutcomeStatus, Ordering, RunMode};
use crate::scanner;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOptions {
    pub mode: RunMode,
    pub ordering: Ordering,
}

/// One directory to scan with one rule, under one item's retain count.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub item: String,
    pub path: PathBuf,
    pub rule: MatchRule,
    pub retain_count: usize,
}

#[derive(Debug, Default)]
pub struct Plan {
    pub work: Vec<WorkItem>,
    /// (suffix, date format) pairs that could not be turned into a rule.
    pub rule_errors: Vec<Error>,
}

/// Expand items into a flat work list, ordered suffix, then date format, then path.
pub fn plan(items: &[ResolvedItem]) -> Plan {
    let mut plan = Plan::default();

    for item in items {
        for suffix in &item.suffixes {
            for date_format in &item.date_formats {
                let rule = match MatchRule::synthesize(suffix, date_format) {
                    Ok(rule) => rule,
                    Err(err) => {
                        error!("Item '{}': {}", item.name, err);
                        plan.rule_errors.push(err);
                        continue;
                    }
                };
                for path in &item.paths {
                    plan.work.push(WorkItem {
                        item: item.name.clone(),
                        path: path.clone(),
                        rule: rule.clone(),
                        retain_count: item.retain_count,
                    });
                }
            }
        }
    }

    plan
}

#[derive(Debug)]
pub struct ScanReport {
    pub item: String,
    pub path: PathBuf,
    pub suffix: String,
    pub date_format: String,
    pub matched: usize,
    pub unmatched: usize,
    pub outcomes: Vec<DeletionOutcome>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub scans: Vec<ScanReport>,
    pub path_errors: usize,
    pub rule_errors: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn matched(&self) -> usize {
        self.scans.iter().map(|s| s.matched).sum()
    }

    pub fn previewed(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Previewed))
    }

    pub fn removed(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Removed))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.scans
            .iter()
            .flat_map(|s| s.outcomes.iter())
            .filter(|o| pred(&o.status))
            .count()
    }

    fn absorb(&mut self, other: RunSummary) {
        self.scans.extend(other.scans);
        self.path_errors += other.path_errors;
        self.rule_errors += other.rule_errors;
    }
}

pub struct Sweep {
    options: SweepOptions,
}

impl Sweep {
    pub fn new(options: SweepOptions) -> Self {
        Self { options }
    }

    /// Run every configuration file found in `conf_dir`.
    pub fn run_config_dir(&self, conf_dir: &Path) -> Result<RunSummary, Error> {
        let start = Instant::now();
        let mut summary = RunSummary::default();

        for set in config::load_policies(conf_dir)? {
            for item in &set.items {
                debug!("Item from {}: {:?}", set.source.display(), item);
            }
            summary.absorb(self.run(&set.items));
        }

        summary.duration = start.elapsed();
        Ok(summary)
    }

    /// Run the given items in sequence. Never fails as a whole: every path,
    /// rule and file error is logged, counted, and skipped.
    pub fn run(&self, items: &[ResolvedItem]) -> RunSummary {
        let start = Instant::now();
        let plan = plan(items);
        let mut summary = RunSummary {
            rule_errors: plan.rule_errors.len(),
            ..RunSummary::default()
        };

        for work in &plan.work {
            match self.run_work_item(work) {
                Ok(report) => summary.scans.push(report),
                Err(err) => {
                    error!("Item '{}': {}", work.item, err);
                    summary.path_errors += 1;
                }
            }
        }

        summary.duration = start.elapsed();
        summary
    }

    pub fn run_work_item(&self, work: &WorkItem) -> Result<ScanReport, Error> {
        info!("Reading directory {}", work.path.display());
        info!("Using pattern: {}", work.rule);
        let classification = scanner::classify_dir(&work.path, &work.rule)?;

        let matched = classification.matched.len();
        let mut candidates = classification.matched;
        retention::order_candidates(&mut candidates, self.options.ordering);

        let decision = retention::select(candidates, work.retain_count);
        if decision.delete.is_empty() {
            warn!(
                "Matched {} file(s) in {}, not more than the {} to keep",
                matched,
                work.path.display(),
                work.retain_count
            );
        }
        let outcomes = retention::execute(&decision, self.options.mode);

        Ok(ScanReport {
            item: work.item.clone(),
            path: work.path.clone(),
            suffix: work.rule.suffix().to_string(),
            date_format: work.rule.date_format().to_string(),
            matched,
            unmatched: classification.unmatched.len(),
            outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(paths: &[&str], suffixes: &[&str], formats: &[&str]) -> ResolvedItem {
        ResolvedItem {
            name: "app".to_string(),
            paths: paths.iter().map(PathBuf::from).collect(),
            retain_count: 2,
            date_formats: formats.iter().map(|s| s.to_string()).collect(),
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_plan_is_cartesian_product_in_order() {
        let plan = plan(&[item(&["/a", "/b"], &[".log", ".txt"], &["YYYYMMDD", "YYYY-MM-DD"])]);

        assert!(plan.rule_errors.is_empty());
        assert_eq!(plan.work.len(), 8);

        let keys: Vec<(String, String, PathBuf)> = plan
            .work
            .iter()
            .map(|w| {
                (
                    w.rule.suffix().to_string(),
                    w.rule.date_format().to_string(),
                    w.path.clone(),
                )
            })
            .collect();
        assert_eq!(
            keys[0],
            (".log".to_string(), "YYYYMMDD".to_string(), PathBuf::from("/a"))
        );
        assert_eq!(
            keys[1],
            (".log".to_string(), "YYYYMMDD".to_string(), PathBuf::from("/b"))
        );
        assert_eq!(
            keys[2],
            (".log".to_string(), "YYYY-MM-DD".to_string(), PathBuf::from("/a"))
        );
        assert_eq!(
            keys[4],
            (".txt".to_string(), "YYYYMMDD".to_string(), PathBuf::from("/a"))
        );
    }

    #[test]
    fn test_plan_skips_bad_rules_only() {
        let plan = plan(&[item(&["/a"], &[".log", ""], &["YYYYMMDD"])]);
        assert_eq!(plan.rule_errors.len(), 1);
        assert_eq!(plan.work.len(), 1);
        assert_eq!(plan.work[0].rule.suffix(), ".log");
    }
}
