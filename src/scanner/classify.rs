use crate::error::Error;
use crate::matcher::MatchRule;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// A file that matched a rule during classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub file_name: String,
    /// Date embedded in the file name, when the rule's format yields one.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default)]
pub struct Classification {
    /// Matched files, in directory enumeration order.
    pub matched: Vec<Candidate>,
    pub unmatched: Vec<String>,
}

/// Partition the immediate entries of `dir` against `rule`.
///
/// Subdirectories are skipped and nothing below the first level is visited.
/// A directory that cannot be opened is returned as an error for the caller
/// to report; an unreadable individual entry is logged and skipped.
pub fn classify_dir(dir: &Path, rule: &MatchRule) -> Result<Classification, Error> {
    let metadata = fs::metadata(dir).map_err(|err| Error::ReadDir {
        path: dir.to_path_buf(),
        source: err,
    })?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut classification = Classification::default();

    for entry_result in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(Error::ReadDir {
                    path: dir.to_path_buf(),
                    source: err.into(),
                });
            }
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), err);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !rule.prefilter(&file_name) {
            continue;
        }

        if rule.is_match(&file_name) {
            info!("Matched: {}", file_name);
            classification.matched.push(Candidate {
                date: rule.embedded_date(&file_name),
                path: entry.into_path(),
                file_name,
            });
        } else {
            warn!("Not matched: {}", file_name);
            classification.unmatched.push(file_name);
        }
    }

    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classify_skips_subdirectories_and_nested_files() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("app-20230101.log"), "a").unwrap();
        fs::create_dir(tmp.path().join("app-20230102.log")).unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("app-20230103.log"), "c").unwrap();

        let rule = MatchRule::synthesize(".log", "YYYYMMDD").unwrap();
        let result = classify_dir(tmp.path(), &rule).unwrap();

        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].file_name, "app-20230101.log");
        assert_eq!(result.matched[0].path, tmp.path().join("app-20230101.log"));
        assert_eq!(result.matched[0].date, NaiveDate::from_ymd_opt(2023, 1, 1));
    }

    #[test]
    fn test_classify_partitions_by_rule() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("app-20230101.log"), "a").unwrap();
        fs::write(tmp.path().join("app.log"), "b").unwrap();
        fs::write(tmp.path().join("notes.md"), "c").unwrap();

        let rule = MatchRule::synthesize(".log", "YYYYMMDD").unwrap();
        let result = classify_dir(tmp.path(), &rule).unwrap();

        assert_eq!(result.matched.len(), 1);
        // notes.md never passes the suffix prefilter
        assert_eq!(result.unmatched, vec!["app.log".to_string()]);
    }

    #[test]
    fn test_classify_missing_directory_is_error() {
        let tmp = tempdir().unwrap();
        let rule = MatchRule::synthesize(".log", "YYYYMMDD").unwrap();
        let err = classify_dir(&tmp.path().join("missing"), &rule).unwrap_err();
        assert!(matches!(err, Error::ReadDir { .. }));
    }

    #[test]
    fn test_classify_file_path_is_error() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("app-20230101.log");
        fs::write(&file, "a").unwrap();

        let rule = MatchRule::synthesize(".log", "YYYYMMDD").unwrap();
        let err = classify_dir(&file, &rule).unwrap_err();
        assert!(matches!(err, Error::NotADirectory(_)));
    }
}
