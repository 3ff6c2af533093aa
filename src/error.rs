use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Cannot read configuration directory {}: {source}", .path.display())]
    ConfigDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No configuration files found in {}", .0.display())]
    NoConfigFiles(PathBuf),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Cannot build match rule for suffix {suffix:?} and date format {date_format:?}: {reason}")]
    EmptyPattern {
        suffix: String,
        date_format: String,
        reason: &'static str,
    },

    #[error("Cannot compile match rule for suffix {suffix:?} and date format {date_format:?}: {source}")]
    Pattern {
        suffix: String,
        date_format: String,
        #[source]
        source: regex::Error,
    },

    #[error("Cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid item in {}: {reason}", .source_file.display())]
    InvalidItem {
        source_file: PathBuf,
        reason: String,
    },
}
