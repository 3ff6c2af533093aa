use crate::config::{ConfigDocument, GlobalSection, ItemSection};
use crate::error::Error;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_RETAIN_COUNT: usize = 7;
pub const DEFAULT_DATE_FORMATS: &[&str] = &["YYYY-MM-DD", "YYYYMMDD", "YYYY_MM_DD"];
pub const DEFAULT_SUFFIXES: &[&str] = &[".log", ".txt"];

/// Values an item falls back to when it leaves a field empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalDefaults {
    pub retain_count: usize,
    pub date_formats: Vec<String>,
    pub suffixes: Vec<String>,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        Self {
            retain_count: DEFAULT_RETAIN_COUNT,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl GlobalDefaults {
    /// Overlay the configured `global` section on the built-in baseline.
    pub fn from_section(section: &GlobalSection) -> Self {
        let baseline = Self::default();
        Self {
            retain_count: if section.remained_num == 0 {
                baseline.retain_count
            } else {
                section.remained_num
            },
            date_formats: or_inherit(&section.date_formats, &baseline.date_formats),
            suffixes: or_inherit(&section.suffixes, &baseline.suffixes),
        }
    }
}

/// A fully populated retention policy for one named item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub name: String,
    pub paths: Vec<PathBuf>,
    pub retain_count: usize,
    pub date_formats: Vec<String>,
    pub suffixes: Vec<String>,
}

impl ResolvedItem {
    pub fn resolve(
        item: &ItemSection,
        defaults: &GlobalDefaults,
        source_file: &Path,
    ) -> Result<ResolvedItem, Error> {
        if item.name.trim().is_empty() {
            return Err(Error::InvalidItem {
                source_file: source_file.to_path_buf(),
                reason: format!("item {:?} has no name", item),
            });
        }

        let paths: Vec<PathBuf> = unique(&item.paths)
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .collect();
        if paths.is_empty() {
            return Err(Error::InvalidItem {
                source_file: source_file.to_path_buf(),
                reason: format!("item {:?} has no paths", item.name),
            });
        }

        Ok(ResolvedItem {
            name: item.name.clone(),
            paths,
            retain_count: if item.remained_num == 0 {
                defaults.retain_count
            } else {
                item.remained_num
            },
            date_formats: or_inherit(&item.date_formats, &defaults.date_formats),
            suffixes: or_inherit(&item.suffixes, &defaults.suffixes),
        })
    }
}

/// Resolve every item of a document, dropping the ones without a name or paths.
pub fn resolve_document(document: &ConfigDocument, source_file: &Path) -> Vec<ResolvedItem> {
    let defaults = GlobalDefaults::from_section(&document.global);

    document
        .items
        .iter()
        .filter_map(
            |item| match ResolvedItem::resolve(item, &defaults, source_file) {
                Ok(resolved) => Some(resolved),
                Err(err) => {
                    warn!("Ignoring item: {}", err);
                    None
                }
            },
        )
        .collect()
}

fn or_inherit(values: &[String], fallback: &[String]) -> Vec<String> {
    if values.is_empty() {
        unique(fallback)
    } else {
        unique(values)
    }
}

/// Drop repeated entries, keeping the first occurrence.
fn unique(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(value) {
            out.push(value.clone());
        }
    }
    out
}
