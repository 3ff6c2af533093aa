use crate::error::Error;
use crate::policy::{self, ResolvedItem};
use config::{Config, File as ConfigFile, FileFormat};
use glob::{glob_with, MatchOptions, Pattern};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const DEFAULT_CONF_DIR: &str = "/etc/logdel.d";

const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// One configuration file as written on disk.
///
/// A key left empty in YAML (`paths:` with no value) reads as its default,
/// so a half-written item is dropped on its own later instead of failing the
/// whole file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    #[serde(deserialize_with = "null_as_default")]
    pub global: GlobalSection,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<ItemSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GlobalSection {
    #[serde(deserialize_with = "null_as_default")]
    pub remained_num: usize,
    #[serde(deserialize_with = "null_as_default")]
    pub date_formats: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub suffixes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemSection {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub paths: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub remained_num: usize,
    #[serde(deserialize_with = "null_as_default")]
    pub date_formats: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub suffixes: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Items resolved from a single configuration file.
#[derive(Debug, Clone)]
pub struct PolicySet {
    pub source: PathBuf,
    pub items: Vec<ResolvedItem>,
}

/// List `*.yaml` / `*.yml` files (any case) directly inside `conf_dir`, sorted.
pub fn discover_config_files(conf_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let metadata = fs::metadata(conf_dir).map_err(|source| Error::ConfigDir {
        path: conf_dir.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory(conf_dir.to_path_buf()));
    }

    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    let base = Pattern::escape(&conf_dir.to_string_lossy());

    let mut files = Vec::new();
    for ext in CONFIG_EXTENSIONS {
        for entry in glob_with(&format!("{}/*.{}", base, ext), options)? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(err) => warn!("Skipping unreadable configuration entry: {}", err),
            }
        }
    }
    files.sort();
    files.dedup();

    Ok(files)
}

pub fn load_document(path: &Path) -> Result<ConfigDocument, Error> {
    let builder = Config::builder()
        .add_source(ConfigFile::from(path).format(FileFormat::Yaml))
        .build()?;
    Ok(builder.try_deserialize::<ConfigDocument>()?)
}

/// Discover, decode and resolve every configuration file in `conf_dir`.
///
/// A file that fails to decode is logged and skipped. Fails only when the
/// directory cannot be read or holds no configuration file at all.
pub fn load_policies(conf_dir: &Path) -> Result<Vec<PolicySet>, Error> {
    let files = discover_config_files(conf_dir)?;
    if files.is_empty() {
        return Err(Error::NoConfigFiles(conf_dir.to_path_buf()));
    }
    info!("Configuration files in {}: {:?}", conf_dir.display(), files);

    let mut sets = Vec::new();
    for file in files {
        let document = match load_document(&file) {
            Ok(document) => document,
            Err(err) => {
                error!("Skipping configuration file {}: {}", file.display(), err);
                continue;
            }
        };
        info!("Loaded configuration file {}", file.display());

        let items = policy::resolve_document(&document, &file);
        if items.is_empty() {
            warn!("No usable items in configuration file {}", file.display());
        }
        sets.push(PolicySet {
            source: file,
            items,
        });
    }

    Ok(sets)
}
