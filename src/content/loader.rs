//! Load per-source raw card dictionaries from the data directory.
//! A missing or unreadable source contributes nothing; resolution proceeds
//! with whatever sources did load.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::content::source::{EnabledSources, BASE_SOURCE};

pub const DEFAULT_DATA_DIR: &str = "data";

/// One content source's raw contribution: JSON dictionaries keyed by raw
/// card id, consumed as opaque records by the resolver.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub data_version: Option<String>,
    #[serde(default)]
    pub upgrades: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub ships: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub squadrons: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub objectives: BTreeMap<String, serde_json::Value>,
}

/// Source tag -> contribution, in sorted tag order.
pub type RawBySource = BTreeMap<String, RawSource>;

pub fn source_file_path(data_dir: &Path, tag: &str) -> PathBuf {
    data_dir.join("sources").join(format!("{tag}.json"))
}

/// Load one source dictionary. Returns None if the file is missing; a file
/// that exists but fails to parse is logged and skipped.
pub fn load_source(data_dir: &Path, tag: &str) -> Option<RawSource> {
    let path = source_file_path(data_dir, tag);
    let raw = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(source) => Some(source),
        Err(err) => {
            eprintln!("loader: skipping source '{tag}' ({}): {err}", path.display());
            None
        }
    }
}

/// Load the base source plus every enabled optional source.
pub fn load_raw_content(data_dir: &Path, enabled: &EnabledSources) -> RawBySource {
    let mut raw = BTreeMap::new();
    if let Some(source) = load_source(data_dir, BASE_SOURCE) {
        raw.insert(BASE_SOURCE.to_string(), source);
    }
    for tag in enabled.iter() {
        if let Some(source) = load_source(data_dir, tag) {
            raw.insert(tag.to_string(), source);
        }
    }
    raw
}
