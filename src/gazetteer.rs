// src/gazetteer.rs
//! Known places and their coordinates, in declared order.
//!
//! The table is an ordered list, not a map: when an article names several places,
//! the entry declared first wins. Never re-sort it.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOCATIONS_TOML: &str = include_str!("../config/locations.toml");
pub const ENV_LOCATIONS_CONFIG_PATH: &str = "LOCATIONS_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct LocationsFile {
    locations: Vec<LocationEntry>,
}

#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<LocationEntry>,
    // case-folded names, index-aligned with `entries`
    folded: Vec<String>,
}

impl Gazetteer {
    pub fn new(entries: Vec<LocationEntry>) -> anyhow::Result<Self> {
        if entries.is_empty() {
            bail!("location table is empty");
        }
        for e in &entries {
            if e.name.trim().is_empty() {
                bail!("location with empty name");
            }
            if !e.latitude.is_finite() || !e.longitude.is_finite() {
                bail!("location `{}` has non-finite coordinates", e.name);
            }
        }
        let folded = entries.iter().map(|e| e.name.trim().to_lowercase()).collect();
        Ok(Self { entries, folded })
    }

    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_toml_str(DEFAULT_LOCATIONS_TOML).context("embedded location table")
    }

    /// `LOCATIONS_CONFIG_PATH` if set, otherwise the embedded table.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var(ENV_LOCATIONS_CONFIG_PATH) {
            Ok(p) => Self::from_path(&PathBuf::from(p)),
            Err(_) => Self::builtin(),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading locations from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("loading locations from {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let file: LocationsFile = toml::from_str(s)?;
        Self::new(file.locations)
    }

    /// First entry (declared order) whose name occurs in the lower-cased `content`.
    pub fn resolve(&self, content: &str) -> Option<&LocationEntry> {
        self.folded
            .iter()
            .position(|name| content.contains(name.as_str()))
            .map(|i| &self.entries[i])
    }

    pub fn entries(&self) -> &[LocationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
