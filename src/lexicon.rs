// src/lexicon.rs
//! Keyword tables for every classification stage, loaded from TOML once at startup.
//!
//! The shipped table lives in `config/lexicon.toml` and is embedded into the binary.
//! `LEXICON_CONFIG_PATH` points at a replacement file; it is read once and never
//! reloaded, so every classification call sees the same immutable data.
//!
//! Each section compiles into the stage that owns it:
//! - `[relevance]`      → [`RelevanceFilter`]
//! - `[invalidators]`   → [`InvalidationFilter`]
//! - `[severity]`       → [`SeverityScorer`]
//! - `[[categories]]`   → [`CategoryClassifier`]

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::category::{CategoryCfg, CategoryClassifier};
use crate::invalidation::{InvalidationFilter, InvalidatorCfg};
use crate::relevance::{RelevanceCfg, RelevanceFilter};
use crate::severity::{SeverityCfg, SeverityScorer};

pub const DEFAULT_LEXICON_TOML: &str = include_str!("../config/lexicon.toml");
pub const ENV_LEXICON_CONFIG_PATH: &str = "LEXICON_CONFIG_PATH";

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconRoot {
    pub relevance: RelevanceCfg,
    pub invalidators: InvalidatorCfg,
    pub severity: SeverityCfg,
    #[serde(default)]
    pub categories: Vec<CategoryCfg>,
}

/* ----------------------------
Compiled lexicon
---------------------------- */

/// All stage tables, compiled and validated.
#[derive(Debug)]
pub struct Lexicon {
    pub relevance: RelevanceFilter,
    pub invalidation: InvalidationFilter,
    pub severity: SeverityScorer,
    pub categories: CategoryClassifier,
}

impl Lexicon {
    /// The embedded default table.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_toml_str(DEFAULT_LEXICON_TOML).context("embedded lexicon")
    }

    /// `LEXICON_CONFIG_PATH` if set, otherwise the embedded table.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var(ENV_LEXICON_CONFIG_PATH) {
            Ok(p) => Self::from_path(&PathBuf::from(p)),
            Err(_) => Self::builtin(),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading lexicon from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("loading lexicon from {}", path.display()))
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let root: LexiconRoot = toml::from_str(toml_str)?;
        Ok(Self {
            relevance: RelevanceFilter::compile(root.relevance)?,
            invalidation: InvalidationFilter::compile(root.invalidators),
            severity: SeverityScorer::compile(root.severity)?,
            categories: CategoryClassifier::compile(root.categories),
        })
    }
}

/// Trim + lowercase, drop empties and repeats. Keeps first-seen order.
pub(crate) fn normalize_phrases(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

/// First phrase of `phrases` found in `text` (plain substring).
pub(crate) fn first_hit<'a>(text: &str, phrases: &'a [String]) -> Option<&'a str> {
    phrases
        .iter()
        .find(|p| text.contains(p.as_str()))
        .map(String::as_str)
}
