// src/invalidation.rs
//! Invalidation veto: drops articles that talk about an event rather than report one.
//!
//! Keyword matching alone cannot tell "50 killed in new strike" from "ceremony marks
//! 50 killed a decade ago". The phrase groups below are the proxy for that:
//! - `hedging`       : speculation ("could", "might")
//! - `retrospective` : looking back ("years ago", "anniversary")
//! - `statistical`   : report framing ("study", "according to report")
//! - `ceremonial`    : remembrance ("memorial", "tribute")
//!
//! Any hit is a hard veto and runs before severity scoring.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::content::NormalizedContent;
use crate::lexicon::{first_hit, normalize_phrases};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidatorCfg {
    #[serde(default)]
    pub hedging: Vec<String>,
    #[serde(default)]
    pub retrospective: Vec<String>,
    #[serde(default)]
    pub statistical: Vec<String>,
    #[serde(default)]
    pub ceremonial: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationKind {
    Hedging,
    Retrospective,
    Statistical,
    Ceremonial,
}

impl fmt::Display for InvalidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Hedging => "hedging",
            Self::Retrospective => "retrospective",
            Self::Statistical => "statistical",
            Self::Ceremonial => "ceremonial",
        };
        f.write_str(s)
    }
}

/// Why an article was vetoed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invalidation {
    pub kind: InvalidationKind,
    pub phrase: String,
}

#[derive(Debug, Clone)]
pub struct InvalidationFilter {
    groups: Vec<(InvalidationKind, Vec<String>)>,
}

impl InvalidationFilter {
    pub fn compile(cfg: InvalidatorCfg) -> Self {
        let groups = vec![
            (InvalidationKind::Hedging, normalize_phrases(cfg.hedging)),
            (
                InvalidationKind::Retrospective,
                normalize_phrases(cfg.retrospective),
            ),
            (
                InvalidationKind::Statistical,
                normalize_phrases(cfg.statistical),
            ),
            (InvalidationKind::Ceremonial, normalize_phrases(cfg.ceremonial)),
        ];
        Self { groups }
    }

    /// First hit in group order, then phrase order. `None` means the article may proceed.
    pub fn check(&self, content: &NormalizedContent) -> Option<Invalidation> {
        self.groups.iter().find_map(|(kind, phrases)| {
            first_hit(content.as_str(), phrases).map(|p| Invalidation {
                kind: *kind,
                phrase: p.to_string(),
            })
        })
    }

    pub fn is_invalidated(&self, content: &NormalizedContent) -> bool {
        self.check(content).is_some()
    }

    pub fn phrases(&self, kind: InvalidationKind) -> &[String] {
        self.groups
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| v.as_slice())
            .unwrap_or_default()
    }
}
