// src/relevance.rs
//! Relevance gate: does the article mention conflict vocabulary at all?

use anyhow::bail;
use serde::Deserialize;

use crate::content::NormalizedContent;
use crate::lexicon::{first_hit, normalize_phrases};

#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceCfg {
    pub keywords: Vec<String>,
}

/// Literal substring match against the keyword list.
/// No word boundaries: "war" matches inside "warm".
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    keywords: Vec<String>,
}

impl RelevanceFilter {
    pub fn compile(cfg: RelevanceCfg) -> anyhow::Result<Self> {
        let keywords = normalize_phrases(cfg.keywords);
        if keywords.is_empty() {
            bail!("relevance.keywords must not be empty");
        }
        Ok(Self { keywords })
    }

    pub fn is_relevant(&self, content: &NormalizedContent) -> bool {
        self.first_match(content).is_some()
    }

    /// The first keyword (declared order) present in `content`.
    pub fn first_match(&self, content: &NormalizedContent) -> Option<&str> {
        first_hit(content.as_str(), &self.keywords)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
