// src/category.rs
//! Topical label for an event. The configured list is a priority order:
//! protest, then humanitarian, then diplomatic, then political. Anything else is `conflict`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::content::NormalizedContent;
use crate::lexicon::{first_hit, normalize_phrases};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Conflict,
    Protest,
    Humanitarian,
    Diplomatic,
    Political,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Conflict => "conflict",
            Self::Protest => "protest",
            Self::Humanitarian => "humanitarian",
            Self::Diplomatic => "diplomatic",
            Self::Political => "political",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCfg {
    pub category: Category,
    pub any: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    ordered: Vec<(Category, Vec<String>)>,
}

impl CategoryClassifier {
    pub fn compile(cfg: Vec<CategoryCfg>) -> Self {
        let ordered = cfg
            .into_iter()
            .map(|c| (c.category, normalize_phrases(c.any)))
            .filter(|(_, phrases)| !phrases.is_empty())
            .collect();
        Self { ordered }
    }

    pub fn classify(&self, content: &NormalizedContent) -> Category {
        self.ordered
            .iter()
            .find(|(_, phrases)| first_hit(content.as_str(), phrases).is_some())
            .map(|(c, _)| *c)
            .unwrap_or(Category::Conflict)
    }

    /// Categories in evaluation order (the `conflict` default is implicit).
    pub fn order(&self) -> Vec<Category> {
        self.ordered.iter().map(|(c, _)| *c).collect()
    }
}
