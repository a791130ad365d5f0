// src/severity.rs
//! Severity scoring: a declarative list of independent rules, summed, then tiered.
//!
//! Rules (all weights come from `[severity]` in the lexicon):
//! - `country_pair`  : both names of a high-risk pair plus a military context term; once
//! - `casualties`    : number next to a casualty word, mapped through a threshold table,
//!                     halved when nothing marks the report as current
//! - phrase rules    : fixed weight when any phrase is present (title or full content)
//!
//! Tiers are checked from the top: `critical`, `high`, `medium`, `low`.
//! A total below `low` means "not a reportable event".
//!
//! The scorer assumes the invalidation veto already ran.

use anyhow::{bail, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::content::NormalizedContent;
use crate::lexicon::{first_hit, normalize_phrases};

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct SeverityCfg {
    #[serde(default)]
    pub current_event: Vec<String>,
    pub tiers: TierCfg,
    pub casualties: CasualtyCfg,
    pub country_pairs: CountryPairCfg,
    #[serde(default)]
    pub rules: Vec<PhraseRuleCfg>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TierCfg {
    pub critical: i32,
    pub high: i32,
    pub medium: i32,
    pub low: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CasualtyCfg {
    pub words: Vec<String>,
    #[serde(default)]
    pub kill_verbs: Vec<String>,
    pub floor: i32,
    /// `[min_count, base_score]` pairs.
    pub thresholds: Vec<(u64, i32)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryPairCfg {
    pub weight: i32,
    #[serde(default)]
    pub context: Vec<String>,
    pub pairs: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleScope {
    #[default]
    Content,
    Title,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhraseRuleCfg {
    pub id: String,
    #[serde(default)]
    pub scope: RuleScope,
    pub weight: i32,
    pub any: Vec<String>,
}

/* ----------------------------
Severity tiers
---------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

impl TierCfg {
    fn validate(&self) -> anyhow::Result<()> {
        if !(self.critical > self.high && self.high > self.medium && self.medium > self.low) {
            bail!(
                "severity tiers must strictly descend: critical={} high={} medium={} low={}",
                self.critical,
                self.high,
                self.medium,
                self.low
            );
        }
        if self.low < 1 {
            bail!("severity.tiers.low must be >= 1 (0 means no event)");
        }
        Ok(())
    }

    /// Map a total to a tier, `None` when it stays below `low`.
    pub fn tier_for(&self, score: i32) -> Option<Severity> {
        if score >= self.critical {
            Some(Severity::Critical)
        } else if score >= self.high {
            Some(Severity::High)
        } else if score >= self.medium {
            Some(Severity::Medium)
        } else if score >= self.low {
            Some(Severity::Low)
        } else {
            None
        }
    }
}

/* ----------------------------
Compiled rules
---------------------------- */

/// Inputs every rule sees.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Lower-cased title + description.
    pub content: &'a str,
    /// Lower-cased title only.
    pub title: &'a str,
}

#[derive(Debug, Clone)]
pub struct PhraseRule {
    pub id: String,
    pub scope: RuleScope,
    pub weight: i32,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CountryPairRule {
    pub weight: i32,
    pub context: Vec<String>,
    pub pairs: Vec<(String, String)>,
}

impl CountryPairRule {
    /// First configured pair present in `content`.
    pub fn matching_pair(&self, content: &str) -> Option<(&str, &str)> {
        if !self.context.is_empty() && first_hit(content, &self.context).is_none() {
            return None;
        }
        self.pairs
            .iter()
            .find(|(a, b)| content.contains(a.as_str()) && content.contains(b.as_str()))
            .map(|(a, b)| (a.as_str(), b.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct CasualtyRule {
    number_first: Regex,
    verb_first: Option<Regex>,
    /// Sorted by minimum count, highest first.
    thresholds: Vec<(u64, i32)>,
    floor: i32,
    current_event: Vec<String>,
}

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d[\d,]*$").expect("number regex"));

impl CasualtyRule {
    fn compile(cfg: CasualtyCfg, current_event: Vec<String>) -> anyhow::Result<Self> {
        let words = normalize_phrases(cfg.words);
        if words.is_empty() {
            bail!("severity.casualties.words must not be empty");
        }
        let alt = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let number_first = Regex::new(&format!(r"(\d[\d,]*)\s*(?:{alt})"))
            .context("casualty number-first regex")?;

        let verbs = normalize_phrases(cfg.kill_verbs);
        let verb_first = if verbs.is_empty() {
            None
        } else {
            let alt = verbs
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                Regex::new(&format!(r"\b(?:{alt})\s+(?:at\s+least\s+)?(\d[\d,]*)"))
                    .context("casualty verb-first regex")?,
            )
        };

        let mut thresholds = cfg.thresholds;
        thresholds.sort_by(|a, b| b.0.cmp(&a.0));
        // A higher count must never earn less.
        let mut prev = i32::MAX;
        for &(min, base) in &thresholds {
            if base > prev {
                bail!("severity.casualties.thresholds not monotonic at count {min}");
            }
            prev = base;
        }
        if cfg.floor > prev {
            bail!("severity.casualties.floor exceeds the lowest threshold score");
        }

        Ok(Self {
            number_first,
            verb_first,
            thresholds,
            floor: cfg.floor,
            current_event,
        })
    }

    /// First casualty figure in text order ("12 killed", "kills at least 40").
    pub fn extract_count(&self, content: &str) -> Option<u64> {
        let a = self
            .number_first
            .captures(content)
            .and_then(|c| c.get(1));
        let b = self
            .verb_first
            .as_ref()
            .and_then(|re| re.captures(content))
            .and_then(|c| c.get(1));
        let m = match (a, b) {
            (Some(x), Some(y)) => {
                if x.start() <= y.start() {
                    x
                } else {
                    y
                }
            }
            (Some(x), None) | (None, Some(x)) => x,
            (None, None) => return None,
        };
        parse_count(m.as_str())
    }

    /// Base score for a casualty count (before the recency halving).
    pub fn base_for(&self, count: u64) -> i32 {
        self.thresholds
            .iter()
            .find(|(min, _)| count >= *min)
            .map(|(_, base)| *base)
            .unwrap_or(self.floor)
    }

    pub fn is_current(&self, content: &str) -> bool {
        first_hit(content, &self.current_event).is_some()
    }

    fn evaluate(&self, content: &str) -> i32 {
        let Some(count) = self.extract_count(content) else {
            return 0;
        };
        let base = self.base_for(count);
        if self.is_current(content) {
            base
        } else {
            base / 2
        }
    }
}

fn parse_count(raw: &str) -> Option<u64> {
    if !NUMBER.is_match(raw) {
        return None;
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    // Only overflow can fail here; a figure that large is certainly "many".
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

/// One independent additive signal.
#[derive(Debug, Clone)]
pub enum ScoringRule {
    CountryPair(CountryPairRule),
    Casualties(CasualtyRule),
    Phrases(PhraseRule),
}

impl ScoringRule {
    pub fn id(&self) -> &str {
        match self {
            Self::CountryPair(_) => "country_pair",
            Self::Casualties(_) => "casualties",
            Self::Phrases(r) => &r.id,
        }
    }

    /// Points this rule contributes; 0 when it does not fire.
    pub fn evaluate(&self, ctx: &ScoringContext<'_>) -> i32 {
        match self {
            Self::CountryPair(r) => {
                if r.matching_pair(ctx.content).is_some() {
                    r.weight
                } else {
                    0
                }
            }
            Self::Casualties(r) => r.evaluate(ctx.content),
            Self::Phrases(r) => {
                let haystack = match r.scope {
                    RuleScope::Content => ctx.content,
                    RuleScope::Title => ctx.title,
                };
                if first_hit(haystack, &r.phrases).is_some() {
                    r.weight
                } else {
                    0
                }
            }
        }
    }
}

/// Total plus the rules that fired, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub total: i32,
    pub hits: Vec<(String, i32)>,
}

impl ScoreBreakdown {
    pub fn weight_of(&self, id: &str) -> Option<i32> {
        self.hits.iter().find(|(r, _)| r == id).map(|(_, w)| *w)
    }
}

#[derive(Debug, Clone)]
pub struct SeverityScorer {
    rules: Vec<ScoringRule>,
    tiers: TierCfg,
}

impl SeverityScorer {
    pub fn compile(cfg: SeverityCfg) -> anyhow::Result<Self> {
        cfg.tiers.validate()?;
        let current_event = normalize_phrases(cfg.current_event);

        let mut rules = Vec::with_capacity(cfg.rules.len() + 2);
        rules.push(ScoringRule::CountryPair(CountryPairRule {
            weight: cfg.country_pairs.weight,
            context: normalize_phrases(cfg.country_pairs.context),
            pairs: cfg
                .country_pairs
                .pairs
                .into_iter()
                .map(|(a, b)| (a.trim().to_lowercase(), b.trim().to_lowercase()))
                .filter(|(a, b)| !a.is_empty() && !b.is_empty())
                .collect(),
        }));
        rules.push(ScoringRule::Casualties(CasualtyRule::compile(
            cfg.casualties,
            current_event,
        )?));

        for r in cfg.rules {
            let phrases = normalize_phrases(r.any);
            if phrases.is_empty() {
                bail!("severity rule `{}` has no phrases", r.id);
            }
            rules.push(ScoringRule::Phrases(PhraseRule {
                id: r.id,
                scope: r.scope,
                weight: r.weight,
                phrases,
            }));
        }

        Ok(Self {
            rules,
            tiers: cfg.tiers,
        })
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    pub fn tiers(&self) -> &TierCfg {
        &self.tiers
    }

    pub fn rule(&self, id: &str) -> Option<&ScoringRule> {
        self.rules.iter().find(|r| r.id() == id)
    }

    /// Sum every rule over the content and the raw title.
    pub fn score(&self, content: &NormalizedContent, title: &str) -> ScoreBreakdown {
        let title = title.to_lowercase();
        let ctx = ScoringContext {
            content: content.as_str(),
            title: &title,
        };
        let mut out = ScoreBreakdown::default();
        for rule in &self.rules {
            let w = rule.evaluate(&ctx);
            if w != 0 {
                out.total += w;
                out.hits.push((rule.id().to_string(), w));
            }
        }
        out
    }

    /// Tier for the article, or `None` when it is not a reportable event.
    pub fn assess(&self, content: &NormalizedContent, title: &str) -> Option<Severity> {
        self.tiers.tier_for(self.score(content, title).total)
    }
}
