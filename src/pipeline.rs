// src/pipeline.rs
//! # Classification pipeline
//! Turns raw articles into conflict events. Per article, in order:
//! 1) relevance gate        → drop as `no_keyword`
//! 2) location resolution   → drop as `no_location`
//! 3) invalidation veto     → drop as `invalidator`
//! 4) severity scoring      → drop as `low_score` when no tier is reached
//! 5) category + event construction
//!
//! Pure over immutable reference data; a `Classifier` can be shared across tasks.

use chrono::{DateTime, NaiveDate, Utc};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::category::Category;
use crate::content::NormalizedContent;
use crate::gazetteer::{Gazetteer, LocationEntry};
use crate::ingest::types::RawArticle;
use crate::ingest::{strip_html, truncate_chars};
use crate::invalidation::Invalidation;
use crate::lexicon::Lexicon;
use crate::severity::{ScoreBreakdown, Severity};

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// One reportable event, as sent to map clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictEvent {
    pub id: usize,
    pub title: String,
    pub location: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    pub severity: Severity,
    pub description: String,
    /// `YYYY-MM-DD`, UTC.
    pub date: String,
    pub category: Category,
    #[serde(rename = "sources")]
    pub source_count: u32,
    pub article_url: String,
    pub source_name: String,
}

/// Per-stage rejection counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyStats {
    pub total_articles: usize,
    pub dropped_no_keyword: usize,
    pub dropped_no_location: usize,
    pub dropped_invalidator: usize,
    pub dropped_low_score: usize,
    pub events: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassifyOutcome {
    pub events: Vec<ConflictEvent>,
    pub stats: ClassifyStats,
}

/// Why an article did not become an event. An expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NoKeyword,
    NoLocation,
    Invalidated(Invalidation),
    LowScore(ScoreBreakdown),
}

impl Rejection {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::NoKeyword => "no_keyword",
            Self::NoLocation => "no_location",
            Self::Invalidated(_) => "invalidator",
            Self::LowScore(_) => "low_score",
        }
    }
}

/// Everything decided about a surviving article.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment<'a> {
    pub location: &'a LocationEntry,
    pub severity: Severity,
    pub category: Category,
    pub score: ScoreBreakdown,
}

#[derive(Debug, Clone)]
pub struct Classifier {
    lexicon: Arc<Lexicon>,
    gazetteer: Arc<Gazetteer>,
}

impl Classifier {
    pub fn new(lexicon: Arc<Lexicon>, gazetteer: Arc<Gazetteer>) -> Self {
        Self { lexicon, gazetteer }
    }

    /// Embedded lexicon and location table.
    pub fn builtin() -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(Lexicon::builtin()?),
            Arc::new(Gazetteer::builtin()?),
        ))
    }

    /// Tables from `LEXICON_CONFIG_PATH` / `LOCATIONS_CONFIG_PATH`, else embedded.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(Lexicon::from_env()?),
            Arc::new(Gazetteer::from_env()?),
        ))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// Run one article through every stage.
    pub fn assess(&self, article: &RawArticle) -> Result<Assessment<'_>, Rejection> {
        let content = NormalizedContent::from_parts(&article.title, &article.description);

        if !self.lexicon.relevance.is_relevant(&content) {
            return Err(Rejection::NoKeyword);
        }

        let location = self
            .gazetteer
            .resolve(content.as_str())
            .ok_or(Rejection::NoLocation)?;

        if let Some(inv) = self.lexicon.invalidation.check(&content) {
            return Err(Rejection::Invalidated(inv));
        }

        let score = self.lexicon.severity.score(&content, &article.title);
        let severity = self
            .lexicon
            .severity
            .tiers()
            .tier_for(score.total)
            .ok_or_else(|| Rejection::LowScore(score.clone()))?;

        Ok(Assessment {
            location,
            severity,
            category: self.lexicon.categories.classify(&content),
            score,
        })
    }

    /// Classify a whole run, dating undated articles with today's UTC date.
    pub fn classify(&self, articles: &[RawArticle]) -> ClassifyOutcome {
        self.classify_at(articles, Utc::now().date_naive())
    }

    /// Same as [`Classifier::classify`] with an explicit "today".
    pub fn classify_at(&self, articles: &[RawArticle], today: NaiveDate) -> ClassifyOutcome {
        crate::metrics::describe_once();

        let mut out = ClassifyOutcome::default();
        out.stats.total_articles = articles.len();

        for article in articles {
            match self.assess(article) {
                Ok(a) => {
                    let id = out.events.len() + 1;
                    out.events.push(build_event(id, article, &a, today));
                }
                Err(rej) => {
                    match rej {
                        Rejection::NoKeyword => out.stats.dropped_no_keyword += 1,
                        Rejection::NoLocation => out.stats.dropped_no_location += 1,
                        Rejection::Invalidated(_) => out.stats.dropped_invalidator += 1,
                        Rejection::LowScore(_) => out.stats.dropped_low_score += 1,
                    }
                    counter!("classify_dropped_total", "stage" => rej.stage()).increment(1);
                    dev_log_rejection(article, &rej);
                }
            }
        }
        out.stats.events = out.events.len();

        counter!("classify_articles_total").increment(articles.len() as u64);
        counter!("classify_events_total").increment(out.events.len() as u64);
        info!(
            target: "classify",
            total = out.stats.total_articles,
            no_keyword = out.stats.dropped_no_keyword,
            no_location = out.stats.dropped_no_location,
            invalidator = out.stats.dropped_invalidator,
            low_score = out.stats.dropped_low_score,
            events = out.stats.events,
            "filtering summary"
        );
        out
    }
}

fn build_event(
    id: usize,
    article: &RawArticle,
    a: &Assessment<'_>,
    today: NaiveDate,
) -> ConflictEvent {
    let date = article
        .published_at
        .as_deref()
        .and_then(parse_published_date)
        .unwrap_or(today);

    ConflictEvent {
        id,
        title: truncate_chars(&article.title, MAX_TITLE_CHARS),
        location: a.location.name.clone(),
        latitude: a.location.latitude,
        longitude: a.location.longitude,
        severity: a.severity,
        description: truncate_chars(&strip_html(&article.description), MAX_DESCRIPTION_CHARS),
        date: date.format("%Y-%m-%d").to_string(),
        category: a.category,
        source_count: 1,
        article_url: article.article_url.clone(),
        source_name: article.source_name.clone(),
    }
}

/// UTC calendar date of an RFC 2822 (RSS) or RFC 3339 (Atom) timestamp.
pub fn parse_published_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Dev-only per-article trace. Titles are hashed, never logged raw.
fn dev_log_rejection(article: &RawArticle, rej: &Rejection) {
    if !crate::logging::dev_logging_enabled() {
        return;
    }
    let id = crate::logging::anon_hash(&article.title);
    match rej {
        Rejection::Invalidated(inv) => debug!(
            target: "classify",
            %id, stage = rej.stage(), kind = %inv.kind, phrase = %inv.phrase,
            source = %article.source_name
        ),
        Rejection::LowScore(b) => debug!(
            target: "classify",
            %id, stage = rej.stage(), score = b.total, source = %article.source_name
        ),
        _ => debug!(target: "classify", %id, stage = rej.stage(), source = %article.source_name),
    }
}
