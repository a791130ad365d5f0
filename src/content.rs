// src/content.rs
use crate::ingest::strip_html;

/// Lower-cased `title + " " + description` with markup removed.
/// Scratch input for every classification stage; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContent(String);

impl NormalizedContent {
    pub fn from_parts(title: &str, description: &str) -> Self {
        let text = format!("{} {}", title, strip_html(description));
        Self(text.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.0.contains(phrase)
    }
}
