use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Terminal failure of a scrape attempt. Timeouts are kept distinct so callers
/// can report them separately from access or parse failures.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ScrapeFailure {
    #[error("Timeout: Site took too long to respond")]
    Timeout,

    #[error("Access denied: HTTP {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDescriptor {
    /// Number of input, textarea and select elements inside the form.
    pub inputs: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub has_alt: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    pub href: String,
    pub text: String,
}

/// Fields extracted from a landing page. Built once per scrape attempt.
///
/// When `error` is set the remaining fields are partial and the value must be
/// treated as a failed scrape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedContent {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub ctas: Vec<String>,
    pub forms: Vec<FormDescriptor>,
    pub images: Vec<ImageDescriptor>,
    pub links: Vec<LinkDescriptor>,
    pub paragraphs: Vec<String>,
    pub markdown: Option<String>,
    pub word_count: usize,
    pub error: Option<ScrapeFailure>,
}

impl ScrapedContent {
    pub fn failed(error: ScrapeFailure) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Lower-cased body text used by keyword rubrics.
    pub fn body_lower(&self) -> String {
        self.markdown.as_deref().unwrap_or_default().to_lowercase()
    }

    /// Adds a CTA label unless an identical one is already recorded.
    pub fn push_cta(&mut self, label: &str) {
        if !self.ctas.iter().any(|c| c == label) {
            self.ctas.push(label.to_string());
        }
    }

    /// Percentage of images carrying alt text, or `None` when the page has no images.
    pub fn alt_text_percentage(&self) -> Option<f64> {
        if self.images.is_empty() {
            return None;
        }
        let with_alt = self.images.iter().filter(|i| i.has_alt).count();
        Some(with_alt as f64 / self.images.len() as f64 * 100.0)
    }
}
