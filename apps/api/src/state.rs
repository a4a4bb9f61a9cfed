use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::optimize::scorer::PageScorer;
use crate::reference::ReferenceStore;
use crate::scrape::PageScraper;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text-generation collaborator. Production: `LlmClient`.
    pub llm: Arc<dyn TextGenerator>,
    pub reference: ReferenceStore,
    /// Scraping collaborator with its own backend fallback.
    pub scraper: Arc<dyn PageScraper>,
    /// Pluggable page scorer. Default: `RubricScorer`. Swap via ENABLE_LLM_PAGE_SCORING.
    pub page_scorer: Arc<dyn PageScorer>,
}
