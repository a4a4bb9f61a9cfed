//! Landing-page scraping collaborator.
//!
//! Callers only see the final `ScrapedContent`: backend fallback happens here,
//! and a value with `error` set means every backend tried has failed.

pub mod firecrawl;
pub mod html;
pub mod summary;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::models::scraped::{ScrapeFailure, ScrapedContent};

pub use firecrawl::FirecrawlBackend;
pub use html::HtmlBackend;

/// Phrases that mark a link or button label as a call to action.
pub const CTA_KEYWORDS: &[&str] = &[
    "register",
    "apply",
    "book",
    "enquire",
    "download",
    "sign up",
    "get started",
    "learn more",
    "find out",
    "discover",
    "explore",
    "join",
    "visit",
    "open day",
    "prospectus",
    "contact",
    "get in touch",
];

/// Number of leading paragraphs kept on `ScrapedContent`.
pub const MAX_PARAGRAPHS: usize = 5;

pub fn is_cta_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    CTA_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// One way of turning a URL into `ScrapedContent`.
#[async_trait]
pub trait ScrapeBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, url: &str) -> ScrapedContent;
}

/// The scraping collaborator used by handlers.
#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Scrapes `url`, trying the primary backend first when `prefer_primary` is set.
    async fn scrape(&self, url: &str, prefer_primary: bool) -> ScrapedContent;
}

/// Primary backend (optional) with a mandatory secondary fallback.
pub struct FallbackScraper {
    primary: Option<Box<dyn ScrapeBackend>>,
    secondary: Box<dyn ScrapeBackend>,
}

impl FallbackScraper {
    pub fn new(
        primary: Option<Box<dyn ScrapeBackend>>,
        secondary: Box<dyn ScrapeBackend>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Firecrawl (when a key is configured) falling back to direct HTML.
    pub fn from_config(
        timeout: Duration,
        user_agent: &str,
        firecrawl_api_key: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let primary = firecrawl_api_key.map(|key| {
            Box::new(FirecrawlBackend::new(client.clone(), key)) as Box<dyn ScrapeBackend>
        });
        let secondary = Box::new(HtmlBackend::new(client, user_agent.to_string()));
        Self::new(primary, secondary)
    }
}

#[async_trait]
impl PageScraper for FallbackScraper {
    async fn scrape(&self, url: &str, prefer_primary: bool) -> ScrapedContent {
        if prefer_primary {
            if let Some(primary) = &self.primary {
                let content = primary.fetch(url).await;
                if !content.is_failed() {
                    return content;
                }
                info!(
                    "{} failed, falling back to {} for {url}",
                    primary.name(),
                    self.secondary.name()
                );
            }
        }

        let content = self.secondary.fetch(url).await;
        if let Some(error) = &content.error {
            warn!("All scrape backends failed for {url}: {error}");
        }
        content
    }
}

/// Classifies a transport error, keeping timeouts distinct.
pub(crate) fn classify_error(error: &reqwest::Error) -> ScrapeFailure {
    if error.is_timeout() {
        ScrapeFailure::Timeout
    } else if let Some(status) = error.status() {
        ScrapeFailure::HttpStatus(status.as_u16())
    } else {
        ScrapeFailure::Other(error.to_string())
    }
}

/// Collapses runs of whitespace into single spaces.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend returning a fixed outcome and counting calls.
    pub(crate) struct StubBackend {
        pub name: &'static str,
        pub outcome: ScrapedContent,
        pub calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ScrapeBackend for StubBackend {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, _url: &str) -> ScrapedContent {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn ok_content(title: &str) -> ScrapedContent {
        ScrapedContent {
            title: Some(title.to_string()),
            ..ScrapedContent::default()
        }
    }

    fn stub(name: &'static str, outcome: ScrapedContent) -> (Box<StubBackend>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(StubBackend {
                name,
                outcome,
                calls: calls.clone(),
            }),
            calls,
        )
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let (primary, primary_calls) = stub("firecrawl", ok_content("Primary"));
        let (secondary, secondary_calls) = stub("html", ok_content("Secondary"));
        let scraper = FallbackScraper::new(Some(primary), secondary);

        let content = scraper.scrape("https://uni.example/open-day", true).await;
        assert_eq!(content.title.as_deref(), Some("Primary"));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back() {
        let (primary, _) = stub("firecrawl", ScrapedContent::failed(ScrapeFailure::Timeout));
        let (secondary, secondary_calls) = stub("html", ok_content("Secondary"));
        let scraper = FallbackScraper::new(Some(primary), secondary);

        let content = scraper.scrape("https://uni.example/open-day", true).await;
        assert!(!content.is_failed());
        assert_eq!(content.title.as_deref(), Some("Secondary"));
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_failing_reports_secondary_error() {
        let (primary, _) = stub("firecrawl", ScrapedContent::failed(ScrapeFailure::Timeout));
        let (secondary, _) = stub("html", ScrapedContent::failed(ScrapeFailure::HttpStatus(403)));
        let scraper = FallbackScraper::new(Some(primary), secondary);

        let content = scraper.scrape("https://uni.example/open-day", true).await;
        assert_eq!(content.error, Some(ScrapeFailure::HttpStatus(403)));
    }

    #[tokio::test]
    async fn test_not_preferring_primary_goes_direct() {
        let (primary, primary_calls) = stub("firecrawl", ok_content("Primary"));
        let (secondary, _) = stub("html", ok_content("Secondary"));
        let scraper = FallbackScraper::new(Some(primary), secondary);

        let content = scraper.scrape("https://uni.example", false).await;
        assert_eq!(content.title.as_deref(), Some("Secondary"));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_primary_uses_secondary() {
        let (secondary, secondary_calls) = stub("html", ok_content("Secondary"));
        let scraper = FallbackScraper::new(None, secondary);

        scraper.scrape("https://uni.example", true).await;
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cta_label_detection() {
        assert!(is_cta_label("Book your place"));
        assert!(is_cta_label("DOWNLOAD PROSPECTUS"));
        assert!(!is_cta_label("Our history"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Apply\n   now \t"), "Apply now");
    }
}
