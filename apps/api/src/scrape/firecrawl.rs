use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{classify_error, is_cta_label, ScrapeBackend, MAX_PARAGRAPHS};
use crate::models::scraped::{ImageDescriptor, LinkDescriptor, ScrapeFailure, ScrapedContent};

const FIRECRAWL_URL: &str = "https://api.firecrawl.dev/v1/scrape";

static RE_H1_ATX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());
static RE_H1_SETEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([^\n]+)\n=+[ \t]*$").unwrap());
static RE_H2_ATX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.+)$").unwrap());
static RE_H2_SETEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([^\n]+)\n-+[ \t]*$").unwrap());
static RE_H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.+)$").unwrap());
// Images and links share a pattern; the leading `!` tells them apart.
static RE_LINK_OR_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(!?)\[([^\]]*)\]\(([^)\s]*)(?:\s+"[^"]*")?\)"#).unwrap());

#[derive(Debug, Deserialize)]
struct FirecrawlResponse {
    #[serde(default)]
    data: Option<FirecrawlData>,
}

#[derive(Debug, Default, Deserialize)]
struct FirecrawlData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    metadata: FirecrawlMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct FirecrawlMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Hosted scraping service returning the page's main content as markdown.
pub struct FirecrawlBackend {
    client: Client,
    api_key: String,
}

impl FirecrawlBackend {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl ScrapeBackend for FirecrawlBackend {
    fn name(&self) -> &'static str {
        "firecrawl"
    }

    async fn fetch(&self, url: &str) -> ScrapedContent {
        debug!("Scraping {url} via Firecrawl");

        let body = json!({
            "url": url,
            "formats": ["markdown"],
            "onlyMainContent": true,
        });

        let response = match self
            .client
            .post(FIRECRAWL_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Firecrawl request failed for {url}: {e}");
                return ScrapedContent::failed(classify_error(&e));
            }
        };

        let parsed: FirecrawlResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!("Firecrawl returned an unreadable body for {url}: {e}");
                return ScrapedContent::failed(classify_error(&e));
            }
        };

        let data = parsed.data.unwrap_or_default();
        let Some(markdown) = data.markdown.filter(|m| !m.trim().is_empty()) else {
            return ScrapedContent::failed(ScrapeFailure::Other(
                "Firecrawl returned no content".to_string(),
            ));
        };

        let mut content = parse_markdown(&markdown);
        content.title = data.metadata.title.filter(|t| !t.is_empty());
        content.meta_description = data.metadata.description.filter(|d| !d.is_empty());
        content
    }
}

/// Extracts headings, paragraphs, images, links and CTAs from markdown.
///
/// Title and meta description come from service metadata, not the markdown,
/// so they are left unset here.
pub fn parse_markdown(markdown: &str) -> ScrapedContent {
    let mut content = ScrapedContent::default();

    content.h1 = captures(&RE_H1_ATX, markdown);
    content.h1.extend(captures(&RE_H1_SETEXT, markdown));
    content.h2 = captures(&RE_H2_ATX, markdown);
    content.h2.extend(
        captures(&RE_H2_SETEXT, markdown)
            .into_iter()
            .filter(|h| !h.starts_with('-') && !h.starts_with('|')),
    );
    content.h3 = captures(&RE_H3, markdown);

    content.paragraphs = markdown
        .split("\n\n")
        .filter(|block| !block.starts_with('#'))
        .map(str::trim)
        .filter(|block| !block.is_empty() && !block.starts_with('=') && !block.starts_with('-'))
        .take(MAX_PARAGRAPHS)
        .map(str::to_string)
        .collect();

    for cap in RE_LINK_OR_IMAGE.captures_iter(markdown) {
        let text = cap[2].trim();
        if &cap[1] == "!" {
            content.images.push(ImageDescriptor {
                has_alt: !text.is_empty(),
            });
            continue;
        }
        content.links.push(LinkDescriptor {
            href: cap[3].to_string(),
            text: text.to_string(),
        });
        if is_cta_label(text) {
            content.push_cta(text);
        }
    }

    content.word_count = markdown.split_whitespace().count();
    content.markdown = Some(markdown.to_string());
    content
}

fn captures(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "# Open Days 2025\n\nVisit our campus and meet academics from every school.\n\n## Why study with us\n\nRanked top 10 for student satisfaction.\n\nCourses\n-------\n\n### Accommodation\n\n![Students on campus](/img/campus.jpg) ![](/img/banner.png)\n\n[Book your place](https://uni.example/book) or [read our history](https://uni.example/history).\n\n[Book your place](https://uni.example/book-again)";

    #[test]
    fn test_parses_atx_and_setext_headings() {
        let content = parse_markdown(PAGE);
        assert_eq!(content.h1, vec!["Open Days 2025"]);
        assert_eq!(content.h2, vec!["Why study with us", "Courses"]);
        assert_eq!(content.h3, vec!["Accommodation"]);
    }

    #[test]
    fn test_setext_h1() {
        let content = parse_markdown("Study Nursing\n=============\n\nBody text.");
        assert_eq!(content.h1, vec!["Study Nursing"]);
    }

    #[test]
    fn test_images_and_links_are_separated() {
        let content = parse_markdown(PAGE);
        assert_eq!(content.images.len(), 2);
        assert!(content.images[0].has_alt);
        assert!(!content.images[1].has_alt);
        assert_eq!(content.links.len(), 3);
        assert_eq!(content.links[0].href, "https://uni.example/book");
    }

    #[test]
    fn test_ctas_are_keyword_matched_and_deduplicated() {
        let content = parse_markdown(PAGE);
        assert_eq!(content.ctas, vec!["Book your place"]);
    }

    #[test]
    fn test_paragraphs_skip_headings_and_cap_at_five() {
        let content = parse_markdown(PAGE);
        assert_eq!(content.paragraphs.len(), MAX_PARAGRAPHS);
        assert_eq!(
            content.paragraphs[0],
            "Visit our campus and meet academics from every school."
        );
        assert!(content.paragraphs.iter().all(|p| !p.starts_with('#')));
    }

    #[test]
    fn test_word_count_and_body_are_recorded() {
        let content = parse_markdown("one two\nthree");
        assert_eq!(content.word_count, 3);
        assert_eq!(content.markdown.as_deref(), Some("one two\nthree"));
        assert!(content.title.is_none());
    }
}
