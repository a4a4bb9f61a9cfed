use std::sync::LazyLock;

use async_trait::async_trait;
use reqwest::{header::USER_AGENT, Client};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{classify_error, is_cta_label, normalize_whitespace, ScrapeBackend, MAX_PARAGRAPHS};
use crate::models::scraped::{FormDescriptor, ImageDescriptor, LinkDescriptor, ScrapedContent};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

static SEL_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static SEL_META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static SEL_H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static SEL_H2: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static SEL_H3: LazyLock<Selector> = LazyLock::new(|| selector("h3"));
static SEL_CTA: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        "button, a.btn, a.button, .cta, .btn, .button, a[role='button'], input[type='submit']",
    )
});
static SEL_FORM: LazyLock<Selector> = LazyLock::new(|| selector("form"));
static SEL_FORM_FIELD: LazyLock<Selector> = LazyLock::new(|| selector("input, textarea, select"));
static SEL_IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static SEL_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static SEL_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static SEL_BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));

/// Fetches the page directly and walks its DOM.
pub struct HtmlBackend {
    client: Client,
    user_agent: String,
}

impl HtmlBackend {
    pub fn new(client: Client, user_agent: String) -> Self {
        Self { client, user_agent }
    }
}

#[async_trait]
impl ScrapeBackend for HtmlBackend {
    fn name(&self) -> &'static str {
        "direct HTML"
    }

    async fn fetch(&self, url: &str) -> ScrapedContent {
        debug!("Scraping {url} directly");

        let response = match self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Direct fetch failed for {url}: {e}");
                return ScrapedContent::failed(classify_error(&e));
            }
        };

        match response.text().await {
            Ok(body) => parse_html(&body),
            Err(e) => {
                warn!("Could not read body of {url}: {e}");
                ScrapedContent::failed(classify_error(&e))
            }
        }
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

fn texts(document: &Html, sel: &Selector) -> Vec<String> {
    document
        .select(sel)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Extracts landing-page fields from an HTML document.
pub fn parse_html(body: &str) -> ScrapedContent {
    let document = Html::parse_document(body);
    let mut content = ScrapedContent::default();

    content.title = document
        .select(&SEL_TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());
    content.meta_description = document
        .select(&SEL_META_DESCRIPTION)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(normalize_whitespace)
        .filter(|d| !d.is_empty());

    content.h1 = texts(&document, &SEL_H1);
    content.h2 = texts(&document, &SEL_H2);
    content.h3 = texts(&document, &SEL_H3);

    for el in document.select(&SEL_CTA) {
        let tag = el.value().name();
        let label = if tag == "input" {
            el.value().attr("value").map(normalize_whitespace).unwrap_or_default()
        } else {
            element_text(el)
        };
        if label.is_empty() {
            continue;
        }
        if is_cta_label(&label) || tag == "button" || tag == "input" {
            content.push_cta(&label);
        }
    }

    content.forms = document
        .select(&SEL_FORM)
        .map(|form| FormDescriptor {
            inputs: form.select(&SEL_FORM_FIELD).count(),
        })
        .collect();

    content.images = document
        .select(&SEL_IMG)
        .map(|img| ImageDescriptor {
            has_alt: img.value().attr("alt").is_some_and(|a| !a.trim().is_empty()),
        })
        .collect();

    content.links = document
        .select(&SEL_LINK)
        .map(|a| LinkDescriptor {
            href: a.value().attr("href").unwrap_or_default().to_string(),
            text: element_text(a),
        })
        .collect();

    content.paragraphs = texts(&document, &SEL_PARAGRAPH)
        .into_iter()
        .take(MAX_PARAGRAPHS)
        .collect();

    let body_text = document
        .select(&SEL_BODY)
        .next()
        .map(element_text)
        .unwrap_or_default();
    content.word_count = body_text.split_whitespace().count();
    content.markdown = Some(body_text);

    content
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title> Open Days | Example University </title>
  <meta name="description" content="Book your place at our summer open day.">
</head>
<body>
  <h1>Open Days 2025</h1>
  <h2>What to expect</h2>
  <h2>Getting here</h2>
  <h3>Parking</h3>
  <p>Meet academics and tour the campus.</p>
  <p>   </p>
  <p>Free shuttle buses run from the station.</p>
  <a class="btn" href="/book">Book your place</a>
  <a class="btn" href="/book">Book your place</a>
  <a class="button" href="/history">Our history</a>
  <button>Subscribe</button>
  <form>
    <input name="name"><input name="email"><select name="course"></select>
    <input type="submit" value="Register now">
  </form>
  <img src="a.jpg" alt="Students in the library">
  <img src="b.jpg" alt="  ">
  <img src="c.jpg">
  <a href="/courses">Browse courses</a>
</body>
</html>"#;

    #[test]
    fn test_title_and_meta() {
        let content = parse_html(PAGE);
        assert_eq!(content.title.as_deref(), Some("Open Days | Example University"));
        assert_eq!(
            content.meta_description.as_deref(),
            Some("Book your place at our summer open day.")
        );
    }

    #[test]
    fn test_headings() {
        let content = parse_html(PAGE);
        assert_eq!(content.h1, vec!["Open Days 2025"]);
        assert_eq!(content.h2, vec!["What to expect", "Getting here"]);
        assert_eq!(content.h3, vec!["Parking"]);
    }

    #[test]
    fn test_ctas_keep_keywords_buttons_and_submits() {
        let content = parse_html(PAGE);
        assert_eq!(content.ctas, vec!["Book your place", "Subscribe", "Register now"]);
    }

    #[test]
    fn test_forms_count_fields() {
        let content = parse_html(PAGE);
        assert_eq!(content.forms, vec![FormDescriptor { inputs: 4 }]);
    }

    #[test]
    fn test_images_alt_flags() {
        let content = parse_html(PAGE);
        let flags: Vec<bool> = content.images.iter().map(|i| i.has_alt).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn test_links_and_paragraphs() {
        let content = parse_html(PAGE);
        assert_eq!(content.links.len(), 4);
        assert_eq!(content.links[3].text, "Browse courses");
        assert_eq!(
            content.paragraphs,
            vec![
                "Meet academics and tour the campus.",
                "Free shuttle buses run from the station."
            ]
        );
    }

    #[test]
    fn test_body_text_feeds_word_count() {
        let content = parse_html("<html><body><p>Three short words</p></body></html>");
        assert_eq!(content.word_count, 3);
        assert_eq!(content.markdown.as_deref(), Some("Three short words"));
        assert!(content.title.is_none());
    }
}
