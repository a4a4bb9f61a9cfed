use crate::models::scraped::ScrapedContent;

const KEY_CONTENT_CHARS: usize = 200;

/// Renders scraped content as a short plain-text brief for prompts.
pub fn format_scraped_summary(content: &ScrapedContent) -> String {
    let mut lines = Vec::new();

    if let Some(title) = &content.title {
        lines.push(format!("Title: {title}"));
    }
    if let Some(description) = &content.meta_description {
        lines.push(format!("Description: {description}"));
    }
    if let Some(h1) = content.h1.first() {
        lines.push(format!("Main heading: {h1}"));
    }
    if !content.h2.is_empty() {
        let subheadings: Vec<&str> = content.h2.iter().take(3).map(String::as_str).collect();
        lines.push(format!("Subheadings: {}", subheadings.join(", ")));
    }
    if let Some(first) = content.paragraphs.first() {
        let excerpt: String = first.chars().take(KEY_CONTENT_CHARS).collect();
        lines.push(format!("Key content: {excerpt}..."));
    }
    if !content.ctas.is_empty() {
        let ctas: Vec<&str> = content.ctas.iter().take(3).map(String::as_str).collect();
        lines.push(format!("CTAs: {}", ctas.join(", ")));
    }

    if lines.is_empty() {
        "No content extracted".to_string()
    } else {
        lines.join("\n")
    }
}
