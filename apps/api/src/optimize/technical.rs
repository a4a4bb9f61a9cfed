//! Technical SEO and accessibility rubrics.

use crate::models::scraped::ScrapedContent;
use crate::optimize::grading::{Category, CategoryOutcome, Issue, Severity};

/// Link labels that say nothing about their destination.
pub const GENERIC_LINK_TEXTS: &[&str] = &["click here", "read more", "here", "link", "more"];

/// Only the first links are checked for generic text.
const LINKS_CHECKED: usize = 20;

/// Title, meta description and image alt text (15 points).
pub fn score_technical_seo(content: &ScrapedContent) -> CategoryOutcome {
    let category = Category::TechnicalSeo;
    let mut points = 0;
    let mut issues = Vec::new();

    match content.title.as_deref() {
        Some(title) => {
            let len = title.chars().count();
            if (30..=60).contains(&len) {
                points += 5;
            } else if (20..=70).contains(&len) {
                points += 3;
                issues.push(
                    Issue::new(
                        category,
                        Severity::Low,
                        "Title tag length suboptimal",
                        format!("Title is {len} characters. Ideal is 30-60 characters."),
                        "Adjust title to 30-60 characters for optimal display in search results",
                    )
                    .with_evidence(title)
                    .with_impact("Title may be truncated in search results"),
                );
            } else {
                points += 1;
                issues.push(
                    Issue::new(
                        category,
                        Severity::Medium,
                        "Title tag length poor",
                        format!("Title is {len} characters. Should be 30-60 characters."),
                        "Rewrite title to be concise and keyword-rich: '[Degree Name] at [University] | Apply Now'",
                    )
                    .with_evidence(title)
                    .with_impact("Poor search result presentation and click-through rates"),
                );
            }
        }
        None => issues.push(
            Issue::new(
                category,
                Severity::High,
                "Missing title tag",
                "No title tag found.",
                "Add a descriptive title tag: '[Program Name] | [University] - [Key Benefit]'",
            )
            .with_impact("Severe SEO penalty and poor search result display"),
        ),
    }

    match content.meta_description.as_deref() {
        Some(description) => {
            let len = description.chars().count();
            if (120..=155).contains(&len) {
                points += 5;
            } else if (100..=170).contains(&len) {
                points += 3;
                issues.push(
                    Issue::new(
                        category,
                        Severity::Low,
                        "Meta description length suboptimal",
                        format!("Meta description is {len} characters. Ideal is 120-155."),
                        "Adjust to 120-155 characters for optimal search result display",
                    )
                    .with_impact("Description may be truncated in search results"),
                );
            } else {
                points += 1;
                issues.push(
                    Issue::new(
                        category,
                        Severity::Medium,
                        "Meta description length poor",
                        format!("Meta description is {len} characters."),
                        "Write a compelling 120-155 character description highlighting key benefits and including a call-to-action",
                    )
                    .with_impact("Lower click-through rates from search results"),
                );
            }
        }
        None => issues.push(
            Issue::new(
                category,
                Severity::High,
                "Missing meta description",
                "No meta description found.",
                "Add a meta description that summarizes the page and includes target keywords and a CTA",
            )
            .with_impact("Search engines may generate poor automatic descriptions, reducing clicks"),
        ),
    }

    match content.alt_text_percentage() {
        None => points += 3,
        Some(pct) if pct >= 90.0 => points += 5,
        Some(pct) if pct >= 70.0 => points += 4,
        Some(pct) if pct >= 50.0 => {
            points += 2;
            issues.push(
                Issue::new(
                    category,
                    Severity::Medium,
                    "Many images missing alt text",
                    format!("Only {}% of images have alt text.", pct as u32),
                    "Add descriptive alt text to all images, especially those showing campus, students, or facilities",
                )
                .with_impact("Reduced accessibility and SEO value"),
            );
        }
        Some(pct) => {
            points += 1;
            issues.push(
                Issue::new(
                    category,
                    Severity::High,
                    "Most images missing alt text",
                    format!("Only {}% of images have alt text.", pct as u32),
                    "Add alt text to all images: describe what's shown and include relevant keywords where appropriate",
                )
                .with_impact("Poor accessibility for screen readers and lost SEO opportunities"),
            );
        }
    }

    CategoryOutcome::new(category, points, issues)
}

/// Alt text, heading hierarchy and link text quality (10 points).
pub fn score_accessibility(content: &ScrapedContent) -> CategoryOutcome {
    let category = Category::Accessibility;
    let mut points = 0;
    let mut issues = Vec::new();

    match content.alt_text_percentage() {
        None => points += 4,
        Some(pct) if pct >= 90.0 => points += 4,
        Some(pct) if pct >= 70.0 => points += 3,
        Some(pct) if pct >= 50.0 => points += 2,
        Some(pct) => {
            points += 1;
            issues.push(
                Issue::new(
                    category,
                    Severity::High,
                    "Poor image accessibility",
                    format!("Only {}% of images have alt text.", pct as u32),
                    "Add descriptive alt text to all images for screen reader users",
                )
                .with_impact("Users with visual impairments cannot understand image content"),
            );
        }
    }

    let has_h1 = !content.h1.is_empty();
    let has_h2 = !content.h2.is_empty();
    if has_h1 && has_h2 {
        points += 3;
    } else if has_h1 || has_h2 {
        points += 2;
    } else {
        issues.push(
            Issue::new(
                category,
                Severity::High,
                "Poor semantic structure",
                "Missing proper heading hierarchy (H1, H2, H3).",
                "Use a clear heading hierarchy so screen readers can navigate the page",
            )
            .with_impact("Screen reader users cannot efficiently navigate page content"),
        );
    }

    let generic: Vec<&str> = content
        .links
        .iter()
        .take(LINKS_CHECKED)
        .map(|l| l.text.trim())
        .filter(|t| GENERIC_LINK_TEXTS.contains(&t.to_lowercase().as_str()))
        .collect();

    match generic.len() {
        0 => points += 3,
        n @ 1..=2 => {
            points += 2;
            issues.push(
                Issue::new(
                    category,
                    Severity::Low,
                    "Some generic link text found",
                    format!("Found {n} links with non-descriptive text like 'click here'."),
                    "Use descriptive link text that makes sense out of context: 'Download course prospectus' instead of 'click here'",
                )
                .with_evidence(generic.join(", "))
                .with_impact("Screen reader users cannot understand link purpose when tabbing through links"),
            );
        }
        n => {
            points += 1;
            issues.push(
                Issue::new(
                    category,
                    Severity::Medium,
                    "Multiple generic links found",
                    format!("Found {n} links with generic text."),
                    "Replace all 'click here' and 'read more' links with descriptive text",
                )
                .with_impact("Poor accessibility for screen reader users and reduced usability"),
            );
        }
    }

    CategoryOutcome::new(category, points, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scraped::{ImageDescriptor, LinkDescriptor};

    fn images(with_alt: usize, without: usize) -> Vec<ImageDescriptor> {
        let mut out = vec![ImageDescriptor { has_alt: true }; with_alt];
        out.extend(vec![ImageDescriptor { has_alt: false }; without]);
        out
    }

    fn link(text: &str) -> LinkDescriptor {
        LinkDescriptor {
            href: "/x".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_good_title_and_long_meta_description() {
        let content = ScrapedContent {
            title: Some("t".repeat(45)),
            meta_description: Some("m".repeat(200)),
            ..ScrapedContent::default()
        };

        let outcome = score_technical_seo(&content);

        // 5 (title) + 1 (meta) + 3 (no images)
        assert_eq!(outcome.score.score, 9);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].title, "Meta description length poor");
        assert_eq!(outcome.issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_missing_title_and_meta_are_high() {
        let outcome = score_technical_seo(&ScrapedContent::default());
        assert_eq!(outcome.score.score, 3);
        assert!(outcome.issues.iter().all(|i| i.severity == Severity::High));
        assert_eq!(outcome.issues.len(), 2);
    }

    #[test]
    fn test_alt_text_tiers() {
        let perfect = ScrapedContent {
            title: Some("t".repeat(45)),
            meta_description: Some("m".repeat(130)),
            images: images(10, 0),
            ..ScrapedContent::default()
        };
        let outcome = score_technical_seo(&perfect);
        assert_eq!(outcome.score.score, 15);
        assert_eq!(outcome.score.percentage, 100);
        assert!(outcome.issues.is_empty());

        let poor = ScrapedContent {
            images: images(1, 3),
            ..perfect.clone()
        };
        let outcome = score_technical_seo(&poor);
        assert_eq!(outcome.score.score, 11);
        assert_eq!(outcome.issues[0].description, "Only 25% of images have alt text.");
    }

    #[test]
    fn test_accessibility_full_marks() {
        let content = ScrapedContent {
            h1: vec!["Nursing".into()],
            h2: vec!["Modules".into()],
            links: vec![link("Book your open day place")],
            ..ScrapedContent::default()
        };
        let outcome = score_accessibility(&content);
        assert_eq!(outcome.score.score, 10);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_generic_link_text_penalties() {
        let some = ScrapedContent {
            h1: vec!["Nursing".into()],
            links: vec![link("Click here"), link(" more "), link("Entry requirements")],
            ..ScrapedContent::default()
        };
        let outcome = score_accessibility(&some);
        // 4 + 2 + 2
        assert_eq!(outcome.score.score, 8);
        assert_eq!(outcome.issues[0].severity, Severity::Low);
        assert_eq!(outcome.issues[0].evidence.as_deref(), Some("Click here, more"));

        let many = ScrapedContent {
            links: vec![link("here"), link("link"), link("read more")],
            ..ScrapedContent::default()
        };
        let outcome = score_accessibility(&many);
        // 4 + 0 + 1
        assert_eq!(outcome.score.score, 5);
        assert!(outcome.issues.iter().any(|i| i.title == "Multiple generic links found"));
    }

    #[test]
    fn test_generic_links_beyond_first_twenty_ignored() {
        let mut links: Vec<LinkDescriptor> = (0..20).map(|i| link(&format!("Course {i}"))).collect();
        links.push(link("click here"));
        let content = ScrapedContent {
            h1: vec!["A".into()],
            h2: vec!["B".into()],
            links,
            ..ScrapedContent::default()
        };
        assert_eq!(score_accessibility(&content).score.score, 10);
    }
}
