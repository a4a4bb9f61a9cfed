//! Copy quality, usability and conversion rubrics (20 points each).

use crate::models::scraped::ScrapedContent;
use crate::optimize::education::distinct_hits;
use crate::optimize::grading::{Category, CategoryOutcome, Issue, Severity};
use crate::optimize::objective::Objective;

/// Terms that show the copy speaks to prospective students.
pub const EDUCATION_TERMS: &[&str] = &[
    "course",
    "degree",
    "student",
    "university",
    "study",
    "campus",
    "career",
    "graduate",
    "teaching",
    "research",
    "module",
    "apply",
];

/// Social-proof terms counted as trust signals.
pub const TRUST_TERMS: &[&str] = &[
    "testimonial",
    "review",
    "ranked",
    "ranking",
    "award",
    "accredited",
    "accreditation",
    "satisfaction",
    "league table",
];

const MIN_HEADING_WORDS: usize = 4;
const MIN_OPENING_WORDS: usize = 20;

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn score_copy_quality(content: &ScrapedContent) -> CategoryOutcome {
    let category = Category::CopyQuality;
    let mut points = 0;
    let mut issues = Vec::new();

    let heading_ok = content
        .h1
        .first()
        .is_some_and(|h| word_count(h) >= MIN_HEADING_WORDS);
    let opening_ok = content
        .paragraphs
        .first()
        .is_some_and(|p| word_count(p) >= MIN_OPENING_WORDS);
    if heading_ok || opening_ok {
        points += 5;
    } else {
        let mut issue = Issue::new(
            category,
            Severity::High,
            "Weak value proposition",
            "The main heading and opening paragraph do not explain why a student should choose this course.",
            "Open with a benefit-led heading and a short paragraph stating what students gain, e.g. outcomes, rankings or experience",
        )
        .with_impact("Visitors decide within seconds whether to stay");
        if let Some(h1) = content.h1.first() {
            issue = issue.with_evidence(h1.as_str());
        }
        issues.push(issue);
    }

    let words = content.word_count;
    match words {
        300..=1500 => points += 6,
        200..=299 | 1501..=2000 => {
            points += 3;
            issues.push(
                Issue::new(
                    category,
                    Severity::Medium,
                    "Word count outside ideal range",
                    format!("The page has {words} words. Ideal is 300-1500."),
                    "Adjust the copy towards 300-1500 words: enough detail to inform without overwhelming",
                )
                .with_impact("Pages that are too thin or too long lose readers"),
            );
        }
        0..=199 => {
            points += 1;
            issues.push(
                Issue::new(
                    category,
                    Severity::High,
                    "Too little content",
                    format!("The page has only {words} words."),
                    "Expand the page with course details, outcomes and next steps so students can make a decision",
                )
                .with_impact("Students leave to find the information elsewhere"),
            );
        }
        _ => {
            points += 1;
            issues.push(
                Issue::new(
                    category,
                    Severity::Medium,
                    "Too much content",
                    format!("The page has {words} words."),
                    "Cut the copy to the essentials and move detail into linked pages or expandable sections",
                )
                .with_impact("Key messages get lost in long pages"),
            );
        }
    }

    match content.h2.len() + content.h3.len() {
        3.. => points += 4,
        n @ 1..=2 => {
            points += 2;
            issues.push(Issue::new(
                category,
                Severity::Low,
                "Few subheadings",
                format!("Only {n} subheadings break up the copy."),
                "Add subheadings for each key topic: course overview, entry requirements, careers, how to apply",
            ));
        }
        _ => issues.push(
            Issue::new(
                category,
                Severity::Medium,
                "No subheadings",
                "The copy is not broken up by subheadings.",
                "Split the copy into scannable sections with descriptive subheadings",
            )
            .with_impact("Students scanning the page cannot find what they need"),
        ),
    }

    let body = content.body_lower();
    match distinct_hits(&body, EDUCATION_TERMS) {
        5.. => points += 5,
        n @ 3..=4 => {
            points += 3;
            issues.push(Issue::new(
                category,
                Severity::Low,
                "Limited student-focused language",
                format!("Only {n} education-related terms found."),
                "Mention the course, study experience and career outcomes in the students' own language",
            ));
        }
        n @ 1..=2 => {
            points += 1;
            issues.push(Issue::new(
                category,
                Severity::Medium,
                "Little student-focused language",
                format!("Only {n} education-related terms found."),
                "Rewrite key paragraphs around what students study, where, and what it leads to",
            ));
        }
        _ => issues.push(
            Issue::new(
                category,
                Severity::High,
                "No education-related content",
                "The copy does not mention courses, study or careers.",
                "Make the page about the student offer: course, teaching, campus and careers",
            )
            .with_impact("The page does not read as a university page to students or search engines"),
        ),
    }

    CategoryOutcome::new(category, points, issues)
}

pub fn score_usability(content: &ScrapedContent) -> CategoryOutcome {
    let category = Category::Usability;
    let mut points = 0;
    let mut issues = Vec::new();

    match content.h1.len() {
        1 => points += 6,
        0 => issues.push(
            Issue::new(
                category,
                Severity::High,
                "No main heading",
                "The page has no main (H1) heading.",
                "Add one clear main heading at the top that states what the page offers",
            )
            .with_impact("Students cannot tell at a glance what the page is about"),
        ),
        n => {
            points += 3;
            issues.push(
                Issue::new(
                    category,
                    Severity::Medium,
                    "Several main headings",
                    format!("The page has {n} main (H1) headings."),
                    "Keep a single main heading and turn the others into section subheadings",
                )
                .with_evidence(content.h1.join(" | ")),
            );
        }
    }

    match content.h2.len() {
        3.. => points += 5,
        n @ 1..=2 => {
            points += 3;
            issues.push(Issue::new(
                category,
                Severity::Low,
                "Few page sections",
                format!("Only {n} section headings found."),
                "Organise the page into clear sections such as Overview, Entry Requirements, Careers and How to Apply",
            ));
        }
        _ => issues.push(Issue::new(
            category,
            Severity::Medium,
            "No section headings",
            "The page has no section (H2) headings.",
            "Break the content into sections with descriptive headings",
        )),
    }

    match content.links.len() {
        5.. => points += 4,
        n @ 1..=4 => {
            points += 2;
            issues.push(Issue::new(
                category,
                Severity::Low,
                "Limited navigation",
                format!("Only {n} links found on the page."),
                "Link to related courses, entry requirements, funding and contact pages",
            ));
        }
        _ => issues.push(
            Issue::new(
                category,
                Severity::Medium,
                "No navigation links",
                "No links were found on the page.",
                "Add links to related information so students can keep exploring",
            )
            .with_impact("Students reach a dead end and leave"),
        ),
    }

    match content.h2.len() + content.h3.len() {
        3..=12 => points += 5,
        n @ (1..=2 | 13..=20) => {
            points += 3;
            issues.push(Issue::new(
                category,
                Severity::Low,
                "Section count outside ideal range",
                format!("The page has {n} sections. Ideal is 3-12."),
                "Aim for 3-12 focused sections: merge thin sections or split very long ones",
            ));
        }
        n => {
            points += 1;
            issues.push(
                Issue::new(
                    category,
                    Severity::Medium,
                    "Poor page structure",
                    format!("The page has {n} sections."),
                    "Restructure the page into 3-12 clearly headed sections",
                )
                .with_impact("Students struggle to scan the page"),
            );
        }
    }

    CategoryOutcome::new(category, points, issues)
}

/// Medium issue when no CTA uses the wording this objective calls for.
pub fn missing_objective_cta(content: &ScrapedContent, objective: Objective) -> Option<Issue> {
    let expected = objective.expected_cta_keywords();
    let present = content.ctas.iter().any(|cta| {
        let lower = cta.to_lowercase();
        expected.iter().any(|k| lower.contains(k))
    });
    if present {
        return None;
    }

    let label = objective.suggested_cta();
    Some(
        Issue::new(
            Category::ConversionElements,
            Severity::Medium,
            format!("Consider adding '{label}' button"),
            format!("No call-to-action matching this {objective} page was detected."),
            format!("Add a prominent '{label}' button near the top of the page"),
        )
        .with_impact("Students may not know how to take the next step"),
    )
}

pub fn score_conversion(content: &ScrapedContent, objective: Objective) -> CategoryOutcome {
    let category = Category::ConversionElements;
    let mut points = 0;
    let mut issues = Vec::new();

    match content.ctas.len() {
        3.. => points += 7,
        n @ 1..=2 => {
            points += 4;
            issues.push(
                Issue::new(
                    category,
                    Severity::Medium,
                    "Few calls to action",
                    format!("Only {n} call-to-action buttons found."),
                    "Repeat the main call to action after key sections and at the bottom of the page",
                )
                .with_evidence(content.ctas.join(", ")),
            );
        }
        _ => issues.push(
            Issue::new(
                category,
                Severity::High,
                "No calls to action",
                "No action buttons were detected on the page.",
                format!(
                    "Add a clear '{}' button above the fold",
                    objective.suggested_cta()
                ),
            )
            .with_impact("Students may not know what action to take"),
        ),
    }

    if content.forms.is_empty() {
        if objective.requires_form() {
            issues.push(
                Issue::new(
                    category,
                    Severity::High,
                    "No form on the page",
                    format!("A {objective} page needs a form, but none was found."),
                    "Embed a short form (name, email, course of interest) directly on the page",
                )
                .with_impact("Interested students have no way to convert on the page"),
            );
        } else {
            points += 5;
            issues.push(Issue::new(
                category,
                Severity::Low,
                "No form on the page",
                "The page has no enquiry or sign-up form.",
                "Consider a short enquiry or prospectus request form as an extra conversion path",
            ));
        }
    } else if content.forms.iter().any(|f| (2..=10).contains(&f.inputs)) {
        points += 8;
    } else {
        points += 5;
        let counts: Vec<String> = content.forms.iter().map(|f| f.inputs.to_string()).collect();
        issues.push(
            Issue::new(
                category,
                Severity::Medium,
                "Form length not ideal",
                "No form on the page has between 2 and 10 fields.",
                "Keep forms short: ask only for what you need to follow up (2-10 fields)",
            )
            .with_evidence(format!("Field counts: {}", counts.join(", "))),
        );
    }

    let body = content.body_lower();
    match distinct_hits(&body, TRUST_TERMS) {
        3.. => points += 5,
        1..=2 => points += 3,
        _ => issues.push(
            Issue::new(
                category,
                Severity::Medium,
                "No trust signals",
                "No testimonials, rankings or accreditations were found.",
                "Add student testimonials, league table rankings or accreditation badges",
            )
            .with_impact("Students have less reason to trust the claims on the page"),
        ),
    }

    issues.extend(missing_objective_cta(content, objective));

    CategoryOutcome::new(category, points, issues)
}
