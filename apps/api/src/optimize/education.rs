//! Education-specific relevance rubric (15 points).

use std::sync::LazyLock;

use regex::Regex;

use crate::models::scraped::ScrapedContent;
use crate::optimize::grading::{Category, CategoryOutcome, Issue, Severity};
use crate::optimize::objective::Objective;

pub const COURSE_TERMS: &[&str] = &[
    "course",
    "program",
    "degree",
    "modules",
    "curriculum",
    "syllabus",
    "year",
];

pub const ENTRY_TERMS: &[&str] = &[
    "entry",
    "requirements",
    "ucas",
    "points",
    "grades",
    "qualification",
    "a-level",
    "btec",
];

pub const CAMPUS_TERMS: &[&str] = &[
    "campus",
    "accommodation",
    "facilities",
    "library",
    "sports",
    "societies",
    "student life",
    "location",
];

pub const CAREER_TERMS: &[&str] = &[
    "career",
    "employment",
    "graduate",
    "job",
    "salary",
    "employer",
    "placement",
    "internship",
];

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b20\d{2}\b",
        r"\b(january|february|march|april|may|june|july|august|september|october|november|december)\b",
        r"\bdeadline\b",
        r"\bopen day\b",
        r"\bstart date\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Number of distinct terms from `terms` found in `body`.
pub(crate) fn distinct_hits(body: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|t| body.contains(*t)).count()
}

pub(crate) fn mentions_dates(body: &str) -> bool {
    DATE_PATTERNS.iter().any(|re| re.is_match(body))
}

pub fn score_education_specific(content: &ScrapedContent, objective: Objective) -> CategoryOutcome {
    let category = Category::EducationSpecific;
    let body = content.body_lower();
    let mut points = 0;
    let mut issues = Vec::new();

    match distinct_hits(&body, COURSE_TERMS) {
        4.. => points += 5,
        2..=3 => points += 3,
        _ => issues.push(
            Issue::new(
                category,
                Severity::High,
                "Insufficient course information",
                "Limited details about course/program structure.",
                "Add sections covering: Course overview, Modules/Units, Year structure, Teaching methods, Assessment types",
            )
            .with_impact("Prospective students cannot evaluate if the program meets their needs"),
        ),
    }

    if distinct_hits(&body, ENTRY_TERMS) > 0 {
        points += 3;
    } else {
        issues.push(
            Issue::new(
                category,
                Severity::High,
                "Missing entry requirements",
                "No clear entry requirements or qualifications listed.",
                "Add a section clearly stating: UCAS points, A-level grades, BTECs, GCSEs, or equivalent qualifications required",
            )
            .with_impact("Students unsure if they qualify, leading to enquiry friction"),
        );
    }

    if mentions_dates(&body) {
        points += 3;
    } else if objective.is_open_day() {
        issues.push(
            Issue::new(
                category,
                Severity::High,
                "Missing open day date",
                "No date/time information found for the open day event.",
                "Prominently display: Date, Time, Campus location, Registration deadline",
            )
            .with_impact("Visitors cannot plan attendance - critical for registration conversion"),
        );
    } else {
        issues.push(
            Issue::new(
                category,
                Severity::Medium,
                "No dates or deadlines shown",
                "No course start dates, application deadlines, or key dates mentioned.",
                "Add key dates: Application deadlines, Course start dates, Open day dates",
            )
            .with_impact("Creates uncertainty and may cause students to defer their application"),
        );
    }

    points += match distinct_hits(&body, CAMPUS_TERMS) {
        0 => 0,
        1 => 1,
        _ => 2,
    };

    match distinct_hits(&body, CAREER_TERMS) {
        0 => issues.push(
            Issue::new(
                category,
                Severity::Medium,
                "Missing career outcomes information",
                "No information about graduate employment or career prospects.",
                "Add: Graduate employment rate, Average starting salary, Example employers, Career support services",
            )
            .with_impact("Students cannot assess ROI and career potential of the program"),
        ),
        1 => points += 1,
        _ => points += 2,
    }

    CategoryOutcome::new(category, points, issues)
}
