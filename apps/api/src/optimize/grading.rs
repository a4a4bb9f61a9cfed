use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

/// ≥90 A, ≥80 B, ≥70 C, ≥60 D, otherwise F.
pub fn letter_grade(percentage: u32) -> Grade {
    match percentage {
        90.. => Grade::A,
        80..=89 => Grade::B,
        70..=79 => Grade::C,
        60..=69 => Grade::D,
        _ => Grade::F,
    }
}

/// Floor of `score * 100 / max`; zero when `max` is zero.
pub fn percentage_of(score: u32, max: u32) -> u32 {
    if max == 0 {
        0
    } else {
        score * 100 / max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u32,
    pub max: u32,
    pub percentage: u32,
    pub grade: Grade,
}

impl CategoryScore {
    /// Builds a score, clamping `score` to `max`.
    pub fn new(score: u32, max: u32) -> Self {
        let score = score.min(max);
        let percentage = percentage_of(score, max);
        Self {
            score,
            max,
            percentage,
            grade: letter_grade(percentage),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// The six scored categories with their point maxima.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Copy Quality")]
    CopyQuality,
    #[serde(rename = "Usability")]
    Usability,
    #[serde(rename = "Conversion Elements")]
    ConversionElements,
    #[serde(rename = "Technical SEO")]
    TechnicalSeo,
    #[serde(rename = "Education-Specific")]
    EducationSpecific,
    #[serde(rename = "Accessibility")]
    Accessibility,
}

impl Category {
    #[cfg(test)]
    pub const ALL: [Category; 6] = [
        Category::CopyQuality,
        Category::Usability,
        Category::ConversionElements,
        Category::TechnicalSeo,
        Category::EducationSpecific,
        Category::Accessibility,
    ];

    pub fn max_points(self) -> u32 {
        match self {
            Category::CopyQuality | Category::Usability | Category::ConversionElements => 20,
            Category::TechnicalSeo | Category::EducationSpecific => 15,
            Category::Accessibility => 10,
        }
    }

    /// Key used in the `scores` map of a response.
    pub fn key(self) -> &'static str {
        match self {
            Category::CopyQuality => "copy_quality",
            Category::Usability => "usability",
            Category::ConversionElements => "conversion_elements",
            Category::TechnicalSeo => "technical_seo",
            Category::EducationSpecific => "education_specific",
            Category::Accessibility => "accessibility",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::CopyQuality => "Copy Quality",
            Category::Usability => "Usability",
            Category::ConversionElements => "Conversion Elements",
            Category::TechnicalSeo => "Technical SEO",
            Category::EducationSpecific => "Education-Specific",
            Category::Accessibility => "Accessibility",
        }
    }
}

/// A specific problem found on the page, with an actionable suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub category: Category,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

impl Issue {
    pub fn new(
        category: Category,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            title: title.into(),
            description: description.into(),
            suggestion: suggestion.into(),
            evidence: None,
            impact: None,
        }
    }

    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }
}

/// Output of one category rubric.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOutcome {
    pub category: Category,
    pub score: CategoryScore,
    pub issues: Vec<Issue>,
}

impl CategoryOutcome {
    pub fn new(category: Category, points: u32, issues: Vec<Issue>) -> Self {
        Self {
            category,
            score: CategoryScore::new(points, category.max_points()),
            issues,
        }
    }
}
