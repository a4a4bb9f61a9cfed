//! Page Scoring: pluggable, trait-based scorer over `ScrapedContent`.
//!
//! Default: `RubricScorer` (rule-based, deterministic, six categories).
//! Optional: `LlmReviewScorer`, which replaces the copy, usability and
//! conversion rubrics with a model review on the same point scale.
//!
//! `AppState` holds an `Arc<dyn PageScorer>`, swapped at startup via
//! ENABLE_LLM_PAGE_SCORING.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::llm_client::prompts::{ISSUE_FORMAT_INSTRUCTION, PLAIN_LANGUAGE_INSTRUCTION};
use crate::llm_client::{ChatPrompt, LlmError, ModelTier, OutputSchema, TextGenerator};
use crate::models::scraped::ScrapedContent;
use crate::optimize::content::{missing_objective_cta, score_conversion, score_copy_quality, score_usability};
use crate::optimize::education::score_education_specific;
use crate::optimize::grading::{
    letter_grade, percentage_of, Category, CategoryOutcome, CategoryScore, Grade, Issue, Severity,
};
use crate::optimize::objective::Objective;
use crate::optimize::prompts::{
    CONVERSION_REVIEW_TEMPLATE, COPY_REVIEW_TEMPLATE, REVIEW_SYSTEM, USABILITY_REVIEW_TEMPLATE,
};
use crate::optimize::technical::{score_accessibility, score_technical_seo};

const MAX_HIGH_QUICK_WINS: usize = 3;
const MAX_QUICK_WINS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Output data models (shared across all scorer backends)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: Option<String>,
    pub h1: Option<String>,
    pub meta_description: Option<String>,
    pub cta_count: usize,
    pub form_count: usize,
    pub has_testimonials: bool,
    pub has_rankings: bool,
    pub word_count: usize,
}

/// Scored analysis of one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageAnalysis {
    /// 0–100 across every active category.
    pub overall_score: u32,
    pub grade: Grade,
    pub scores: BTreeMap<String, CategoryScore>,
    pub issues: Vec<Issue>,
    pub quick_wins: Vec<String>,
    pub summary: PageSummary,
}

/// The page scorer trait. Implement this to swap backends without touching
/// the handlers. Category outcomes may be computed in any order.
#[async_trait]
pub trait PageScorer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn score(&self, content: &ScrapedContent, objective: Objective) -> Vec<CategoryOutcome>;
}

// ────────────────────────────────────────────────────────────────────────────
// RubricScorer (default)
// ────────────────────────────────────────────────────────────────────────────

pub struct RubricScorer;

#[async_trait]
impl PageScorer for RubricScorer {
    fn name(&self) -> &'static str {
        "rubric"
    }

    async fn score(&self, content: &ScrapedContent, objective: Objective) -> Vec<CategoryOutcome> {
        vec![
            score_copy_quality(content),
            score_usability(content),
            score_conversion(content, objective),
            score_technical_seo(content),
            score_education_specific(content, objective),
            score_accessibility(content),
        ]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmReviewScorer: model review for the subjective categories
// ────────────────────────────────────────────────────────────────────────────

const REVIEW_SCHEMA_NAME: &str = "landing_page_analysis";
const REVIEW_TEMPERATURE: f32 = 0.3;
const REVIEW_SCALE: f64 = 10.0;
const MAX_REVIEW_ISSUES: usize = 3;
const MAX_PARAGRAPH_CHARS: usize = 1000;

pub struct LlmReviewScorer(pub Arc<dyn TextGenerator>);

#[derive(Debug, Deserialize)]
struct Review {
    score: f64,
    #[serde(default)]
    issues: Vec<ReviewIssue>,
}

#[derive(Debug, Deserialize)]
struct ReviewIssue {
    title: String,
    description: String,
    suggestion: String,
}

fn review_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "score": {
                "type": "number",
                "description": "Score from 0 to 10",
                "minimum": 0,
                "maximum": 10
            },
            "issues": {
                "type": "array",
                "description": "List of 2-3 specific issues with actionable suggestions",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {"type": "string"},
                        "description": {"type": "string"},
                        "suggestion": {"type": "string"}
                    },
                    "required": ["title", "description", "suggestion"],
                    "additionalProperties": false
                },
                "minItems": 0,
                "maxItems": MAX_REVIEW_ISSUES
            }
        },
        "required": ["score", "issues"],
        "additionalProperties": false
    })
}

/// <4 high, <7 medium, otherwise low.
fn review_severity(score: f64) -> Severity {
    if score < 4.0 {
        Severity::High
    } else if score < 7.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn fallback_review() -> Review {
    Review {
        score: REVIEW_SCALE / 2.0,
        issues: vec![ReviewIssue {
            title: "Analysis unavailable".to_string(),
            description: "Unable to perform detailed analysis due to technical error".to_string(),
            suggestion: "Please try again or contact support if the issue persists".to_string(),
        }],
    }
}

fn impact_for(category: Category) -> &'static str {
    match category {
        Category::CopyQuality => "Students may not understand the key message quickly enough",
        Category::Usability => "Students may struggle to find information or leave the page",
        _ => "Students may not know what action to take",
    }
}

async fn request_review(llm: &dyn TextGenerator, user: &str) -> Result<Review, LlmError> {
    let schema = review_schema();
    let prompt = ChatPrompt {
        system: REVIEW_SYSTEM,
        user,
        temperature: REVIEW_TEMPERATURE,
        tier: ModelTier::Mini,
    };
    let output = OutputSchema {
        name: REVIEW_SCHEMA_NAME,
        schema: &schema,
    };
    let value = llm.complete_structured(&prompt, &output).await?;
    Ok(serde_json::from_value(value)?)
}

/// Scores one category from a model review, falling back to a mid-range
/// score and a placeholder issue when the review cannot be obtained.
async fn review_category(llm: &dyn TextGenerator, category: Category, user: String) -> CategoryOutcome {
    let review = match request_review(llm, &user).await {
        Ok(review) => review,
        Err(e) => {
            error!("{} review failed, using fallback: {e}", category.label());
            fallback_review()
        }
    };

    let raw = review.score.clamp(0.0, REVIEW_SCALE);
    let points = (raw / REVIEW_SCALE * f64::from(category.max_points())).floor() as u32;
    let severity = review_severity(raw);

    let issues = review
        .issues
        .into_iter()
        .take(MAX_REVIEW_ISSUES)
        .map(|i| {
            Issue::new(category, severity, i.title, i.description, i.suggestion)
                .with_impact(impact_for(category))
        })
        .collect();

    CategoryOutcome::new(category, points, issues)
}

fn fill_common(template: &str, objective: Objective) -> String {
    template
        .replace("{objective}", objective.label())
        .replace("{issue_format}", ISSUE_FORMAT_INSTRUCTION)
        .replace("{plain_language}", PLAIN_LANGUAGE_INSTRUCTION)
}

fn first_h1(content: &ScrapedContent) -> &str {
    content
        .h1
        .first()
        .map(String::as_str)
        .unwrap_or("No main heading found")
}

fn joined_h2(content: &ScrapedContent, limit: usize) -> String {
    if content.h2.is_empty() {
        "No subheadings found".to_string()
    } else {
        content.h2.iter().take(limit).cloned().collect::<Vec<_>>().join(", ")
    }
}

pub(crate) fn copy_review_prompt(content: &ScrapedContent, objective: Objective) -> String {
    let mut paragraphs = content.paragraphs.iter().take(3).cloned().collect::<Vec<_>>().join(" ");
    if paragraphs.is_empty() {
        paragraphs = "No content found".to_string();
    } else if paragraphs.chars().count() > MAX_PARAGRAPH_CHARS {
        paragraphs = paragraphs.chars().take(MAX_PARAGRAPH_CHARS).collect::<String>() + "...";
    }

    fill_common(COPY_REVIEW_TEMPLATE, objective)
        .replace("{h1}", first_h1(content))
        .replace("{h2}", &joined_h2(content, 5))
        .replace("{paragraphs}", &paragraphs)
        .replace("{key_information}", objective.key_information())
}

pub(crate) fn usability_review_prompt(content: &ScrapedContent, objective: Objective) -> String {
    let structure = format!(
        "{} main heading(s), {} subheadings, {} content sections",
        content.h1.len(),
        content.h2.len(),
        content.paragraphs.len()
    );
    fill_common(USABILITY_REVIEW_TEMPLATE, objective)
        .replace("{h1}", first_h1(content))
        .replace("{h2}", &joined_h2(content, 8))
        .replace("{structure}", &structure)
}

pub(crate) fn conversion_review_prompt(content: &ScrapedContent, objective: Objective) -> String {
    let body = content.body_lower();
    let has_video = ["video", "youtube", "vimeo"].iter().any(|k| body.contains(k));

    let mut actions = if content.ctas.is_empty() {
        "No action buttons detected\n".to_string()
    } else {
        let ctas: Vec<&str> = content.ctas.iter().take(8).map(String::as_str).collect();
        format!("Buttons/CTAs found: {}\n", ctas.join(", "))
    };
    actions.push_str(&format!("Forms on page: {}\n", content.forms.len()));
    actions.push_str(&format!("Video present: {}\n", if has_video { "Yes" } else { "No" }));

    fill_common(CONVERSION_REVIEW_TEMPLATE, objective)
        .replace("{actions}", &actions)
        .replace("{guidance}", objective.cta_guidance())
}

#[async_trait]
impl PageScorer for LlmReviewScorer {
    fn name(&self) -> &'static str {
        "llm-review"
    }

    async fn score(&self, content: &ScrapedContent, objective: Objective) -> Vec<CategoryOutcome> {
        let llm = self.0.as_ref();

        let (copy, usability, mut conversion) = futures::join!(
            review_category(llm, Category::CopyQuality, copy_review_prompt(content, objective)),
            review_category(llm, Category::Usability, usability_review_prompt(content, objective)),
            review_category(
                llm,
                Category::ConversionElements,
                conversion_review_prompt(content, objective)
            ),
        );
        conversion.issues.extend(missing_objective_cta(content, objective));

        vec![
            copy,
            usability,
            conversion,
            score_technical_seo(content),
            score_education_specific(content, objective),
            score_accessibility(content),
        ]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregation
// ────────────────────────────────────────────────────────────────────────────

/// Up to 3 high-severity suggestions; medium ones are added only when fewer
/// than 3 high-severity issues exist, up to 5 in total. Discovery order is kept.
pub fn extract_quick_wins(issues: &[Issue]) -> Vec<String> {
    let format_win = |i: &Issue| format!("**{}**: {}", i.title, i.suggestion);

    let mut wins: Vec<String> = issues
        .iter()
        .filter(|i| i.severity == Severity::High)
        .take(MAX_HIGH_QUICK_WINS)
        .map(format_win)
        .collect();

    if wins.len() < MAX_HIGH_QUICK_WINS {
        let room = MAX_QUICK_WINS - wins.len();
        wins.extend(
            issues
                .iter()
                .filter(|i| i.severity == Severity::Medium)
                .take(room)
                .map(format_win),
        );
    }

    wins
}

pub fn page_summary(content: &ScrapedContent) -> PageSummary {
    let body = content.body_lower();
    PageSummary {
        title: content.title.clone(),
        h1: content.h1.first().cloned(),
        meta_description: content.meta_description.clone(),
        cta_count: content.ctas.len(),
        form_count: content.forms.len(),
        has_testimonials: body.contains("testimonial") || body.contains("review"),
        has_rankings: body.contains("ranked") || body.contains("ranking"),
        word_count: content.word_count,
    }
}

/// Sums category outcomes into an overall percentage, grade and quick wins.
pub fn aggregate(outcomes: Vec<CategoryOutcome>, content: &ScrapedContent) -> PageAnalysis {
    let total: u32 = outcomes.iter().map(|o| o.score.score).sum();
    let max: u32 = outcomes.iter().map(|o| o.score.max).sum();
    let overall_score = percentage_of(total, max);

    let mut scores = BTreeMap::new();
    let mut issues = Vec::new();
    for outcome in outcomes {
        scores.insert(outcome.category.key().to_string(), outcome.score);
        issues.extend(outcome.issues);
    }

    PageAnalysis {
        overall_score,
        grade: letter_grade(overall_score),
        quick_wins: extract_quick_wins(&issues),
        scores,
        issues,
        summary: page_summary(content),
    }
}

pub async fn analyze_page(
    scorer: &dyn PageScorer,
    content: &ScrapedContent,
    objective: Objective,
) -> PageAnalysis {
    let outcomes = scorer.score(content, objective).await;
    let analysis = aggregate(outcomes, content);
    info!(
        "Landing page analysis complete ({}): {}/100 ({})",
        scorer.name(),
        analysis.overall_score,
        analysis.grade
    );
    analysis
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
