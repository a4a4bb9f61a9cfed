//! Axum route handlers for copy generation, shortening and USP analysis.

use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::copy::generator::{generate_copy, CopyBrief};
use crate::copy::shorten::{shorten_copy, ShortenMethod};
use crate::copy::usps::extract_usps;
use crate::copy::validator::validate_generated_fields;
use crate::errors::AppError;
use crate::llm_client::ModelTier;
use crate::models::copy::{GeneratedOption, Warning};
use crate::scrape::summary::format_scraped_summary;
use crate::state::AppState;

const MAX_OPTIONS: usize = 3;
const USP_PREVIEW_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_creativity() -> u8 {
    5
}

fn default_num_options() -> usize {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct GenerateCopyRequest {
    pub channel: String,
    pub subtype: String,
    pub university: String,
    pub tone: String,
    pub audience: String,
    pub usps: String,
    #[serde(default)]
    pub emojis_allowed: bool,
    #[serde(default)]
    pub landing_url: Option<String>,
    /// 3 = conservative, 5 = balanced, 7 = creative.
    #[serde(default = "default_creativity")]
    pub creativity: u8,
    #[serde(default)]
    pub open_day_date: Option<String>,
    #[serde(default = "default_num_options")]
    pub num_options: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct Timings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_ms: Option<u64>,
    pub generation_ms: u64,
    pub total_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct GenerateCopyResponse {
    pub options: Vec<GeneratedOption>,
    pub warnings: Vec<Warning>,
    pub source: String,
    pub model_used: String,
    pub scraped_context: Option<String>,
    pub timings: Timings,
}

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub text: String,
    pub max_chars: usize,
    #[serde(default = "default_true")]
    pub keep_cta: bool,
    #[serde(default)]
    pub remove_emojis: bool,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub original: String,
    pub shortened: String,
    pub original_length: usize,
    pub shortened_length: usize,
    pub method: ShortenMethod,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeUspsRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeUspsResponse {
    pub usps: Vec<String>,
    pub scraped_content: String,
}

/// Rejects anything that is not an absolute http(s) URL.
pub(crate) fn parse_page_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::Validation(format!("Invalid URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Validation(format!(
            "Unsupported URL scheme '{other}'; use http or https"
        ))),
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /v1/generate-copy
///
/// Resolves limits → hints → optional landing-page scrape → generation →
/// validation. A failed scrape only drops the page context.
pub async fn handle_generate_copy(
    State(state): State<AppState>,
    Json(request): Json<GenerateCopyRequest>,
) -> Result<Json<GenerateCopyResponse>, AppError> {
    let started = Instant::now();
    info!("Generating copy for {} - {}", request.channel, request.subtype);

    if !(1..=MAX_OPTIONS).contains(&request.num_options) {
        return Err(AppError::Validation(format!(
            "num_options must be between 1 and {MAX_OPTIONS}"
        )));
    }
    let landing_url = request
        .landing_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .map(parse_page_url)
        .transpose()?;

    let fields = state
        .reference
        .field_limits_for(&request.channel, Some(&request.subtype))?;
    if fields.is_empty() {
        return Err(AppError::Validation(format!(
            "No field limits found for channel '{}' and subtype '{}'",
            request.channel, request.subtype
        )));
    }

    let taxonomies = state.reference.taxonomies()?;
    let emojis_allowed = request.emojis_allowed && taxonomies.allows_emojis(&request.channel);

    let mut timings = Timings::default();
    let mut scraped_context = None;
    if let Some(url) = &landing_url {
        let scrape_started = Instant::now();
        info!("Scraping landing page: {url}");
        let content = state.scraper.scrape(url.as_str(), true).await;
        match &content.error {
            None => {
                info!("Scraped {} words from landing page", content.word_count);
                scraped_context = Some(format_scraped_summary(&content));
            }
            Some(e) => warn!("Failed to scrape landing page, continuing without context: {e}"),
        }
        timings.scrape_ms = Some(elapsed_ms(scrape_started));
    }

    let brief = CopyBrief {
        channel: &request.channel,
        subtype: &request.subtype,
        university: &request.university,
        tone: &request.tone,
        audience: &request.audience,
        usps: &request.usps,
        tone_hint: taxonomies.tone_hint(&request.tone),
        audience_hint: taxonomies.audience_hint(&request.audience),
        subtype_hint: taxonomies.subtype_hint(&request.subtype),
        emojis_allowed,
        creativity: request.creativity,
        scraped_context: scraped_context.as_deref(),
        open_day_date: request.open_day_date.as_deref(),
        num_options: request.num_options,
    };

    let generation_started = Instant::now();
    let raw_options = generate_copy(state.llm.as_ref(), &brief, &fields).await?;
    timings.generation_ms = elapsed_ms(generation_started);

    let mut options = Vec::with_capacity(raw_options.len());
    let mut warnings = Vec::new();
    for (index, raw) in raw_options.iter().enumerate() {
        let (validated, option_warnings) = validate_generated_fields(raw, &fields);
        warnings.extend(option_warnings);
        options.push(GeneratedOption {
            option: index + 1,
            fields: validated,
        });
    }

    timings.total_ms = elapsed_ms(started);
    info!(
        "Generated {} options with {} warnings in {}ms",
        options.len(),
        warnings.len(),
        timings.total_ms
    );

    Ok(Json(GenerateCopyResponse {
        options,
        warnings,
        source: "openai".to_string(),
        model_used: state.llm.model_name(ModelTier::Generation).to_string(),
        scraped_context,
        timings,
    }))
}

/// POST /v1/shorten
pub async fn handle_shorten(
    State(state): State<AppState>,
    Json(request): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    if request.max_chars == 0 {
        return Err(AppError::Validation("max_chars must be greater than 0".to_string()));
    }

    let shortened = shorten_copy(
        state.llm.as_ref(),
        &request.text,
        request.max_chars,
        request.keep_cta,
        request.remove_emojis,
    )
    .await;

    Ok(Json(ShortenResponse {
        original_length: request.text.chars().count(),
        shortened_length: shortened.text.chars().count(),
        original: request.text,
        shortened: shortened.text,
        method: shortened.method,
    }))
}

/// POST /v1/analyze-usps
///
/// Scrapes the page and asks the mini model for 3–5 selling points.
pub async fn handle_analyze_usps(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeUspsRequest>,
) -> Result<Json<AnalyzeUspsResponse>, AppError> {
    let url = parse_page_url(&request.url)?;
    info!("Analyzing USPs from: {url}");

    let content = state.scraper.scrape(url.as_str(), true).await;
    if let Some(failure) = &content.error {
        return Err(AppError::from_scrape(failure));
    }

    let summary = format_scraped_summary(&content);
    let usps = extract_usps(state.llm.as_ref(), &summary).await;

    Ok(Json(AnalyzeUspsResponse {
        usps,
        scraped_content: summary.chars().take(USP_PREVIEW_CHARS).collect(),
    }))
}
