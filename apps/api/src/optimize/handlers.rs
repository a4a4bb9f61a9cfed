//! Axum route handler for landing-page optimisation.

use std::time::Instant;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::copy::handlers::parse_page_url;
use crate::errors::AppError;
use crate::optimize::objective::Objective;
use crate::optimize::scorer::{analyze_page, PageAnalysis};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub url: String,
    pub objective: Objective,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    #[serde(flatten)]
    pub analysis: PageAnalysis,
    pub url: String,
    pub objective: Objective,
    pub scraped_at: DateTime<Utc>,
    pub analysis_time_ms: u64,
}

/// POST /v1/optimize-landing
///
/// Scrapes the page (Firecrawl preferred) and scores it with the configured
/// page scorer. A failed scrape is surfaced as an upstream error.
pub async fn handle_optimize_landing(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let started = Instant::now();
    let url = parse_page_url(&request.url)?;
    info!("Analyzing landing page: {url} (objective: {})", request.objective);

    let content = state.scraper.scrape(url.as_str(), true).await;
    if let Some(failure) = &content.error {
        return Err(AppError::from_scrape(failure));
    }
    let scraped_at = Utc::now();

    let analysis = analyze_page(state.page_scorer.as_ref(), &content, request.objective).await;

    Ok(Json(OptimizeResponse {
        analysis,
        url: url.to_string(),
        objective: request.objective,
        scraped_at,
        analysis_time_ms: started.elapsed().as_millis() as u64,
    }))
}
