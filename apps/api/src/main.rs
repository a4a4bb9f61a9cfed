mod config;
mod copy;
mod errors;
mod llm_client;
mod models;
mod optimize;
mod reference;
mod routes;
mod scrape;
mod state;

use anyhow::Result;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::optimize::scorer::{LlmReviewScorer, PageScorer, RubricScorer};
use crate::reference::ReferenceStore;
use crate::routes::build_router;
use crate::scrape::FallbackScraper;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Campus Ads API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.model_generation.clone(),
        config.model_generation_mini.clone(),
        config.request_timeout(),
    ));
    info!(
        "LLM client initialized (models: {}, {})",
        config.model_generation, config.model_generation_mini
    );

    // Reference tables are loaded lazily on first request
    let reference = ReferenceStore::new(&config.data_dir, config.config_cache_ttl());
    info!(
        "Reference data directory: {} (cache TTL {}s)",
        reference.data_dir().display(),
        config.config_cache_ttl_seconds
    );

    let scraper = Arc::new(FallbackScraper::from_config(
        config.scrape_timeout(),
        &config.user_agent,
        config.firecrawl_api_key.clone(),
    ));
    if config.firecrawl_api_key.is_none() {
        warn!("FIRECRAWL_API_KEY not set; scraping with direct HTML only");
    }

    // Rubric scorer by default; swap via ENABLE_LLM_PAGE_SCORING
    let page_scorer: Arc<dyn PageScorer> = if config.enable_llm_page_scoring {
        Arc::new(LlmReviewScorer(llm.clone()))
    } else {
        Arc::new(RubricScorer)
    };
    info!("Page scorer: {}", page_scorer.name());

    let cors = build_cors(&config.cors_origins());

    // Build app state
    let state = AppState {
        llm,
        reference,
        scraper,
        page_scorer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Restricts CORS to the configured origins. Unparseable origins are skipped.
fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
