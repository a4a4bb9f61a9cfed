pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::copy::handlers as copy;
use crate::optimize::handlers as optimize;
use crate::reference::handlers as reference;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Copy API
        .route("/v1/generate-copy", post(copy::handle_generate_copy))
        .route("/v1/shorten", post(copy::handle_shorten))
        .route("/v1/analyze-usps", post(copy::handle_analyze_usps))
        // Landing-page optimisation
        .route("/v1/optimize-landing", post(optimize::handle_optimize_landing))
        // Reference data
        .route("/v1/ad-limits", get(reference::handle_ad_limits))
        .route("/v1/asset-specs", get(reference::handle_asset_specs))
        .route("/v1/taxonomies", get(reference::handle_taxonomies))
        .route("/admin/reload-config", post(reference::handle_reload_config))
        .with_state(state)
}
