//! Axum route handlers for reference-data lookups and the admin reload.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::limits::{AssetSpec, FieldLimit, Taxonomies};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LimitsQuery {
    pub channel: String,
    pub subtype: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LimitsResponse {
    pub channel: String,
    pub subtype: Option<String>,
    pub fields: Vec<FieldLimit>,
}

#[derive(Debug, Deserialize)]
pub struct SpecsQuery {
    pub channel: String,
}

#[derive(Debug, Serialize)]
pub struct SpecsResponse {
    pub channel: String,
    pub specs: Vec<AssetSpec>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub message: String,
    pub cleared_entries: usize,
}

/// GET /v1/ad-limits?channel=&subtype=
pub async fn handle_ad_limits(
    State(state): State<AppState>,
    Query(query): Query<LimitsQuery>,
) -> Result<Json<LimitsResponse>, AppError> {
    info!(
        "Fetching ad limits for channel: {}, subtype: {:?}",
        query.channel, query.subtype
    );

    let set = state
        .reference
        .limits_for(&query.channel, query.subtype.as_deref())?
        .ok_or_else(|| {
            let mut message = format!("No ad limits found for channel '{}'", query.channel);
            if let Some(subtype) = &query.subtype {
                message.push_str(&format!(" and subtype '{subtype}'"));
            }
            AppError::NotFound(message)
        })?;

    Ok(Json(LimitsResponse {
        channel: set.channel,
        subtype: set.subtype,
        fields: set.fields,
    }))
}

/// GET /v1/asset-specs?channel=
pub async fn handle_asset_specs(
    State(state): State<AppState>,
    Query(query): Query<SpecsQuery>,
) -> Result<Json<SpecsResponse>, AppError> {
    let specs = state.reference.asset_specs_for(&query.channel)?;
    if specs.is_empty() {
        return Err(AppError::NotFound(format!(
            "No asset specifications found for channel '{}'",
            query.channel
        )));
    }

    info!("Found {} specs for {}", specs.len(), query.channel);
    Ok(Json(SpecsResponse {
        channel: query.channel,
        specs,
    }))
}

/// GET /v1/taxonomies
pub async fn handle_taxonomies(State(state): State<AppState>) -> Result<Json<Taxonomies>, AppError> {
    Ok(Json(state.reference.taxonomies()?))
}

/// POST /admin/reload-config
///
/// Clears the reference-data cache so edited YAML tables are picked up
/// without a restart.
pub async fn handle_reload_config(State(state): State<AppState>) -> Json<ReloadResponse> {
    let cleared_entries = state.reference.clear_cache();
    Json(ReloadResponse {
        success: true,
        message: format!(
            "Configuration cache cleared successfully. {cleared_entries} entries removed."
        ),
        cleared_entries,
    })
}
