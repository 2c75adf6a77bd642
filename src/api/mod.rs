use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::Config;
use crate::error::ApiError;
use crate::matchup;
use crate::render::PageRenderer;
use crate::scrape;

#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<dyn PageRenderer>,
    pub config: Config,
}

/// Build the Axum router for the API.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/", get(root_handler))
        .route("/lineups", get(lineups_handler))
        .route("/pitcher/:name", get(pitcher_handler))
        .route("/batter/:name/vs-pitches", get(batter_handler))
        .route("/matchup/:away/:home", get(matchup_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// GET-only CORS with a fixed origin allow-list; request headers are
/// mirrored so credentials stay permitted.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .origins()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// GET / — service description and endpoint catalogue.
async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "message": "MLB Matchup Analysis API",
        "endpoints": {
            "/lineups": "Get today's MLB lineups",
            "/matchup/{away_team}/{home_team}": "Get detailed matchup analysis",
            "/pitcher/{name}": "Get pitcher arsenal data",
            "/batter/{name}/vs-pitches": "Get batter performance vs pitch types",
            "/health": "Health check"
        }
    }))
}

/// GET /lineups
async fn lineups_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let games = scrape::fetch_lineups(state.renderer.as_ref(), &state.config).await?;
    Ok(Json(json!({ "status": "success", "data": games })))
}

/// GET /pitcher/:name
async fn pitcher_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let arsenal = scrape::fetch_pitch_arsenal(state.renderer.as_ref(), &state.config, &name).await?;
    Ok(Json(json!({
        "status": "success",
        "pitcher": name,
        "arsenal": arsenal,
    })))
}

/// GET /batter/:name/vs-pitches
async fn batter_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = scrape::fetch_batter_vs_pitch(state.renderer.as_ref(), &state.config, &name).await?;
    Ok(Json(json!({
        "status": "success",
        "batter": name,
        "stats": stats,
    })))
}

/// GET /matchup/:away/:home
async fn matchup_handler(
    State(state): State<Arc<AppState>>,
    Path((away, home)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let analysis =
        matchup::compose_matchup(state.renderer.as_ref(), &state.config, &away, &home).await?;
    Ok(Json(json!({ "status": "success", "data": analysis })))
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
