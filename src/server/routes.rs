//! HTTP API routes
//!
//! Geodata is best effort: location endpoints answer 200 with `null` when
//! nothing could be resolved. Only malformed requests produce errors.

use crate::geo::{parser, ResolvedLocation};
use crate::map::{build_markers, KindFilter, MapMarker, MapRow, MarkerQuery};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/locations/merge", post(merge_handler))
        .route("/api/locations/resolve", post(resolve_handler))
        .route("/api/locations/parse", get(parse_handler))
        .route("/api/map/markers", post(markers_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub geocoding_configured: bool,
    pub forward_cache_entries: u64,
    pub reverse_cache_entries: u64,
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let cache = state.resolver.cache();
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoding_configured: !state.config.geocoding.api_key.is_empty(),
        forward_cache_entries: cache.forward_len(),
        reverse_cache_entries: cache.reverse_len(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Merge request body
#[derive(Debug, Default, Deserialize)]
pub struct MergeRequest {
    /// Free-text location typed by the user
    #[serde(default)]
    pub location: Option<String>,
    /// Raw coordinate string, e.g. from the device's position
    #[serde(default)]
    pub coords: Option<String>,
}

/// Canonical location to store
#[derive(Debug, Serialize, Deserialize)]
pub struct MergeResponse {
    pub location: Option<String>,
}

/// Build the canonical stored location for a write
///
/// POST /api/locations/merge
async fn merge_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MergeRequest>,
) -> Json<MergeResponse> {
    let location = state
        .resolver
        .merge(req.location.as_deref(), req.coords.as_deref())
        .await;
    Json(MergeResponse { location })
}

/// Resolve request body
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub location: String,
}

/// Resolution result, `null` when nothing matched
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub resolved: Option<ResolvedLocation>,
}

/// Resolve free text to coordinates and admin code
///
/// POST /api/locations/resolve
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResolveRequest>,
) -> Json<ResolveResponse> {
    let resolved = state.resolver.resolve(req.location.trim()).await;
    Json(ResolveResponse { resolved })
}

#[derive(Debug, Deserialize)]
pub struct ParseQuery {
    #[serde(default)]
    pub text: String,
}

/// Parse coordinates out of text without any lookup
///
/// GET /api/locations/parse?text=...
async fn parse_handler(Query(query): Query<ParseQuery>) -> Json<ResolveResponse> {
    Json(ResolveResponse {
        resolved: parser::parse(&query.text),
    })
}

/// Marker request body
#[derive(Debug, Deserialize)]
pub struct MarkersRequest {
    pub rows: Vec<MapRow>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Case-insensitive text search
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkersResponse {
    pub markers: Vec<MapMarker>,
}

/// Extract plottable markers from stored rows
///
/// POST /api/map/markers
async fn markers_handler(Json(req): Json<MarkersRequest>) -> Result<Json<MarkersResponse>, ApiError> {
    let kind: KindFilter = req
        .kind
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(|error| ApiError {
            error,
            code: "INVALID_FILTER".to_string(),
        })?;

    let query = MarkerQuery {
        kind,
        search: req.q,
        tag: req.tag,
        limit: req.limit,
    };

    Ok(Json(MarkersResponse {
        markers: build_markers(&req.rows, &query),
    }))
}
