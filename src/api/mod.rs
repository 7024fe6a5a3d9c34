use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::error;

use crate::aggregator::{AggregateError, NextMatch, NextMatchService};
use crate::broadcasters::{self, CompetitionCategory};
use crate::models::{MatchRecord, SeasonStatus, TimeLeft};
use crate::tv_listings::{self, EspnSchedule};

#[derive(Clone)]
pub struct AppState {
    pub matches: NextMatchService,
    pub espn: EspnSchedule,
}

/// Build the Axum router for the countdown API, optionally serving the
/// front-end build from `static_dir`.
pub fn router(state: AppState, static_dir: Option<&str>) -> Router {
    let mut app = Router::new()
        .route("/api/next-match", get(next_match_handler))
        .route("/api/clear-cache", post(clear_cache_handler))
        .route("/api/countdown", get(countdown_handler))
        .route("/api/broadcaster", get(broadcaster_handler))
        .route("/api/espn-tv-provider", get(espn_tv_provider_handler));
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }
    app.layer(CorsLayer::permissive()).with_state(Arc::new(state))
}

/// Error body shapes returned by the API.
#[derive(Debug)]
pub enum ApiError {
    NotFound(SeasonStatus),
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl From<AggregateError> for ApiError {
    fn from(e: AggregateError) -> Self {
        match e {
            AggregateError::Validation(_) => ApiError::BadRequest("Invalid match data".into()),
            AggregateError::Upstream(detail) => {
                error!("Next-match lookup failed: {}", detail);
                ApiError::Upstream("Failed to fetch match data".into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(status) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "No upcoming matches found", "seasonStatus": status })),
            )
                .into_response(),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Upstream(message) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": message })))
                    .into_response()
            }
        }
    }
}

async fn resolve_next(state: &AppState) -> Result<MatchRecord, ApiError> {
    match state.matches.get_next_match().await? {
        NextMatch::Found(record) => Ok(record),
        NextMatch::OffSeason => Err(ApiError::NotFound(SeasonStatus::OffSeason)),
    }
}

/// GET /api/next-match
async fn next_match_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MatchRecord>, ApiError> {
    resolve_next(&state).await.map(Json)
}

/// POST /api/clear-cache
async fn clear_cache_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.matches.clear_cache().await;
    Json(json!({ "message": "Cache cleared successfully" }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CountdownBody {
    #[serde(rename = "match")]
    next_match: MatchRecord,
    time_left: TimeLeft,
}

/// GET /api/countdown
async fn countdown_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let record = resolve_next(&state).await?;
    let time_left = TimeLeft::until(record.kickoff, Utc::now());
    Ok(Json(CountdownBody {
        next_match: record,
        time_left,
    }))
}

#[derive(Debug, Deserialize)]
struct BroadcasterQuery {
    country: String,
    competition: Option<String>,
}

/// GET /api/broadcaster?country=GB&competition=FA%20Cup
async fn broadcaster_handler(Query(q): Query<BroadcasterQuery>) -> impl IntoResponse {
    let category = q
        .competition
        .as_deref()
        .map(CompetitionCategory::classify)
        .unwrap_or(CompetitionCategory::PremierLeague);
    let found = broadcasters::lookup(&q.country, category);
    Json(json!({
        "country": q.country.trim().to_ascii_uppercase(),
        "category": category,
        "name": found.name,
        "url": found.url,
    }))
}

#[derive(Debug, Deserialize)]
struct TvProviderQuery {
    date: Option<String>,
}

/// GET /api/espn-tv-provider?date=YYYYMMDD
async fn espn_tv_provider_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TvProviderQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = match q.date.as_deref() {
        Some(d) if tv_listings::is_schedule_date(d) => d,
        _ => {
            return Err(ApiError::BadRequest(
                "Date parameter required (YYYYMMDD format)".into(),
            ))
        }
    };
    let provider = state.espn.tv_provider(date).await.map_err(|e| {
        error!("Error fetching ESPN: {:#}", e);
        ApiError::Internal("Failed to fetch ESPN".into())
    })?;
    Ok(Json(json!({ "tvProvider": provider })))
}
