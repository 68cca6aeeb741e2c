use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router, middleware};
use streetlight_api::analytics;
use streetlight_api::models::*;

use crate::errors::{ApiError, StreetlightError};
use crate::middlewares::{TokenState, auth};
use crate::services::{RefreshService, Snapshot};

#[derive(Clone)]
pub struct AnalyticsState {
    pub refresh_service: Arc<RefreshService>,
}

pub fn analytics_router(analytics_state: AnalyticsState, token_state: TokenState) -> Router {
    Router::new()
        .route("/api/overview", get(get_overview))
        .route("/api/analytics", get(get_analytics))
        .route_layer(middleware::from_fn_with_state(token_state, auth))
        .with_state(analytics_state)
}

fn current_snapshot(state: &AnalyticsState) -> Result<Arc<Snapshot>, StreetlightError> {
    state
        .refresh_service
        .current()
        .snapshot
        .ok_or(StreetlightError::SnapshotUnavailable)
}

#[utoipa::path(
    get,
    path = "/api/overview",
    tag = "analytics",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Fleet summary", body = OverviewResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "No snapshot available yet")
    )
)]
pub async fn get_overview(
    State(state): State<AnalyticsState>,
) -> Result<Json<OverviewResponse>, ApiError> {
    let snapshot = current_snapshot(&state)?;

    Ok(Json(analytics::overview(&snapshot.records)))
}

#[utoipa::path(
    get,
    path = "/api/analytics",
    tag = "analytics",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Sensor, uptime and efficiency analytics", body = AnalyticsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "No snapshot available yet")
    )
)]
pub async fn get_analytics(
    State(state): State<AnalyticsState>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let snapshot = current_snapshot(&state)?;

    Ok(Json(analytics::analytics(&snapshot.records)))
}
