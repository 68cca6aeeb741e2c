use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router, middleware};
use axum_extra::extract::WithRejection;
use streetlight_api::models::*;

use crate::errors::{ApiError, StreetlightError};
use crate::middlewares::{TokenState, auth};
use crate::services::{CommandService, RefreshService};

#[derive(Clone)]
pub struct StreetlightState {
    pub refresh_service: Arc<RefreshService>,
    pub command_service: Arc<CommandService>,
}

pub fn streetlight_router(streetlight_state: StreetlightState, token_state: TokenState) -> Router {
    Router::new()
        .route("/api/streetlights", get(get_streetlights))
        .route("/api/streetlights/:streetlight_id", get(get_streetlight_by_id))
        .route("/api/streetlights/:streetlight_id/mode", put(update_streetlight_mode))
        .route("/api/streetlights/:streetlight_id/manual", put(update_streetlight_manual_state))
        .route_layer(middleware::from_fn_with_state(token_state, auth))
        .with_state(streetlight_state)
}

/// Keys the realtime database refuses in a path segment.
const FORBIDDEN_ID_CHARS: [char; 6] = ['.', '$', '#', '[', ']', '/'];

fn validate_id(id: &str) -> Result<(), StreetlightError> {
    if id.trim().is_empty() || id.contains(FORBIDDEN_ID_CHARS) {
        return Err(StreetlightError::InvalidId);
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/streetlights",
    tag = "streetlight",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current snapshot of the fleet", body = SnapshotResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_streetlights(
    State(state): State<StreetlightState>,
) -> Result<Json<SnapshotResponse>, ApiError> {
    Ok(Json(state.refresh_service.current().to_response()))
}

#[utoipa::path(
    get,
    path = "/api/streetlights/{streetlight_id}",
    tag = "streetlight",
    params(
        ("streetlight_id" = String, Path, description = "Streetlight ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Get streetlight successfully", body = StreetlightDetailResponse),
        (status = 400, description = "Invalid streetlight id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Streetlight not found"),
        (status = 503, description = "No snapshot available yet")
    )
)]
pub async fn get_streetlight_by_id(
    State(state): State<StreetlightState>,
    Path(streetlight_id): Path<String>,
) -> Result<Json<StreetlightDetailResponse>, ApiError> {
    validate_id(&streetlight_id)?;

    let view = state.refresh_service.current();
    let snapshot = view.snapshot.ok_or(StreetlightError::SnapshotUnavailable)?;

    let record = snapshot
        .find(&streetlight_id)
        .cloned()
        .ok_or(StreetlightError::StreetlightNotFound)?;

    Ok(Json(StreetlightDetailResponse {
        last_update_at: record.last_update_at(),
        manual_control: record.mode == LightMode::Manual,
        record,
    }))
}

#[utoipa::path(
    put,
    path = "/api/streetlights/{streetlight_id}/mode",
    tag = "streetlight",
    params(
        ("streetlight_id" = String, Path, description = "Streetlight ID")
    ),
    request_body = SetModeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Mode updated", body = CommandResponse),
        (status = 400, description = "Invalid streetlight id or request body"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Streetlight not found"),
        (status = 503, description = "Realtime database unavailable")
    )
)]
pub async fn update_streetlight_mode(
    State(state): State<StreetlightState>,
    Path(streetlight_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<SetModeRequest>, ApiError>,
) -> Result<Json<CommandResponse>, ApiError> {
    validate_id(&streetlight_id)?;

    state
        .command_service
        .set_mode(&streetlight_id, body.mode)
        .await?;

    Ok(Json(CommandResponse {
        message: format!("Mode updated to {}", body.mode),
    }))
}

#[utoipa::path(
    put,
    path = "/api/streetlights/{streetlight_id}/manual",
    tag = "streetlight",
    params(
        ("streetlight_id" = String, Path, description = "Streetlight ID")
    ),
    request_body = SetManualStateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Manual state updated", body = CommandResponse),
        (status = 400, description = "Invalid streetlight id or request body"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Streetlight not found"),
        (status = 409, description = "Streetlight is in automatic mode"),
        (status = 503, description = "Realtime database unavailable")
    )
)]
pub async fn update_streetlight_manual_state(
    State(state): State<StreetlightState>,
    Path(streetlight_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<SetManualStateRequest>, ApiError>,
) -> Result<Json<CommandResponse>, ApiError> {
    validate_id(&streetlight_id)?;

    // Only refuse when the snapshot says so; an unseen id goes to the store.
    let view = state.refresh_service.current();
    let mode = view
        .snapshot
        .as_ref()
        .and_then(|snapshot| snapshot.find(&streetlight_id))
        .map(|record| record.mode);

    if mode == Some(LightMode::Automatic) {
        return Err(StreetlightError::ManualControlUnavailable.into());
    }

    state
        .command_service
        .set_manual_state(&streetlight_id, body.on)
        .await?;

    Ok(Json(CommandResponse {
        message: format!("Light turned {}", LightStatus::from(body.on)),
    }))
}
