use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router, middleware};
use axum_extra::extract::WithRejection;
use streetlight_api::models::*;

use crate::configs::Refresh;
use crate::errors::ApiError;
use crate::middlewares::{TokenState, auth};
use crate::repositories::StreetlightRepository;
use crate::services::RefreshService;

#[derive(Clone)]
pub struct SettingState {
    pub refresh_service: Arc<RefreshService>,
    pub streetlight_repository: Arc<StreetlightRepository>,
}

pub fn setting_router(setting_state: SettingState, token_state: TokenState) -> Router {
    Router::new()
        .route(
            "/api/settings/refresh",
            get(get_refresh_settings).put(update_refresh_settings),
        )
        .route("/api/settings/connection", get(test_connection))
        .route_layer(middleware::from_fn_with_state(token_state, auth))
        .with_state(setting_state)
}

fn refresh_settings(refresh_service: &RefreshService) -> RefreshSettingsResponse {
    RefreshSettingsResponse {
        interval: refresh_service.interval().as_secs(),
        min_interval: Refresh::MIN_INTERVAL,
        max_interval: Refresh::MAX_INTERVAL,
        cache_ttl: refresh_service.snapshot_service().ttl().as_secs(),
    }
}

#[utoipa::path(
    get,
    path = "/api/settings/refresh",
    tag = "setting",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current refresh settings", body = RefreshSettingsResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_refresh_settings(
    State(state): State<SettingState>,
) -> Result<Json<RefreshSettingsResponse>, ApiError> {
    Ok(Json(refresh_settings(&state.refresh_service)))
}

#[utoipa::path(
    put,
    path = "/api/settings/refresh",
    tag = "setting",
    request_body = UpdateRefreshSettingsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Refresh interval updated, clamped to the allowed range", body = RefreshSettingsResponse),
        (status = 400, description = "Invalid request parameters"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_refresh_settings(
    State(state): State<SettingState>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateRefreshSettingsRequest>, ApiError>,
) -> Result<Json<RefreshSettingsResponse>, ApiError> {
    state.refresh_service.set_interval(body.interval);

    Ok(Json(refresh_settings(&state.refresh_service)))
}

#[utoipa::path(
    get,
    path = "/api/settings/connection",
    tag = "setting",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Result of probing the realtime database", body = ConnectionResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn test_connection(
    State(state): State<SettingState>,
) -> Result<Json<ConnectionResponse>, ApiError> {
    let repository = &state.streetlight_repository;
    let storage = repository.get_storage();

    let (connected, message) = match storage.exists(repository.collection()).await {
        Ok(true) => (true, "Connection successful".to_string()),
        Ok(false) => (true, format!("Connected, but {} is empty", repository.collection())),
        Err(e) => {
            tracing::warn!("connection probe failed: {}", e);
            (false, e.to_string())
        }
    };

    Ok(Json(ConnectionResponse {
        connected,
        endpoint: storage.endpoint().to_string(),
        message,
    }))
}
