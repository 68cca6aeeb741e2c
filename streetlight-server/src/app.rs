use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::{Json, Router};
use streetlight_api::models::*;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::configs::{Settings, Storage};
use crate::handles::*;
use crate::middlewares::TokenState;
use crate::repositories::StreetlightRepository;
use crate::services::{Argon2Credentials, CommandService, RefreshService, SnapshotService, TokenService};

#[derive(OpenApi)]
#[openapi(
    paths(
        login,
        get_current_session,
        get_streetlights,
        get_streetlight_by_id,
        update_streetlight_mode,
        update_streetlight_manual_state,
        get_overview,
        get_analytics,
        get_refresh_settings,
        update_refresh_settings,
        test_connection,
        sse_handler,
    ),
    components(schemas(
        LightStatus,
        LightMode,
        StreetlightRecord,
        SnapshotState,
        SnapshotResponse,
        RefreshFailure,
        StreetlightDetailResponse,
        Ratio,
        UptimeHealth,
        OverviewResponse,
        TimelineEntry,
        AnalyticsResponse,
        LoginRequest,
        LoginResponse,
        SessionResponse,
        SetModeRequest,
        SetManualStateRequest,
        CommandResponse,
        RefreshSettingsResponse,
        UpdateRefreshSettingsRequest,
        ConnectionResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Operator sessions"),
        (name = "streetlight", description = "Fleet snapshot and device commands"),
        (name = "analytics", description = "Aggregations over the current snapshot"),
        (name = "setting", description = "Refresh and connection settings")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub struct App {
    pub router: Router,
    pub refresh_service: Arc<RefreshService>,
}

/// Wires services and routes over `storage`. The refresh loop is not
/// started here; see [`RefreshService::start`].
pub fn create_app(settings: &Arc<Settings>, storage: Arc<dyn Storage>) -> anyhow::Result<App> {
    let credentials = Arc::new(
        Argon2Credentials::new(&settings.auth.users).context("Failed to load operator accounts")?,
    );
    if credentials.is_empty() {
        tracing::warn!("no operator accounts configured, every login will be rejected");
    }

    let token_service = Arc::new(TokenService::new(&settings.auth));

    let streetlight_repository = Arc::new(StreetlightRepository::new(
        storage,
        settings.database.collection.clone(),
    ));
    let snapshot_service = Arc::new(SnapshotService::new(
        streetlight_repository.clone(),
        settings.refresh.cache_ttl(),
    ));
    let refresh_service = Arc::new(RefreshService::new(
        snapshot_service,
        settings.refresh.interval(),
    ));
    let command_service = Arc::new(CommandService::new(
        streetlight_repository.clone(),
        refresh_service.clone(),
    ));

    let token_state = TokenState {
        token_service: token_service.clone(),
    };

    let router = Router::new()
        .merge(auth_router(
            AuthState {
                credentials,
                token_service,
            },
            token_state.clone(),
        ))
        .merge(streetlight_router(
            StreetlightState {
                refresh_service: refresh_service.clone(),
                command_service,
            },
            token_state.clone(),
        ))
        .merge(analytics_router(
            AnalyticsState {
                refresh_service: refresh_service.clone(),
            },
            token_state.clone(),
        ))
        .merge(setting_router(
            SettingState {
                refresh_service: refresh_service.clone(),
                streetlight_repository,
            },
            token_state.clone(),
        ))
        .merge(sse_router(
            SSEState {
                refresh_service: refresh_service.clone(),
            },
            token_state,
        ))
        .route("/api/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(App {
        router,
        refresh_service,
    })
}
