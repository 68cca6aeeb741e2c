use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use axum_extra::extract::WithRejection;
use streetlight_api::models::*;

use crate::errors::{ApiError, AuthError};
use crate::middlewares::{TokenState, auth};
use crate::services::{CredentialCheck, TokenClaims, TokenService};

#[derive(Clone)]
pub struct AuthState {
    pub credentials: Arc<dyn CredentialCheck>,
    pub token_service: Arc<TokenService>,
}

pub fn auth_router(auth_state: AuthState, token_state: TokenState) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route(
            "/api/auth/me",
            get(get_current_session)
                .route_layer(middleware::from_fn_with_state(token_state, auth)),
        )
        .with_state(auth_state)
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, return session token", body = LoginResponse),
        (status = 400, description = "Invalid request parameters"),
        (status = 401, description = "Invalid username or password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credentials = state.credentials.clone();
    let username = body.username.clone();
    let verified = tokio::task::spawn_blocking(move || credentials.verify(&username, &body.password))
        .await
        .map_err(|e| anyhow!("Credential check panicked: {}", e))??;

    if !verified {
        tracing::info!("rejected login for {}", body.username);
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state
        .token_service
        .generate_token(&body.username)
        .map_err(|e| anyhow!("Failed to generate token: {}", e))?;

    tracing::info!("{} logged in", token.username);

    Ok(Json(LoginResponse {
        token: token.token,
        username: token.username,
        expires_at: token.exp,
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Get current session successfully", body = SessionResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_session(
    Extension(token_data): Extension<TokenClaims>,
) -> Result<Json<SessionResponse>, ApiError> {
    Ok(Json(SessionResponse {
        username: token_data.sub,
        issued_at: token_data.iat,
        expires_at: token_data.exp,
    }))
}
