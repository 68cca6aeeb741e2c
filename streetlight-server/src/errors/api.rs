use axum::extract::rejection::JsonRejection;

use super::{AuthError, StoreError, StreetlightError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    #[error("Streetlight error: {0}")]
    StreetlightError(#[from] StreetlightError),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected request body: {}", rejection.body_text());
        StreetlightError::InvalidRequest.into()
    }
}
