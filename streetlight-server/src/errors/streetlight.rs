use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum StreetlightError {
    #[error("Streetlight not found")]
    StreetlightNotFound,

    #[error("Invalid streetlight id")]
    InvalidId,

    #[error("Manual control requires manual mode")]
    ManualControlUnavailable,

    #[error("No snapshot available yet")]
    SnapshotUnavailable,

    #[error("Invalid request parameters")]
    InvalidRequest,
}

impl StreetlightError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StreetlightError::StreetlightNotFound => StatusCode::NOT_FOUND,
            StreetlightError::InvalidId => StatusCode::BAD_REQUEST,
            StreetlightError::ManualControlUnavailable => StatusCode::CONFLICT,
            StreetlightError::SnapshotUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            StreetlightError::InvalidRequest => StatusCode::BAD_REQUEST,
        }
    }
}
