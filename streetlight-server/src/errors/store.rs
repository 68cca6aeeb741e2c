use axum::http::StatusCode;

/// Failures talking to the realtime database.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Realtime database unreachable: {0}")]
    Connectivity(String),

    #[error("Realtime database timed out")]
    Timeout,

    #[error("No record at {0}")]
    NotFound(String),

    #[error("Realtime database rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected realtime database payload: {0}")]
    Decode(String),
}

impl StoreError {
    /// Unreachable or timed out; the next refresh cycle may succeed.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::Connectivity(_) | StoreError::Timeout)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Rejected { .. } => StatusCode::BAD_GATEWAY,
            StoreError::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Connectivity(err.to_string())
        }
    }
}
