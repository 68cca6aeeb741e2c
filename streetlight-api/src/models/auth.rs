use alloc::string::String;

use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Operator account name
    pub username: String,
    /// Plain text password
    pub password: String,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the session
    pub token: String,
    /// Authenticated account name
    pub username: String,
    /// Token expiry in unix seconds
    pub expires_at: u64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Authenticated account name
    pub username: String,
    /// Token issue time in unix seconds
    pub issued_at: u64,
    /// Token expiry in unix seconds
    pub expires_at: u64,
}
