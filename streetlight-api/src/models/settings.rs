use alloc::string::String;

use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSettingsResponse {
    /// Seconds between refresh cycles
    pub interval: u64,
    /// Smallest accepted interval in seconds
    pub min_interval: u64,
    /// Largest accepted interval in seconds
    pub max_interval: u64,
    /// Seconds a fetched collection is reused
    pub cache_ttl: u64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRefreshSettingsRequest {
    /// New seconds between refresh cycles
    pub interval: u64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionResponse {
    /// Realtime database answered the probe
    pub connected: bool,
    /// Probed database endpoint
    pub endpoint: String,
    /// Probe outcome
    pub message: String,
}
