use alloc::string::String;

use serde::{Deserialize, Serialize};

use super::LightMode;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetModeRequest {
    /// Target control mode
    pub mode: LightMode,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetManualStateRequest {
    /// Force the lamp on (`true`) or off (`false`)
    pub on: bool,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Operation result message
    pub message: String,
}
