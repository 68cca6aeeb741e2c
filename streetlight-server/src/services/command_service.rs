use std::sync::Arc;

use serde_json::{Map, Value};
use streetlight_api::models::{LightMode, LightStatus};

use crate::errors::StoreError;
use crate::repositories::StreetlightRepository;
use crate::services::RefreshService;

/// Turns operator actions into partial updates of a single device.
///
/// Writes never touch the published snapshot. A successful write is
/// followed by a forced refresh so the view reflects what the store holds.
pub struct CommandService {
    repository: Arc<StreetlightRepository>,
    refresh_service: Arc<RefreshService>,
}

impl CommandService {
    pub fn new(repository: Arc<StreetlightRepository>, refresh_service: Arc<RefreshService>) -> Self {
        Self {
            repository,
            refresh_service,
        }
    }

    pub async fn set_mode(&self, id: &str, mode: LightMode) -> Result<(), StoreError> {
        let mut fields = Map::new();
        fields.insert("mode".to_string(), Value::from(mode.to_string()));

        self.dispatch(id, fields).await?;
        tracing::info!("streetlight {} switched to {} mode", id, mode);

        Ok(())
    }

    /// Writes the override flag and the status it implies in one update.
    pub async fn set_manual_state(&self, id: &str, on: bool) -> Result<(), StoreError> {
        let status = LightStatus::from(on);

        let mut fields = Map::new();
        fields.insert("manualState".to_string(), Value::Bool(on));
        fields.insert("status".to_string(), Value::from(status.to_string()));

        self.dispatch(id, fields).await?;
        tracing::info!("streetlight {} manually turned {}", id, status);

        Ok(())
    }

    async fn dispatch(&self, id: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        // The hosted database creates missing paths on update.
        if !self.repository.exists(id).await? {
            return Err(StoreError::NotFound(id.to_string()));
        }

        self.repository.update(id, fields).await?;

        if let Err(e) = self.refresh_service.force_refresh().await {
            tracing::warn!("refresh after command on {} failed: {}", id, e);
        }

        Ok(())
    }
}
