use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::pin::PinConfiguration;
use crate::error::GpioControlError;
use crate::protocol::api::SettingsCollaborator;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub gpio_configurations: Vec<PinConfiguration>,
}

/// Settings kept in a JSON file. A missing file reads as default settings.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn read(&self) -> Result<Settings, GpioControlError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Settings file {} not found, using default settings",
                    self.path.display()
                );
                Ok(Settings::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn write(&self, settings: &Settings) -> Result<(), GpioControlError> {
        let json = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Settings written to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl SettingsCollaborator for JsonFileSettings {
    async fn load(&self) -> Result<Vec<PinConfiguration>, GpioControlError> {
        Ok(self.read().await?.gpio_configurations)
    }

    async fn save(&self, configurations: Vec<PinConfiguration>) -> Result<(), GpioControlError> {
        let mut settings = self.read().await?;
        settings.gpio_configurations = configurations;
        self.write(&settings).await
    }
}
