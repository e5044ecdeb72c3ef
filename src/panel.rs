//! Host adapter wiring the configuration store and the synchronizer to the
//! lifecycle events of a settings UI.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::pin::{ConfigId, PinConfiguration};
use crate::config::store::ConfigurationStore;
use crate::error::GpioControlError;
use crate::protocol::api::{HostCommandApi, SettingsCollaborator};
use crate::protocol::messages::BoardDescriptor;
use crate::sync::state::DeviceStateEntry;
use crate::sync::synchronizer::{DeviceStateSynchronizer, RefreshOutcome, SyncOptions};

#[derive(Clone)]
pub struct GpioControlPanel {
    settings: Arc<dyn SettingsCollaborator>,
    sync: DeviceStateSynchronizer,
}

impl GpioControlPanel {
    pub fn new(
        settings: Arc<dyn SettingsCollaborator>,
        host: Arc<dyn HostCommandApi>,
        options: SyncOptions,
    ) -> Self {
        Self {
            settings,
            sync: DeviceStateSynchronizer::new(ConfigurationStore::new(), host, options),
        }
    }

    pub fn store(&self) -> &ConfigurationStore {
        self.sync.store()
    }

    pub fn synchronizer(&self) -> &DeviceStateSynchronizer {
        &self.sync
    }

    /// First binding of the panel: load settings, show buttons, list boards.
    pub async fn on_before_binding(&self) {
        self.reload().await;
        futures::join!(self.sync.refresh(), self.sync.fetch_boards());
    }

    /// Start of an edit session: discard unsaved edits.
    pub async fn on_settings_shown(&self) {
        self.reload().await;
    }

    /// End of an edit session: back to the saved list, buttons refreshed.
    pub async fn on_settings_hidden(&self) {
        self.reload().await;
        self.sync.refresh().await;
    }

    pub async fn on_settings_before_save(&self) -> Result<(), GpioControlError> {
        let configurations = self.store().snapshot();
        info!("Saving {} GPIO configurations", configurations.len());
        self.settings.save(configurations).await
    }

    pub fn add_configuration(&self) -> ConfigId {
        self.store().add()
    }

    pub fn remove_configuration(&self, id: ConfigId) -> bool {
        self.store().remove(id)
    }

    pub fn configurations(&self) -> Vec<PinConfiguration> {
        self.store().snapshot()
    }

    pub fn buttons(&self) -> Vec<DeviceStateEntry> {
        self.sync.view()
    }

    pub fn boards(&self) -> Vec<BoardDescriptor> {
        self.sync.boards()
    }

    pub async fn turn_on(&self, index: usize) -> Option<RefreshOutcome> {
        self.sync.turn_on(index).await
    }

    pub async fn turn_off(&self, index: usize) -> Option<RefreshOutcome> {
        self.sync.turn_off(index).await
    }

    async fn reload(&self) {
        match self.settings.load().await {
            Ok(configurations) => self.store().load(configurations),
            Err(e) => error!("Failed to load GPIO settings, keeping current list: {e}"),
        }
    }
}
