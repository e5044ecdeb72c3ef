use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use gpio_control_rs::{
    GpioControlPanel, GpioHost, JsonFileSettings, ORANGE_PI_ZERO2, SettingsCollaborator,
    SimulatedPinDriver, SyncOptions,
};

use crate::Params;

pub struct Session {
    pub panel: GpioControlPanel,
    pub host: Arc<GpioHost<SimulatedPinDriver>>,
    pub settings: Arc<JsonFileSettings>,
}

/// Loads the settings file, brings up a simulated host with the saved
/// defaults applied and binds a panel to it.
pub async fn create_session(params: &Params) -> Result<Session> {
    let settings = Arc::new(JsonFileSettings::new(params.settings.clone()));
    let saved = settings
        .load()
        .await
        .with_context(|| format!("reading {}", params.settings.display()))?;

    let host = Arc::new(GpioHost::new(
        ORANGE_PI_ZERO2,
        SimulatedPinDriver::new(),
        saved,
    ));
    host.apply_defaults()?;

    let timeout = Duration::from_millis(params.timeout_ms);
    let options = SyncOptions::builder()
        .fetch_timeout(timeout)
        .command_timeout(timeout)
        .build()?;
    let panel = GpioControlPanel::new(settings.clone(), host.clone(), options);
    panel.on_before_binding().await;

    Ok(Session {
        panel,
        host,
        settings,
    })
}

impl Session {
    /// Saves the edited list and reconfigures the host with it.
    pub async fn commit(&self) -> Result<()> {
        self.panel.on_settings_before_save().await?;
        self.host.reconfigure(self.settings.load().await?)?;
        self.panel.on_settings_hidden().await;
        Ok(())
    }

    pub fn print_buttons(&self) {
        let buttons = self.panel.buttons();
        if buttons.is_empty() {
            println!("No GPIO configured");
        }
        let configurations = self.panel.configurations();
        for (i, button) in buttons.iter().enumerate() {
            let pin = configurations
                .get(i)
                .map(|c| c.pin.to_string())
                .unwrap_or_default();
            println!(
                "{i} - [{}] {} (pin {pin}): {}",
                button.icon, button.name, button.current_state
            );
        }
    }
}
