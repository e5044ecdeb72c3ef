mod config;
mod error;
mod host;
pub mod logging;
mod panel;
mod protocol;
mod settings;
mod sync;

#[cfg(test)]
mod test_helper;

pub use config::pin::{ActiveMode, ConfigId, DefaultState, PinConfiguration};
pub use config::store::ConfigurationStore;
pub use error::GpioControlError;
pub use host::board::{BoardPinMap, ORANGE_PI_ZERO2};
pub use host::driver::{Level, PinDriver, SimulatedPinDriver};
pub use host::gpio_host::GpioHost;
pub use panel::GpioControlPanel;
pub use protocol::api::{HostCommandApi, SettingsCollaborator};
pub use protocol::messages::{BoardDescriptor, CommandAck, CommandParams, HostCommand};
pub use settings::{JsonFileSettings, Settings};
pub use sync::state::{DeviceStateEntry, PinState};
pub use sync::synchronizer::{
    DeviceStateSynchronizer, RefreshOutcome, SyncOptions, SyncOptionsBuilder,
};
