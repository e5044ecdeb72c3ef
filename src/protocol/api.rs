//! Contracts the core consumes but does not implement.

use async_trait::async_trait;

use crate::config::pin::PinConfiguration;
use crate::error::GpioControlError;
use crate::protocol::messages::{BoardDescriptor, CommandAck, CommandParams, HostCommand};
use crate::sync::state::PinState;

/// Command transport offered by the host application.
#[async_trait]
pub trait HostCommandApi: Send + Sync {
    /// Current state of every configured pin, in configuration order.
    async fn fetch_states(&self) -> Result<Vec<PinState>, GpioControlError>;

    async fn send_command(
        &self,
        command: HostCommand,
        params: CommandParams,
    ) -> Result<CommandAck, GpioControlError>;

    /// Boards the host can drive. Hosts without board selection return none.
    async fn fetch_boards(&self) -> Result<Vec<BoardDescriptor>, GpioControlError> {
        Ok(vec![])
    }
}

/// Persisted settings owned by the host.
#[async_trait]
pub trait SettingsCollaborator: Send + Sync {
    async fn load(&self) -> Result<Vec<PinConfiguration>, GpioControlError>;

    async fn save(&self, configurations: Vec<PinConfiguration>) -> Result<(), GpioControlError>;
}
