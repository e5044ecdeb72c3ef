use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sync::state::PinState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HostCommand {
    TurnGpioOn,
    TurnGpioOff,
    GetGpioState,
}

impl HostCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostCommand::TurnGpioOn => "turnGpioOn",
            HostCommand::TurnGpioOff => "turnGpioOff",
            HostCommand::GetGpioState => "getGpioState",
        }
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a host command. `id` is the position of the configuration
/// in the list, not its pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandParams {
    pub id: usize,
}

impl CommandParams {
    pub fn new(id: usize) -> Self {
        Self { id }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    /// Only filled in by `getGpioState`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<PinState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pins: Vec<u32>,
}
