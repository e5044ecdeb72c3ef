use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::pin::{ConfigId, PinConfiguration};

/// Live state of a configured pin as reported by the host.
///
/// On the wire the host answers `"on"` or `"off"`; anything else (an unmapped
/// pin answers `""`) reads as unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PinState {
    #[default]
    Unknown,
    On,
    Off,
}

impl From<&str> for PinState {
    fn from(value: &str) -> Self {
        match value {
            "on" => Self::On,
            "off" => Self::Off,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for PinState {
    fn from(value: String) -> Self {
        PinState::from(value.as_str())
    }
}

impl From<bool> for PinState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl From<PinState> for &str {
    fn from(value: PinState) -> Self {
        match value {
            PinState::Unknown => "",
            PinState::On => "on",
            PinState::Off => "off",
        }
    }
}

impl From<PinState> for String {
    fn from(value: PinState) -> Self {
        <&str>::from(value).to_string()
    }
}

impl fmt::Display for PinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinState::Unknown => f.write_str("unknown"),
            PinState::On => f.write_str("on"),
            PinState::Off => f.write_str("off"),
        }
    }
}

/// One button of the control panel, derived from a [`PinConfiguration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStateEntry {
    pub id: ConfigId,
    pub icon: String,
    pub name: String,
    pub current_state: PinState,
}

impl From<&PinConfiguration> for DeviceStateEntry {
    fn from(configuration: &PinConfiguration) -> Self {
        Self {
            id: configuration.id,
            icon: configuration.icon.clone(),
            name: configuration.name.clone(),
            current_state: PinState::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_host_states() {
        let states = serde_json::from_str::<Vec<PinState>>(r#"["on","off","","bogus"]"#).unwrap();
        assert_eq!(
            states,
            vec![PinState::On, PinState::Off, PinState::Unknown, PinState::Unknown]
        );
    }

    #[test]
    fn unknown_serializes_as_empty_string() {
        let json = serde_json::to_string(&vec![PinState::On, PinState::Unknown]).unwrap();
        assert_eq!(json, r#"["on",""]"#);
    }

    #[test]
    fn entry_starts_unknown() {
        let configuration = PinConfiguration::new(17, "Fan").with_icon("fan");
        let entry = DeviceStateEntry::from(&configuration);
        assert_eq!(entry.id, configuration.id);
        assert_eq!(entry.icon, "fan");
        assert_eq!(entry.name, "Fan");
        assert_eq!(entry.current_state, PinState::Unknown);
    }
}
