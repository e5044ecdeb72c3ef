use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ICON: &str = "plug";

/// Runtime-only identity of a configuration row.
///
/// Never persisted: a fresh id is minted whenever a row is created or read
/// back from settings, so two loads of the same settings yield distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigId(Uuid);

impl ConfigId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConfigId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveMode {
    #[default]
    ActiveHigh,
    ActiveLow,
}

impl ActiveMode {
    /// Whether a pin reading `high` means the load is switched on.
    pub fn is_on(&self, high: bool) -> bool {
        match self {
            ActiveMode::ActiveHigh => high,
            ActiveMode::ActiveLow => !high,
        }
    }

    /// Electrical level that switches the load on (`on == true`) or off.
    pub fn level_for(&self, on: bool) -> bool {
        self.is_on(on)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultState {
    #[default]
    DefaultOff,
    DefaultOn,
}

impl DefaultState {
    pub fn is_on(&self) -> bool {
        matches!(self, DefaultState::DefaultOn)
    }
}

/// One user-defined row of the GPIO settings table.
///
/// Equality ignores [`ConfigId`]: two rows are equal when everything the user
/// can see and persist is equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinConfiguration {
    #[serde(skip)]
    pub id: ConfigId,
    #[serde(default)]
    pub pin: u32,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active_mode: ActiveMode,
    #[serde(default)]
    pub default_state: DefaultState,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl Default for PinConfiguration {
    fn default() -> Self {
        Self {
            id: ConfigId::new(),
            pin: 0,
            icon: default_icon(),
            name: String::new(),
            active_mode: ActiveMode::default(),
            default_state: DefaultState::default(),
        }
    }
}

impl PartialEq for PinConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.pin == other.pin
            && self.icon == other.icon
            && self.name == other.name
            && self.active_mode == other.active_mode
            && self.default_state == other.default_state
    }
}

impl Eq for PinConfiguration {}

impl PinConfiguration {
    pub fn new(pin: u32, name: impl Into<String>) -> Self {
        Self {
            pin,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_active_mode(mut self, active_mode: ActiveMode) -> Self {
        self.active_mode = active_mode;
        self
    }

    pub fn with_default_state(mut self, default_state: DefaultState) -> Self {
        self.default_state = default_state;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_settings_row() {
        let json = r#"{
            "pin": 17,
            "icon": "fas fa-fan",
            "name": "Fan",
            "active_mode": "active_low",
            "default_state": "default_on"
        }"#;
        let config = serde_json::from_str::<PinConfiguration>(json).unwrap();
        assert_eq!(config.pin, 17);
        assert_eq!(config.icon, "fas fa-fan");
        assert_eq!(config.active_mode, ActiveMode::ActiveLow);
        assert_eq!(config.default_state, DefaultState::DefaultOn);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = serde_json::from_str::<PinConfiguration>("{}").unwrap();
        assert_eq!(config, PinConfiguration::default());
        assert_eq!(config.icon, "plug");
    }

    #[test]
    fn id_is_not_persisted() {
        let config = PinConfiguration::new(27, "Light");
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["active_mode"], "active_high");
        assert_eq!(json["default_state"], "default_off");

        let back = serde_json::from_value::<PinConfiguration>(json).unwrap();
        assert_eq!(back, config);
        assert_ne!(back.id, config.id);
    }

    #[test]
    fn active_low_inverts_level() {
        assert!(ActiveMode::ActiveHigh.is_on(true));
        assert!(!ActiveMode::ActiveLow.is_on(true));
        assert!(ActiveMode::ActiveLow.level_for(false));
        assert!(!ActiveMode::ActiveLow.level_for(true));
    }
}
