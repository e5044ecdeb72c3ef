use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::pin::PinConfiguration;
use crate::error::GpioControlError;
use crate::host::board::BoardPinMap;
use crate::host::driver::{Level, PinDriver};
use crate::protocol::api::HostCommandApi;
use crate::protocol::messages::{BoardDescriptor, CommandAck, CommandParams, HostCommand};
use crate::sync::state::PinState;

/// Host side of the command API: owns the saved configuration list and
/// translates on/off into electrical levels.
pub struct GpioHost<D: PinDriver> {
    configurations: RwLock<Vec<PinConfiguration>>,
    board: BoardPinMap,
    driver: D,
    authorized: AtomicBool,
}

impl<D: PinDriver> GpioHost<D> {
    pub fn new(board: BoardPinMap, driver: D, configurations: Vec<PinConfiguration>) -> Self {
        Self {
            configurations: RwLock::new(configurations),
            board,
            driver,
            authorized: AtomicBool::new(true),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn board(&self) -> &BoardPinMap {
        &self.board
    }

    pub fn configurations(&self) -> Vec<PinConfiguration> {
        self.configurations.read().clone()
    }

    /// Commands from an unauthorized caller are refused; state reads are not.
    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::SeqCst);
    }

    /// Claims every mapped pin and drives it to its default state.
    pub fn apply_defaults(&self) -> Result<(), GpioControlError> {
        for configuration in self.configurations() {
            info!(
                "Configured GPIO {}: {:?},{:?} ({})",
                configuration.pin,
                configuration.active_mode,
                configuration.default_state,
                configuration.name
            );
            let Some(line) = self.board.gpio_line(configuration.pin) else {
                debug!("Pin {} has no GPIO line, skipping", configuration.pin);
                continue;
            };
            self.init_pin(line)?;
            let on = configuration.default_state.is_on();
            self.driver
                .write(line, configuration.active_mode.level_for(on).into())?;
        }
        Ok(())
    }

    /// Releases the pins of the current list, swaps in `configurations` and
    /// applies their defaults.
    pub fn reconfigure(
        &self,
        configurations: Vec<PinConfiguration>,
    ) -> Result<(), GpioControlError> {
        for configuration in self.configurations() {
            info!(
                "Cleaned GPIO {}: {:?},{:?} ({})",
                configuration.pin,
                configuration.active_mode,
                configuration.default_state,
                configuration.name
            );
            if let Some(line) = self.board.gpio_line(configuration.pin) {
                self.driver.cleanup(line);
            }
        }
        *self.configurations.write() = configurations;
        self.apply_defaults()
    }

    pub fn pin_state(&self, configuration: &PinConfiguration) -> PinState {
        let Some(line) = self.board.gpio_line(configuration.pin) else {
            return PinState::Unknown;
        };
        match self.driver.read(line) {
            Ok(level) => PinState::from(configuration.active_mode.is_on(level.is_high())),
            Err(e) => {
                warn!("Failed to read GPIO {}: {e}", configuration.pin);
                PinState::Unknown
            }
        }
    }

    fn init_pin(&self, line: u32) -> Result<(), GpioControlError> {
        if let Err(e) = self.driver.setup_output(line) {
            debug!("Retrying setup of line {line} after cleanup: {e}");
            self.driver.cleanup(line);
            self.driver.setup_output(line)?;
        }
        Ok(())
    }

    fn switch(&self, configuration: &PinConfiguration, on: bool) -> Result<(), GpioControlError> {
        let Some(line) = self.board.gpio_line(configuration.pin) else {
            debug!("Pin {} has no GPIO line, ignoring", configuration.pin);
            return Ok(());
        };
        let level = Level::from(configuration.active_mode.level_for(on));
        self.driver.write(line, level)?;
        info!(
            "Turned {} GPIO {}",
            if on { "on" } else { "off" },
            configuration.pin
        );
        Ok(())
    }
}

#[async_trait]
impl<D: PinDriver> HostCommandApi for GpioHost<D> {
    async fn fetch_states(&self) -> Result<Vec<PinState>, GpioControlError> {
        Ok(self
            .configurations()
            .iter()
            .map(|c| self.pin_state(c))
            .collect())
    }

    async fn send_command(
        &self,
        command: HostCommand,
        params: CommandParams,
    ) -> Result<CommandAck, GpioControlError> {
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(GpioControlError::Unauthorized);
        }
        let configuration = self
            .configurations
            .read()
            .get(params.id)
            .cloned()
            .ok_or(GpioControlError::InvalidIndex(params.id))?;

        match command {
            HostCommand::GetGpioState => Ok(CommandAck {
                state: Some(self.pin_state(&configuration)),
            }),
            HostCommand::TurnGpioOn => {
                self.switch(&configuration, true)?;
                Ok(CommandAck::default())
            }
            HostCommand::TurnGpioOff => {
                self.switch(&configuration, false)?;
                Ok(CommandAck::default())
            }
        }
    }

    async fn fetch_boards(&self) -> Result<Vec<BoardDescriptor>, GpioControlError> {
        Ok(vec![self.board.descriptor()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::pin::{ActiveMode, DefaultState};
    use crate::host::board::ORANGE_PI_ZERO2;
    use crate::host::driver::SimulatedPinDriver;

    fn host(configurations: Vec<PinConfiguration>) -> GpioHost<SimulatedPinDriver> {
        GpioHost::new(ORANGE_PI_ZERO2, SimulatedPinDriver::new(), configurations)
    }

    #[test]
    fn defaults_follow_active_mode() {
        let host = host(vec![
            PinConfiguration::new(7, "high on").with_default_state(DefaultState::DefaultOn),
            PinConfiguration::new(11, "low on")
                .with_active_mode(ActiveMode::ActiveLow)
                .with_default_state(DefaultState::DefaultOn),
            PinConfiguration::new(13, "low off").with_active_mode(ActiveMode::ActiveLow),
            PinConfiguration::new(15, "high off"),
        ]);
        host.apply_defaults().unwrap();

        let driver = host.driver();
        assert_eq!(driver.level(73), Level::High);
        assert_eq!(driver.level(70), Level::Low);
        assert_eq!(driver.level(69), Level::High);
        assert_eq!(driver.level(72), Level::Low);
    }

    #[test]
    fn apply_defaults_twice_recovers_claimed_lines() {
        let host = host(vec![PinConfiguration::new(7, "Fan")]);
        host.apply_defaults().unwrap();
        host.apply_defaults().unwrap();
        assert!(host.driver().is_output(73));
    }

    #[tokio::test]
    async fn states_report_on_off_and_unknown() {
        let host = host(vec![
            PinConfiguration::new(7, "Fan").with_default_state(DefaultState::DefaultOn),
            PinConfiguration::new(11, "Light").with_active_mode(ActiveMode::ActiveLow),
            PinConfiguration::new(0, "Unmapped"),
        ]);
        host.apply_defaults().unwrap();

        let states = host.fetch_states().await.unwrap();
        assert_eq!(states, vec![PinState::On, PinState::Off, PinState::Unknown]);
    }

    #[tokio::test]
    async fn commands_drive_active_low_pins_inverted() {
        let host = host(vec![
            PinConfiguration::new(7, "Fan"),
            PinConfiguration::new(11, "Light").with_active_mode(ActiveMode::ActiveLow),
        ]);
        host.apply_defaults().unwrap();

        host.send_command(HostCommand::TurnGpioOn, CommandParams::new(1))
            .await
            .unwrap();
        assert_eq!(host.driver().level(70), Level::Low);
        let ack = host
            .send_command(HostCommand::GetGpioState, CommandParams::new(1))
            .await
            .unwrap();
        assert_eq!(ack.state, Some(PinState::On));

        host.send_command(HostCommand::TurnGpioOff, CommandParams::new(1))
            .await
            .unwrap();
        assert_eq!(host.driver().level(70), Level::High);
    }

    #[tokio::test]
    async fn unmapped_pin_commands_are_ignored() {
        let host = host(vec![PinConfiguration::new(1, "3.3V")]);
        host.apply_defaults().unwrap();
        let ack = host
            .send_command(HostCommand::TurnGpioOn, CommandParams::new(0))
            .await
            .unwrap();
        assert_eq!(ack, CommandAck::default());
    }

    #[tokio::test]
    async fn command_errors() {
        let host = host(vec![PinConfiguration::new(7, "Fan")]);
        host.apply_defaults().unwrap();
        assert!(matches!(
            host.send_command(HostCommand::TurnGpioOn, CommandParams::new(4))
                .await,
            Err(GpioControlError::InvalidIndex(4))
        ));

        host.set_authorized(false);
        assert!(matches!(
            host.send_command(HostCommand::TurnGpioOn, CommandParams::new(0))
                .await,
            Err(GpioControlError::Unauthorized)
        ));
        assert_eq!(host.fetch_states().await.unwrap().len(), 1);
    }

    #[test]
    fn reconfigure_releases_old_pins() {
        let host = host(vec![PinConfiguration::new(7, "Fan")]);
        host.apply_defaults().unwrap();
        host.reconfigure(vec![PinConfiguration::new(26, "Light")])
            .unwrap();

        assert!(!host.driver().is_output(73));
        assert!(host.driver().is_output(74));
        assert_eq!(host.configurations().len(), 1);
    }

    #[tokio::test]
    async fn boards_come_from_pin_map() {
        let host = host(vec![]);
        let boards = host.fetch_boards().await.unwrap();
        assert_eq!(boards, vec![ORANGE_PI_ZERO2.descriptor()]);
    }
}
