use dashmap::{DashMap, DashSet};
use tracing::debug;

use crate::error::GpioControlError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    pub fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

/// Output-capable GPIO lines, addressed by line number.
pub trait PinDriver: Send + Sync {
    /// Claims `line` as an output. Fails if the line is already claimed.
    fn setup_output(&self, line: u32) -> Result<(), GpioControlError>;

    /// Releases `line`. Releasing an unclaimed line is a no-op.
    fn cleanup(&self, line: u32);

    fn write(&self, line: u32, level: Level) -> Result<(), GpioControlError>;

    fn read(&self, line: u32) -> Result<Level, GpioControlError>;
}

/// In-memory lines. Levels survive cleanup, like a floating pin keeping its
/// last value.
#[derive(Debug, Default)]
pub struct SimulatedPinDriver {
    outputs: DashSet<u32>,
    levels: DashMap<u32, Level>,
}

impl SimulatedPinDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_output(&self, line: u32) -> bool {
        self.outputs.contains(&line)
    }

    pub fn level(&self, line: u32) -> Level {
        self.levels.get(&line).map(|l| *l).unwrap_or_default()
    }
}

impl PinDriver for SimulatedPinDriver {
    fn setup_output(&self, line: u32) -> Result<(), GpioControlError> {
        if !self.outputs.insert(line) {
            return Err(GpioControlError::Driver(format!(
                "line {line} is already in use"
            )));
        }
        debug!("Line {line} set up as output");
        Ok(())
    }

    fn cleanup(&self, line: u32) {
        if self.outputs.remove(&line).is_some() {
            debug!("Line {line} released");
        }
    }

    fn write(&self, line: u32, level: Level) -> Result<(), GpioControlError> {
        if !self.is_output(line) {
            return Err(GpioControlError::Driver(format!(
                "line {line} is not set up as output"
            )));
        }
        self.levels.insert(line, level);
        Ok(())
    }

    fn read(&self, line: u32) -> Result<Level, GpioControlError> {
        Ok(self.level(line))
    }
}
