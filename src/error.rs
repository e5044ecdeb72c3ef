use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpioControlError {
    #[error("Host request failed: {0}")]
    Transport(String),
    #[error("Host request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Host returned {actual} states for {expected} configurations")]
    DataShapeMismatch { expected: usize, actual: usize },
    #[error("No configuration at index {0}")]
    InvalidIndex(usize),
    #[error("Unknown configuration")]
    UnknownConfig,
    #[error("Insufficient rights")]
    Unauthorized,
    #[error("Pin driver failed: {0}")]
    Driver(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
