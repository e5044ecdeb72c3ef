//! Reference host answering the command API over a pin driver.

pub(crate) mod board;
pub(crate) mod driver;
pub(crate) mod gpio_host;
