use crate::protocol::messages::BoardDescriptor;

/// Physical header pin to GPIO line numbering of one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPinMap {
    pub id: &'static str,
    pub name: &'static str,
    lines: &'static [(u32, u32)],
}

pub const ORANGE_PI_ZERO2: BoardPinMap = BoardPinMap {
    id: "orangepi_zero2",
    name: "Orange Pi Zero 2",
    lines: &[
        (3, 229),  // PH5/I2C3_SDA
        (5, 228),  // PH4/I2C3_SCK
        (7, 73),   // PC9
        (8, 226),  // PH2/UART5_TX
        (10, 227), // PH3/UART5_RX
        (11, 70),  // PC6
        (12, 75),  // PC11
        (13, 69),  // PC5
        (15, 72),  // PC8
        (16, 79),  // PC15
        (18, 78),  // PC14
        (19, 231), // PH7/SPI1_MOSI
        (21, 232), // PH8/SPI1_MISO
        (22, 71),  // PC7
        (23, 230), // PH6/SPI1_CLK
        (24, 233), // PH9/SPI1_CS
        (26, 74),  // PC10
    ],
};

impl Default for BoardPinMap {
    fn default() -> Self {
        ORANGE_PI_ZERO2
    }
}

impl BoardPinMap {
    /// GPIO line behind a physical pin, `None` for power, ground and
    /// anything not on the header.
    pub fn gpio_line(&self, pin: u32) -> Option<u32> {
        self.lines
            .iter()
            .find(|(physical, _)| *physical == pin)
            .map(|(_, line)| *line)
    }

    pub fn physical_pins(&self) -> Vec<u32> {
        self.lines.iter().map(|(physical, _)| *physical).collect()
    }

    pub fn descriptor(&self) -> BoardDescriptor {
        BoardDescriptor {
            id: self.id.to_string(),
            name: self.name.to_string(),
            pins: self.physical_pins(),
        }
    }
}
