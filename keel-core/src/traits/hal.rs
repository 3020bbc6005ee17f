//! Peripheral HAL and tick source traits
//!
//! The parts of bring-up that claim hardware directly instead of going
//! through the device registry.

use crate::config::{I2cConfig, SpiConfig, SpiRole};

/// Errors reported by the chip HAL during bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// The peripheral instance (or one sharing its resources) is already claimed
    ResourceConflict,
    /// No such peripheral instance on this chip
    InvalidInstance,
    /// The tick source's backing timer was never claimed
    TimerUnclaimed,
}

/// Chip-level peripheral initialization
pub trait PeripheralHal {
    /// Make sure the system clocks are running
    fn clock_start(&mut self);

    /// Claim and initialize a hardware timer
    fn timer_init(&mut self, index: u8) -> Result<(), HalError>;

    /// Claim and initialize a TWI master
    fn i2c_init(&mut self, index: u8, config: &I2cConfig) -> Result<(), HalError>;

    /// Claim and initialize an SPI instance in the given role
    fn spi_init(&mut self, index: u8, config: &SpiConfig, role: SpiRole)
        -> Result<(), HalError>;
}

/// Hardware tick source (cputime)
pub trait TickSource {
    /// Start the tick source at `freq_hz`
    ///
    /// Called once, after every hardware timer has been claimed.
    fn init_tick_source(&mut self, freq_hz: u32) -> Result<(), HalError>;
}
