//! nRF52840-specific HAL for Keel board support
//!
//! This crate provides the nRF52840 implementations of the shared
//! `keel-hal` and `keel-core` traits, plus chip-specific functionality:
//!
//! - Boot clock sources
//! - Interrupt numbers and the NVIC priority policy
//! - Memory map and crash-dump regions
//! - Internal flash descriptor
//! - Resource tracking for timers, shared serial boxes and pins
//! - The bring-up platform (implements `keel_core::traits::Platform`)
//! - Register-level SPI0 access for the polled SPI master

#![no_std]

pub mod clock;
pub mod flash;
pub mod irq;
pub mod memory;
pub mod platform;
pub mod resources;
pub mod spi;

pub use clock::ClockConfig;
pub use platform::Nrf52Platform;
pub use spi::{PolledSpi0, Spi0, SpiFrequency};

use keel_hal::{Bsp, FlashDescriptor, FlashMap, MemDumpRegion, PowerState};

/// nRF52840 preview development kit (PCA10056)
#[derive(Debug, Default)]
pub struct Nrf52840Pdk {
    power: PowerState,
}

impl Nrf52840Pdk {
    pub const fn new() -> Self {
        Self {
            power: PowerState::On,
        }
    }

    /// Last power state requested
    pub fn power(&self) -> PowerState {
        self.power
    }
}

impl FlashMap for Nrf52840Pdk {
    fn flash_dev(&self, id: u8) -> Option<&'static FlashDescriptor> {
        flash::flash_dev(id)
    }
}

impl Bsp for Nrf52840Pdk {
    fn core_dump(&self) -> &'static [MemDumpRegion] {
        memory::core_dump_regions()
    }

    fn nvic_priority(&self, irq: i16, requested: u32) -> u32 {
        irq::resolve_priority(irq, requested)
    }

    fn power_state(&mut self, state: PowerState) -> Result<(), PowerState> {
        // No low-power modes are wired up on this board; the request is
        // accepted and recorded only.
        self.power = state;
        Ok(())
    }
}
