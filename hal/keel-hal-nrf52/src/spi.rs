//! SPI0 register block for polled transfers
//!
//! Direct access to the legacy (non-EasyDMA) SPI master on the shared
//! serial box 0. Only the registers the polled primitive needs, plus the
//! minimal setup to enable the block, are exposed.
//!
//! Reference: nRF52840 Product Specification, SPI (deprecated) chapter.

use core::ptr::{read_volatile, write_volatile};

use keel_core::config::SpiConfig;
use keel_hal::{PolledSpi, SpiRegisters};

/// SPI0 register offsets
const EVENTS_READY: usize = 0x108;
const ENABLE: usize = 0x500;
const PSEL_SCK: usize = 0x508;
const PSEL_MOSI: usize = 0x50C;
const PSEL_MISO: usize = 0x510;
const RXD: usize = 0x518;
const TXD: usize = 0x51C;
const FREQUENCY: usize = 0x524;
const CONFIG: usize = 0x554;

/// ENABLE value selecting the legacy SPI master
const ENABLE_SPI: u32 = 1;

/// PSEL value for a disconnected pin
const PSEL_DISCONNECTED: u32 = 1 << 31;

/// SPI clock frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum SpiFrequency {
    K125 = 0x0200_0000,
    K250 = 0x0400_0000,
    K500 = 0x0800_0000,
    M1 = 0x1000_0000,
    M2 = 0x2000_0000,
    M4 = 0x4000_0000,
    M8 = 0x8000_0000,
}

/// SPI0 register block
pub struct Spi0 {
    base: usize,
}

/// Polled SPI master on SPI0
pub type PolledSpi0 = PolledSpi<Spi0>;

impl Spi0 {
    /// Base address of serial box 0
    pub const BASE: usize = 0x4000_3000;

    /// Take SPI0
    ///
    /// # Safety
    ///
    /// The caller must own serial box 0 exclusively for the lifetime of
    /// the returned value: TWI0/SPIM0/SPIS0 must not be enabled and the
    /// interrupt-driven SPI driver must not touch the instance.
    pub unsafe fn steal() -> Self {
        Self::at(Self::BASE)
    }

    /// Register block at an arbitrary base address
    ///
    /// # Safety
    ///
    /// `base` must point to a readable and writable SPI register block
    /// (or memory laid out like one) that nothing else accesses.
    pub unsafe fn at(base: usize) -> Self {
        Self { base }
    }

    /// Route pins, set mode 0 MSB-first at `frequency` and enable the block
    ///
    /// Slave select is not routed; it stays a GPIO owned by the caller.
    pub fn configure(&mut self, config: &SpiConfig, frequency: SpiFrequency) {
        self.write_reg(ENABLE, 0);
        self.write_reg(PSEL_SCK, config.sck.number() as u32);
        self.write_reg(PSEL_MOSI, config.mosi.number() as u32);
        self.write_reg(PSEL_MISO, config.miso.number() as u32);
        self.write_reg(FREQUENCY, frequency as u32);
        self.write_reg(CONFIG, 0);
        self.write_reg(ENABLE, ENABLE_SPI);
    }

    /// Disable the block and release its pins
    pub fn disable(&mut self) {
        self.write_reg(ENABLE, 0);
        self.write_reg(PSEL_SCK, PSEL_DISCONNECTED);
        self.write_reg(PSEL_MOSI, PSEL_DISCONNECTED);
        self.write_reg(PSEL_MISO, PSEL_DISCONNECTED);
    }

    /// Wrap into a polled master
    pub fn into_polled(self) -> PolledSpi0 {
        PolledSpi::new(self)
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        // SAFETY: exclusive access to a valid block was promised in `at`
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&mut self, offset: usize, value: u32) {
        // SAFETY: as above
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}

impl SpiRegisters for Spi0 {
    fn write_txd(&mut self, byte: u8) {
        self.write_reg(TXD, byte as u32);
    }

    fn read_rxd(&mut self) -> u8 {
        self.read_reg(RXD) as u8
    }

    fn event_ready(&mut self) -> bool {
        self.read_reg(EVENTS_READY) != 0
    }

    fn clear_event_ready(&mut self) {
        self.write_reg(EVENTS_READY, 0);
    }
}
