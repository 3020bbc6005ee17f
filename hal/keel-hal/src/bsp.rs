//! Board support hooks
//!
//! The small set of board queries the rest of the system (fault handler,
//! interrupt setup, power management) needs at runtime.

use crate::flash::FlashMap;

/// A span of memory captured in a crash dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemDumpRegion {
    /// First address of the region
    pub start: usize,
    /// Length in bytes
    pub size: usize,
}

impl MemDumpRegion {
    /// Create a region
    pub const fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    /// One past the last address
    pub const fn end(&self) -> usize {
        self.start + self.size
    }
}

/// Requested system power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Fully running
    #[default]
    On,
    /// CPU halted, peripherals running
    Sleep,
    /// Most peripherals stopped, RAM retained
    DeepSleep,
    /// System off, wake by reset only
    Off,
}

/// Board support package
///
/// Implemented once per board.
pub trait Bsp: FlashMap {
    /// Memory regions to capture on a fault
    fn core_dump(&self) -> &'static [MemDumpRegion];

    /// Effective NVIC priority for an interrupt
    ///
    /// Returns `requested` unless the board pins that interrupt.
    fn nvic_priority(&self, irq: i16, requested: u32) -> u32;

    /// Enter a power state
    ///
    /// Boards without power management accept every state as a no-op.
    fn power_state(&mut self, state: PowerState) -> Result<(), PowerState> {
        let _ = state;
        Ok(())
    }
}
