//! Peripheral resource tracking
//!
//! Tracks which hardware instances have been claimed during bring-up so
//! that two drivers never end up on the same block. On the nRF52840 the
//! serial boxes are shared: SPI0/SPIM0/SPIS0/TWI0 are one instance, as are
//! SPI1/SPIM1/SPIS1/TWI1.

use heapless::FnvIndexSet;
use keel_core::config::{GPIO_COUNT, TIMER_COUNT};
use keel_core::traits::HalError;

/// Number of serial boxes usable for SPI or TWI
pub const SERIAL_COUNT: u8 = 3;

/// Serial box a bus instance lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialBox {
    /// SPI0 / TWI0
    Serial0,
    /// SPI1 / TWI1
    Serial1,
    /// SPI2 (no TWI on this box)
    Serial2,
}

impl SerialBox {
    /// Serial box for SPI instance `index`
    pub fn for_spi(index: u8) -> Option<Self> {
        match index {
            0 => Some(SerialBox::Serial0),
            1 => Some(SerialBox::Serial1),
            2 => Some(SerialBox::Serial2),
            _ => None,
        }
    }

    /// Serial box for TWI instance `index`
    pub fn for_twi(index: u8) -> Option<Self> {
        match index {
            0 => Some(SerialBox::Serial0),
            1 => Some(SerialBox::Serial1),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Claimed timers, serial boxes and pins
pub struct ResourceAllocator {
    timers: [bool; TIMER_COUNT],
    serial: [bool; SERIAL_COUNT as usize],
    pins: FnvIndexSet<u8, 64>,
}

impl Default for ResourceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceAllocator {
    /// Create an allocator with nothing claimed
    pub fn new() -> Self {
        Self {
            timers: [false; TIMER_COUNT],
            serial: [false; SERIAL_COUNT as usize],
            pins: FnvIndexSet::new(),
        }
    }

    /// Claim hardware timer `index`
    pub fn allocate_timer(&mut self, index: u8) -> Result<(), HalError> {
        let slot = self
            .timers
            .get_mut(index as usize)
            .ok_or(HalError::InvalidInstance)?;
        if *slot {
            return Err(HalError::ResourceConflict);
        }
        *slot = true;
        Ok(())
    }

    /// Check if timer `index` is claimed
    pub fn is_timer_allocated(&self, index: u8) -> bool {
        self.timers.get(index as usize).copied().unwrap_or(false)
    }

    /// Claim a serial box
    pub fn allocate_serial(&mut self, serial: SerialBox) -> Result<(), HalError> {
        let slot = &mut self.serial[serial.slot()];
        if *slot {
            return Err(HalError::ResourceConflict);
        }
        *slot = true;
        Ok(())
    }

    /// Release a serial box
    pub fn release_serial(&mut self, serial: SerialBox) {
        self.serial[serial.slot()] = false;
    }

    /// Check if a serial box is claimed
    pub fn is_serial_allocated(&self, serial: SerialBox) -> bool {
        self.serial[serial.slot()]
    }

    /// Claim a set of pins, all or nothing
    pub fn allocate_pins(&mut self, pins: &[u8]) -> Result<(), HalError> {
        for (i, &pin) in pins.iter().enumerate() {
            if pin >= GPIO_COUNT {
                return Err(HalError::InvalidInstance);
            }
            if self.pins.contains(&pin) || pins[..i].contains(&pin) {
                return Err(HalError::ResourceConflict);
            }
        }
        for &pin in pins {
            self.pins
                .insert(pin)
                .map_err(|_| HalError::ResourceConflict)?;
        }
        Ok(())
    }

    /// Release a set of pins
    pub fn release_pins(&mut self, pins: &[u8]) {
        for pin in pins {
            self.pins.remove(pin);
        }
    }

    /// Check if a pin is claimed
    pub fn is_pin_allocated(&self, pin: u8) -> bool {
        self.pins.contains(&pin)
    }

    /// Get the number of claimed pins
    pub fn allocated_pin_count(&self) -> usize {
        self.pins.len()
    }
}
