//! nRF52840 bring-up platform
//!
//! Implements the bring-up collaborator traits on top of the resource
//! allocator and an in-memory device table. Claiming a resource is where
//! conflicts are caught; the actual register setup of each bus is done
//! later by its driver.

use keel_core::config::{I2cConfig, SpiConfig, SpiRole};
use keel_core::device::DeviceTable;
use keel_core::traits::{
    DeviceRegistry, DeviceSpec, HalError, PeripheralHal, RegistryError, TickSource,
};
use keel_hal::Pin;

use crate::clock::ClockConfig;
use crate::resources::{ResourceAllocator, SerialBox};

/// Bring-up platform for the nRF52840
pub struct Nrf52Platform<'a, const N: usize> {
    resources: ResourceAllocator,
    devices: &'a mut DeviceTable<N>,
    /// Timer backing the tick source, if any
    tick_timer: Option<u8>,
    tick_freq: Option<u32>,
    clocks: ClockConfig,
    clock_started: bool,
}

impl<'a, const N: usize> Nrf52Platform<'a, N> {
    /// Create a platform registering devices into `devices`
    ///
    /// `tick_timer` is the hardware timer cputime runs on.
    pub fn new(devices: &'a mut DeviceTable<N>, tick_timer: Option<u8>) -> Self {
        Self {
            resources: ResourceAllocator::new(),
            devices,
            tick_timer,
            tick_freq: None,
            clocks: ClockConfig::NRF52840PDK,
            clock_started: false,
        }
    }

    /// Use `clocks` instead of the PDK crystals
    pub fn with_clocks(mut self, clocks: ClockConfig) -> Self {
        self.clocks = clocks;
        self
    }

    pub fn resources(&self) -> &ResourceAllocator {
        &self.resources
    }

    /// Tick source frequency, once started
    pub fn tick_freq(&self) -> Option<u32> {
        self.tick_freq
    }

    /// Clock sources running, once the clock step ran
    pub fn clocks(&self) -> Option<ClockConfig> {
        self.clock_started.then_some(self.clocks)
    }

    /// Claim serial box 0 and the SPI pins for the polled SPI master
    ///
    /// Fails if bring-up already put TWI0 or SPI0 on that box.
    pub fn claim_polled_spi(&mut self, config: &SpiConfig) -> Result<(), HalError> {
        self.claim_bus(SerialBox::Serial0, &spi_pins(config))
    }

    fn claim_bus(&mut self, serial: SerialBox, pins: &[Option<Pin>; 4]) -> Result<(), HalError> {
        let numbers = pin_numbers(pins);
        self.resources.allocate_serial(serial)?;
        if let Err(e) = self.resources.allocate_pins(&numbers) {
            self.resources.release_serial(serial);
            return Err(e);
        }
        Ok(())
    }
}

fn pin_numbers(pins: &[Option<Pin>; 4]) -> heapless::Vec<u8, 4> {
    pins.iter().flatten().map(|pin| pin.number()).collect()
}

fn spi_pins(config: &SpiConfig) -> [Option<Pin>; 4] {
    [
        Some(config.sck),
        Some(config.mosi),
        Some(config.miso),
        config.ss,
    ]
}

impl<const N: usize> PeripheralHal for Nrf52Platform<'_, N> {
    fn clock_start(&mut self) {
        // The runtime's chip init already started `self.clocks`; the
        // firmware passes the same config to both.
        self.clock_started = true;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "clocks running: HFCLK {} LFCLK {}",
            self.clocks.hfclk,
            self.clocks.lfclk
        );
    }

    fn timer_init(&mut self, index: u8) -> Result<(), HalError> {
        self.resources.allocate_timer(index)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("TIMER{} claimed", index);

        Ok(())
    }

    fn i2c_init(&mut self, index: u8, config: &I2cConfig) -> Result<(), HalError> {
        let serial = SerialBox::for_twi(index).ok_or(HalError::InvalidInstance)?;
        self.claim_bus(serial, &[Some(config.scl), Some(config.sda), None, None])?;

        #[cfg(feature = "defmt")]
        defmt::debug!("TWI{} claimed at {} Hz", index, config.frequency.hz());

        Ok(())
    }

    fn spi_init(
        &mut self,
        index: u8,
        config: &SpiConfig,
        role: SpiRole,
    ) -> Result<(), HalError> {
        let serial = SerialBox::for_spi(index).ok_or(HalError::InvalidInstance)?;
        self.claim_bus(serial, &spi_pins(config))?;

        #[cfg(feature = "defmt")]
        defmt::debug!("SPI{} claimed as {}", index, role);
        #[cfg(not(feature = "defmt"))]
        let _ = role;

        Ok(())
    }
}

impl<const N: usize> TickSource for Nrf52Platform<'_, N> {
    fn init_tick_source(&mut self, freq_hz: u32) -> Result<(), HalError> {
        let timer = self.tick_timer.ok_or(HalError::InvalidInstance)?;
        if !self.resources.is_timer_allocated(timer) {
            return Err(HalError::TimerUnclaimed);
        }
        self.tick_freq = Some(freq_hz);

        #[cfg(feature = "defmt")]
        defmt::debug!("cputime on TIMER{} at {} Hz", timer, freq_hz);

        Ok(())
    }
}

impl<const N: usize> DeviceRegistry for Nrf52Platform<'_, N> {
    fn create_device(&mut self, spec: DeviceSpec) -> Result<(), RegistryError> {
        let numbers = pin_numbers(&spec.config.pins());
        self.resources
            .allocate_pins(&numbers)
            .map_err(|_| RegistryError::PinConflict)?;

        // A device the table turns away must not keep its pins
        if let Err(e) = self.devices.create_device(spec) {
            self.resources.release_pins(&numbers);
            return Err(e);
        }
        Ok(())
    }
}
