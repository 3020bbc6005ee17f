//! Driver init routines for registered devices
//!
//! Bring-up only creates device entries; this is where each entry is
//! bound to its driver once the matching init tier runs.

use defmt::*;
use embassy_nrf::config::{Config, HfclkSource, LfclkSource};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use keel_core::config::PeripheralConfig;
use keel_core::device::{Device, DriverError, DriverInit};
use keel_core::traits::DriverKind;
use keel_hal::Bsp;
use keel_hal_nrf52::clock::{self, ClockConfig};
use keel_hal_nrf52::irq::{LOWEST_PRIORITY, NVIC_PRIO_BITS};

/// Chip init config starting the board's clock sources
pub fn chip_config(clocks: &ClockConfig) -> Config {
    let mut config = Config::default();
    config.hfclk_source = match clocks.hfclk {
        clock::HfclkSource::Internal => HfclkSource::Internal,
        clock::HfclkSource::ExternalXtal => HfclkSource::ExternalXtal,
    };
    config.lfclk_source = match clocks.lfclk {
        clock::LfclkSource::InternalRc => LfclkSource::InternalRC,
        clock::LfclkSource::Synthesized => LfclkSource::Synthesized,
        clock::LfclkSource::ExternalXtal => LfclkSource::ExternalXtal,
    };
    config
}

/// Convert a logical priority (0 = most urgent) to the NVIC encoding
pub fn nvic_priority(priority: u32) -> Priority {
    let level = priority.min(LOWEST_PRIORITY);
    Priority::from((level << (8 - NVIC_PRIO_BITS)) as u8)
}

/// Driver init routines of this board
pub struct BoardDrivers<'a, B: Bsp> {
    board: &'a B,
}

impl<'a, B: Bsp> BoardDrivers<'a, B> {
    pub fn new(board: &'a B) -> Self {
        Self { board }
    }
}

impl<B: Bsp> DriverInit for BoardDrivers<'_, B> {
    fn init(&mut self, device: &Device) -> Result<(), DriverError> {
        match (device.driver(), device.config()) {
            (DriverKind::Saadc, PeripheralConfig::Adc(adc)) => {
                let prio = self.board.nvic_priority(
                    keel_hal_nrf52::irq::irqn::SAADC,
                    adc.interrupt_priority as u32,
                );
                interrupt::SAADC.set_priority(nvic_priority(prio));
                info!(
                    "{}: SAADC {} bits, {}x oversample, irq prio {}",
                    device.name(),
                    adc.resolution.bits(),
                    adc.oversample.samples(),
                    prio
                );
            }
            (DriverKind::Pwm, PeripheralConfig::Pwm(pwm)) => {
                info!("{}: PWM{}", device.name(), pwm.index);
            }
            (DriverKind::SoftPwm, PeripheralConfig::SoftPwm) => {
                info!("{}: soft PWM", device.name());
            }
            (DriverKind::UartHal, PeripheralConfig::Uart(uart)) => {
                info!(
                    "{}: UARTE tx={} rx={} flow control={}",
                    device.name(),
                    uart.tx,
                    uart.rx,
                    uart.flow_control()
                );
            }
            (DriverKind::UartBitbang, PeripheralConfig::BitbangUart(uart)) => {
                if uart.cputimer_freq == 0 {
                    return Err(DriverError::InvalidConfig);
                }
                info!(
                    "{}: bit-banged UART tx={} rx={} on {} Hz cputime",
                    device.name(),
                    uart.tx,
                    uart.rx,
                    uart.cputimer_freq
                );
            }
            _ => {
                error!("{}: config does not match driver", device.name());
                return Err(DriverError::InvalidConfig);
            }
        }
        Ok(())
    }
}
