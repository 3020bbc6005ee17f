//! System configuration snapshot
//!
//! The resolved set of board options: which peripherals exist and how
//! they are wired. Resolved once at build time (the firmware's build
//! script turns `syscfg.toml` into a `SysConfig` constant) and never
//! changed afterwards.
//!
//! This is plain data. Typed peripheral configs are derived from it by
//! the builders in [`super::peripheral`], and only for peripherals that
//! are enabled.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::peripheral::{AdcResolution, I2cFrequency, Oversample};

/// Number of hardware timer instances
pub const TIMER_COUNT: usize = 6;

/// Number of hardware PWM instances
pub const PWM_COUNT: usize = 4;

/// Number of GPIO pins (P0.00-P0.31, P1.00-P1.15)
pub const GPIO_COUNT: u8 = 48;

/// Tick source (cputime) options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct CputimeOptions {
    /// Backing timer instance, negative disables the tick source
    pub timer_num: i8,
    /// Tick frequency in Hz
    pub freq: u32,
}

impl CputimeOptions {
    /// Backing timer, if the tick source is enabled
    pub fn timer(&self) -> Option<u8> {
        u8::try_from(self.timer_num).ok()
    }
}

/// SAADC options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct AdcOptions {
    pub enabled: bool,
    /// Resolution in bits (8, 10, 12 or 14)
    pub resolution: u8,
    /// Samples averaged per conversion (1 = off, up to 256)
    pub oversample: u16,
    pub interrupt_priority: u8,
}

/// TWI master options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct I2cOptions {
    pub enabled: bool,
    pub pin_scl: u8,
    pub pin_sda: u8,
    pub freq_khz: u16,
}

/// SPI options, shared by the master and slave roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct SpiOptions {
    pub enabled: bool,
    pub pin_sck: u8,
    pub pin_mosi: u8,
    pub pin_miso: u8,
    /// Slave select, negative when unused (master SS is a plain GPIO)
    pub pin_ss: i16,
}

/// Hardware UART options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct UartOptions {
    pub enabled: bool,
    pub pin_tx: u8,
    pub pin_rx: u8,
    /// Negative disables hardware flow control on this line
    pub pin_rts: i16,
    pub pin_cts: i16,
}

/// Bit-banged UART options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct BitbangUartOptions {
    pub enabled: bool,
    pub pin_tx: u8,
    pub pin_rx: u8,
}

/// Complete board configuration snapshot
///
/// When deserialized, missing top-level entries keep their
/// [`SysConfig::NRF52840PDK`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SysConfig {
    /// Hardware timer presence, by instance
    pub timers: [bool; TIMER_COUNT],
    /// PWM presence, by instance
    pub pwm: [bool; PWM_COUNT],
    /// Software PWM on top of a timer
    pub soft_pwm: bool,
    /// Register-level polled SPI access on SPI 0
    pub polled_spi: bool,
    pub cputime: CputimeOptions,
    pub adc_0: AdcOptions,
    pub i2c_0: I2cOptions,
    pub spi_0_master: SpiOptions,
    pub spi_0_slave: SpiOptions,
    pub uart_0: UartOptions,
    pub uart_1: BitbangUartOptions,
}

/// Configuration that can never boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// SPI 0 enabled as both master and slave
    SpiRoleConflict,
    /// Tick source backed by a timer that does not exist
    CputimeTimerOutOfRange(i8),
    /// Tick source enabled with a zero frequency
    CputimeZeroFrequency,
    /// TWI cannot run at this frequency (kHz)
    UnsupportedI2cFrequency(u16),
    /// SAADC cannot run at this resolution (bits)
    UnsupportedAdcResolution(u8),
    /// SAADC cannot average this many samples
    UnsupportedOversample(u16),
    /// Pin number beyond the chip's GPIOs
    InvalidPin(i16),
}

impl SysConfig {
    /// Stock configuration of the nRF52840 preview development kit
    ///
    /// Timer 0 backs a 1 MHz tick source, UART 0 is wired to the
    /// on-board debugger; everything else is off.
    pub const NRF52840PDK: Self = Self {
        timers: [true, false, false, false, false, false],
        pwm: [false; PWM_COUNT],
        soft_pwm: false,
        polled_spi: false,
        cputime: CputimeOptions {
            timer_num: 0,
            freq: 1_000_000,
        },
        adc_0: AdcOptions {
            enabled: false,
            resolution: 12,
            oversample: 1,
            interrupt_priority: 7,
        },
        i2c_0: I2cOptions {
            enabled: false,
            pin_scl: 27,
            pin_sda: 26,
            freq_khz: 100,
        },
        spi_0_master: SpiOptions {
            enabled: false,
            pin_sck: 47,
            pin_mosi: 45,
            pin_miso: 46,
            pin_ss: -1,
        },
        spi_0_slave: SpiOptions {
            enabled: false,
            pin_sck: 47,
            pin_mosi: 45,
            pin_miso: 46,
            pin_ss: 44,
        },
        uart_0: UartOptions {
            enabled: true,
            pin_tx: 6,
            pin_rx: 8,
            pin_rts: 5,
            pin_cts: 7,
        },
        uart_1: BitbangUartOptions {
            enabled: false,
            pin_tx: 11,
            pin_rx: 12,
        },
    };

    /// Configuration with every peripheral switched off
    pub const fn disabled() -> Self {
        let mut cfg = Self::NRF52840PDK;
        cfg.timers = [false; TIMER_COUNT];
        cfg.cputime.timer_num = -1;
        cfg.uart_0.enabled = false;
        cfg
    }

    /// Reject option combinations that can never boot
    ///
    /// Only looks at enabled peripherals; a disabled peripheral's
    /// options are never read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spi_0_master.enabled && self.spi_0_slave.enabled {
            return Err(ConfigError::SpiRoleConflict);
        }

        if self.cputime.timer_num >= TIMER_COUNT as i8 {
            return Err(ConfigError::CputimeTimerOutOfRange(self.cputime.timer_num));
        }
        if self.cputime.timer().is_some() && self.cputime.freq == 0 {
            return Err(ConfigError::CputimeZeroFrequency);
        }

        if self.i2c_0.enabled {
            I2cFrequency::from_khz(self.i2c_0.freq_khz)?;
        }

        self.validate_pins()?;

        if self.adc_0.enabled {
            AdcResolution::from_bits(self.adc_0.resolution)?;
            Oversample::from_samples(self.adc_0.oversample)?;
        }

        Ok(())
    }

    /// Every pin of an enabled peripheral must exist on the chip
    ///
    /// Negative optional pins are "not connected" and always accepted.
    fn validate_pins(&self) -> Result<(), ConfigError> {
        if self.i2c_0.enabled {
            check_pins(&[i16::from(self.i2c_0.pin_scl), i16::from(self.i2c_0.pin_sda)])?;
        }
        // The polled master drives the SPI 0 master pins
        if self.spi_0_master.enabled || self.polled_spi {
            check_spi_pins(&self.spi_0_master)?;
        }
        if self.spi_0_slave.enabled {
            check_spi_pins(&self.spi_0_slave)?;
        }
        if self.uart_0.enabled {
            let u = &self.uart_0;
            check_pins(&[i16::from(u.pin_tx), i16::from(u.pin_rx), u.pin_rts, u.pin_cts])?;
        }
        if self.uart_1.enabled {
            check_pins(&[i16::from(self.uart_1.pin_tx), i16::from(self.uart_1.pin_rx)])?;
        }
        Ok(())
    }

    /// Number of enabled hardware timers
    pub fn timer_count(&self) -> usize {
        self.timers.iter().filter(|&&t| t).count()
    }
}

fn check_spi_pins(opts: &SpiOptions) -> Result<(), ConfigError> {
    check_pins(&[
        i16::from(opts.pin_sck),
        i16::from(opts.pin_mosi),
        i16::from(opts.pin_miso),
        opts.pin_ss,
    ])
}

fn check_pins(pins: &[i16]) -> Result<(), ConfigError> {
    match pins.iter().find(|&&p| p >= GPIO_COUNT as i16) {
        Some(&pin) => Err(ConfigError::InvalidPin(pin)),
        None => Ok(()),
    }
}

impl Default for SysConfig {
    fn default() -> Self {
        Self::NRF52840PDK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_config_is_valid() {
        let cfg = SysConfig::NRF52840PDK;
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.timer_count(), 1);
        assert_eq!(cfg.cputime.timer(), Some(0));
    }

    #[test]
    fn test_disabled_config() {
        let cfg = SysConfig::disabled();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.timer_count(), 0);
        assert_eq!(cfg.cputime.timer(), None);
        assert!(!cfg.uart_0.enabled);
    }

    #[test]
    fn test_spi_role_conflict() {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.spi_0_master.enabled = true;
        cfg.spi_0_slave.enabled = true;
        assert_eq!(cfg.validate(), Err(ConfigError::SpiRoleConflict));

        cfg.spi_0_slave.enabled = false;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_cputime_range() {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.cputime.timer_num = 6;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::CputimeTimerOutOfRange(6))
        );

        cfg.cputime.timer_num = 5;
        assert_eq!(cfg.validate(), Ok(()));

        cfg.cputime.freq = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::CputimeZeroFrequency));

        // Frequency is irrelevant once the tick source is off
        cfg.cputime.timer_num = -1;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_disabled_options_not_checked() {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.i2c_0.freq_khz = 123;
        cfg.adc_0.resolution = 9;
        assert_eq!(cfg.validate(), Ok(()));

        cfg.i2c_0.enabled = true;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnsupportedI2cFrequency(123))
        );

        cfg.i2c_0.freq_khz = 400;
        cfg.adc_0.enabled = true;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnsupportedAdcResolution(9))
        );
    }

    #[test]
    fn test_pins_beyond_chip_rejected() {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.spi_0_slave.enabled = true;
        cfg.spi_0_slave.pin_ss = 300;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidPin(300)));

        cfg.spi_0_slave.pin_ss = 44;
        cfg.uart_0.pin_cts = 200;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidPin(200)));

        cfg.uart_0.pin_cts = -1;
        assert_eq!(cfg.validate(), Ok(()));

        // First pin past P1.15
        cfg.uart_0.pin_tx = 48;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidPin(48)));
        cfg.uart_0.pin_tx = 47;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_pins_of_disabled_peripherals_ignored() {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.i2c_0.pin_scl = 200;
        cfg.uart_1.pin_rx = 99;
        assert_eq!(cfg.validate(), Ok(()));

        cfg.uart_1.enabled = true;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidPin(99)));
    }

    #[test]
    fn test_polled_spi_pins_checked() {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.spi_0_master.pin_sck = 64;
        assert_eq!(cfg.validate(), Ok(()));

        cfg.polled_spi = true;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidPin(64)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_toml_overrides_stock() {
        let cfg: SysConfig = toml::from_str(
            r#"
            timers = [true, true, false, false, false, false]
            polled_spi = true

            [cputime]
            timer_num = 1
            freq = 32768

            [uart_1]
            enabled = true
            pin_tx = 11
            pin_rx = 12
            "#,
        )
        .unwrap();

        assert_eq!(cfg.timer_count(), 2);
        assert!(cfg.polled_spi);
        assert_eq!(cfg.cputime.timer(), Some(1));
        assert!(cfg.uart_1.enabled);
        // Untouched sections keep the stock values
        assert_eq!(cfg.uart_0, SysConfig::NRF52840PDK.uart_0);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_toml_rejects_unknown_keys() {
        assert!(toml::from_str::<SysConfig>("spi_1_master = true").is_err());
        assert!(toml::from_str::<SysConfig>(
            "[uart_1]\nenabled = true\npin_tx = 11\npin_rx = 12\nbaud = 9600"
        )
        .is_err());
    }
}
