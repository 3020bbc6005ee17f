//! Peripheral configuration builders
//!
//! Typed, driver-facing configs derived from the [`SysConfig`] snapshot.
//! Each builder is only ever called for a peripheral whose presence flag
//! is set; once built, a config is owned by the device it configures and
//! never changes.

use keel_hal::Pin;

use super::syscfg::{
    AdcOptions, BitbangUartOptions, ConfigError, I2cOptions, SpiOptions, SysConfig, UartOptions,
};

/// SAADC resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcResolution {
    Bits8,
    Bits10,
    Bits12,
    Bits14,
}

impl AdcResolution {
    /// Map a bit count to a resolution
    pub fn from_bits(bits: u8) -> Result<Self, ConfigError> {
        match bits {
            8 => Ok(Self::Bits8),
            10 => Ok(Self::Bits10),
            12 => Ok(Self::Bits12),
            14 => Ok(Self::Bits14),
            other => Err(ConfigError::UnsupportedAdcResolution(other)),
        }
    }

    /// Bit count
    pub fn bits(self) -> u8 {
        match self {
            Self::Bits8 => 8,
            Self::Bits10 => 10,
            Self::Bits12 => 12,
            Self::Bits14 => 14,
        }
    }

    /// Largest raw sample value
    pub fn max_value(self) -> u16 {
        ((1u32 << self.bits()) - 1) as u16
    }
}

/// SAADC oversampling (samples averaged per conversion)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Oversample {
    Disabled = 0,
    X2 = 1,
    X4 = 2,
    X8 = 3,
    X16 = 4,
    X32 = 5,
    X64 = 6,
    X128 = 7,
    X256 = 8,
}

impl Oversample {
    /// Map a sample count (a power of two up to 256) to a setting
    pub fn from_samples(samples: u16) -> Result<Self, ConfigError> {
        match samples {
            1 => Ok(Self::Disabled),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            8 => Ok(Self::X8),
            16 => Ok(Self::X16),
            32 => Ok(Self::X32),
            64 => Ok(Self::X64),
            128 => Ok(Self::X128),
            256 => Ok(Self::X256),
            other => Err(ConfigError::UnsupportedOversample(other)),
        }
    }

    /// Samples averaged per conversion
    pub fn samples(self) -> u16 {
        1 << (self as u8)
    }
}

/// SAADC configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    pub resolution: AdcResolution,
    pub oversample: Oversample,
    pub interrupt_priority: u8,
}

impl AdcConfig {
    pub fn from_options(opts: &AdcOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            resolution: AdcResolution::from_bits(opts.resolution)?,
            oversample: Oversample::from_samples(opts.oversample)?,
            interrupt_priority: opts.interrupt_priority,
        })
    }
}

/// Hardware PWM configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmConfig {
    /// PWM instance
    pub index: u8,
}

/// TWI bus frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cFrequency {
    /// Standard mode (100 kHz)
    K100,
    /// 250 kHz
    K250,
    /// Fast mode (400 kHz)
    K400,
}

impl I2cFrequency {
    pub fn from_khz(khz: u16) -> Result<Self, ConfigError> {
        match khz {
            100 => Ok(Self::K100),
            250 => Ok(Self::K250),
            400 => Ok(Self::K400),
            other => Err(ConfigError::UnsupportedI2cFrequency(other)),
        }
    }

    /// Clock frequency in Hz
    pub fn hz(self) -> u32 {
        match self {
            Self::K100 => 100_000,
            Self::K250 => 250_000,
            Self::K400 => 400_000,
        }
    }
}

/// TWI master configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    pub scl: Pin,
    pub sda: Pin,
    pub frequency: I2cFrequency,
}

impl I2cConfig {
    pub fn from_options(opts: &I2cOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            scl: Pin::new(opts.pin_scl),
            sda: Pin::new(opts.pin_sda),
            frequency: I2cFrequency::from_khz(opts.freq_khz)?,
        })
    }
}

/// SPI role of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiRole {
    Master,
    Slave,
}

/// SPI pin configuration
///
/// In the master role slave select is a GPIO driven outside the SPI
/// routines, so `ss` is only set for slaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    pub sck: Pin,
    pub mosi: Pin,
    pub miso: Pin,
    pub ss: Option<Pin>,
}

impl SpiConfig {
    pub fn from_options(opts: &SpiOptions, role: SpiRole) -> Result<Self, ConfigError> {
        Ok(Self {
            sck: Pin::new(opts.pin_sck),
            mosi: Pin::new(opts.pin_mosi),
            miso: Pin::new(opts.pin_miso),
            ss: match role {
                SpiRole::Master => None,
                SpiRole::Slave => optional_pin(opts.pin_ss)?,
            },
        })
    }
}

/// Hardware UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    pub tx: Pin,
    pub rx: Pin,
    pub rts: Option<Pin>,
    pub cts: Option<Pin>,
}

impl UartConfig {
    pub fn from_options(opts: &UartOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            tx: Pin::new(opts.pin_tx),
            rx: Pin::new(opts.pin_rx),
            rts: optional_pin(opts.pin_rts)?,
            cts: optional_pin(opts.pin_cts)?,
        })
    }

    /// Hardware flow control needs both lines
    pub fn flow_control(&self) -> bool {
        self.rts.is_some() && self.cts.is_some()
    }
}

/// Bit-banged UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitbangUartConfig {
    pub tx: Pin,
    pub rx: Pin,
    /// Tick source frequency the bit timing is derived from
    pub cputimer_freq: u32,
}

impl BitbangUartConfig {
    pub fn from_options(opts: &BitbangUartOptions, cfg: &SysConfig) -> Self {
        Self {
            tx: Pin::new(opts.pin_tx),
            rx: Pin::new(opts.pin_rx),
            cputimer_freq: cfg.cputime.freq,
        }
    }
}

/// Configuration handed to a registered device's driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralConfig {
    Adc(AdcConfig),
    Pwm(PwmConfig),
    /// Soft PWM takes no configuration
    SoftPwm,
    Uart(UartConfig),
    BitbangUart(BitbangUartConfig),
}

impl PeripheralConfig {
    /// Pins the device drives, unused slots `None`
    pub fn pins(&self) -> [Option<Pin>; 4] {
        match self {
            PeripheralConfig::Uart(uart) => [Some(uart.tx), Some(uart.rx), uart.rts, uart.cts],
            PeripheralConfig::BitbangUart(uart) => [Some(uart.tx), Some(uart.rx), None, None],
            // PWM outputs are routed by the application, not at bring-up
            PeripheralConfig::Adc(_) | PeripheralConfig::Pwm(_) | PeripheralConfig::SoftPwm => {
                [None; 4]
            }
        }
    }
}

fn optional_pin(raw: i16) -> Result<Option<Pin>, ConfigError> {
    Pin::optional(raw).map_err(ConfigError::InvalidPin)
}
