//! Device registry interface
//!
//! Bring-up is purely a client of the registry: it describes each device
//! with a [`DeviceSpec`] and asks for it to be created. The registry owns
//! the device (and its config) from then on.

use crate::config::PeripheralConfig;

/// Init priority meaning "no particular order within the tier"
pub const INIT_PRIO_DEFAULT: u8 = 0xFF;

/// When a device's driver init runs relative to kernel startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitTier {
    /// Before the scheduler starts
    Kernel,
    /// After the kernel is up, before application tasks
    Primary,
}

/// Which peripheral a device drives
///
/// The device table holds at most one device per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceKind {
    Adc(u8),
    Pwm(u8),
    SoftPwm,
    Uart(u8),
}

/// Driver init routine bound to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverKind {
    /// nRF52 SAADC driver
    Saadc,
    /// nRF52 hardware PWM driver
    Pwm,
    /// Timer-driven software PWM
    SoftPwm,
    /// UART HAL driver
    UartHal,
    /// Bit-banged UART on top of cputime
    UartBitbang,
}

/// Everything the registry needs to create a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceSpec {
    /// Unique device name ("adc0", "uart1", ...)
    pub name: &'static str,
    pub kind: DeviceKind,
    pub tier: InitTier,
    /// Order within the tier, lower first
    pub priority: u8,
    pub driver: DriverKind,
    pub config: PeripheralConfig,
}

/// Errors from the device registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// A device with this name or kind already exists
    Duplicate,
    /// No room left in the registry
    Full,
    /// A pin of the device is already in use or does not exist
    PinConflict,
}

/// Device registry
pub trait DeviceRegistry {
    /// Create a device
    ///
    /// Fails on a duplicate name or a pin already claimed by another
    /// peripheral; nothing is registered in that case.
    fn create_device(&mut self, spec: DeviceSpec) -> Result<(), RegistryError>;
}
