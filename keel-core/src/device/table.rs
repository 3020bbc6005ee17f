//! Typed device table
//!
//! Arena of the devices created during bring-up. Entries are appended
//! once and live until power-off; there is no removal.

use heapless::Vec;

use crate::config::PeripheralConfig;
use crate::traits::{DeviceKind, DeviceRegistry, DeviceSpec, DriverKind, InitTier, RegistryError};

/// Lifecycle of a device entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Registered, driver init not run yet
    Created,
    /// Driver init succeeded
    Ready,
    /// Driver init failed
    Failed,
}

/// A registered device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Device {
    spec: DeviceSpec,
    state: DeviceState,
}

impl Device {
    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn kind(&self) -> DeviceKind {
        self.spec.kind
    }

    pub fn tier(&self) -> InitTier {
        self.spec.tier
    }

    pub fn priority(&self) -> u8 {
        self.spec.priority
    }

    pub fn driver(&self) -> DriverKind {
        self.spec.driver
    }

    /// The config this device was created with
    pub fn config(&self) -> &PeripheralConfig {
        &self.spec.config
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }
}

/// Errors reported by a driver's init routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// The driver does not handle this kind of device
    NotSupported,
    /// The config was rejected by the driver
    InvalidConfig,
    /// The peripheral did not respond
    Hardware,
}

/// Driver init failure, with the device it happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitFailure {
    pub device: &'static str,
    pub error: DriverError,
}

/// Driver init routines
///
/// Implemented by the driver layer; called once per device.
pub trait DriverInit {
    fn init(&mut self, device: &Device) -> Result<(), DriverError>;
}

/// Fixed-capacity device table
pub struct DeviceTable<const N: usize> {
    devices: Vec<Device, N>,
}

impl<const N: usize> Default for DeviceTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> DeviceTable<N> {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    /// Find a device by name
    pub fn find(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name() == name)
    }

    /// Get the device of a given kind
    pub fn get(&self, kind: DeviceKind) -> Option<&Device> {
        self.devices.iter().find(|d| d.kind() == kind)
    }

    /// Devices in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Run driver init for every created device in `tier`
    ///
    /// Devices run in priority order (lowest first), ties in registration
    /// order. Stops at the first failure, leaving that device `Failed`
    /// and later ones `Created`. Returns the number of devices brought up.
    pub fn initialize_tier<D: DriverInit>(
        &mut self,
        tier: InitTier,
        drivers: &mut D,
    ) -> Result<usize, InitFailure> {
        let mut order: Vec<(u8, usize), N> = self
            .devices
            .iter()
            .enumerate()
            .filter(|(_, d)| d.tier() == tier && d.state == DeviceState::Created)
            .map(|(i, d)| (d.priority(), i))
            .collect();
        order.sort_unstable();

        for &(_, i) in order.iter() {
            let device = &mut self.devices[i];
            match drivers.init(device) {
                Ok(()) => device.state = DeviceState::Ready,
                Err(error) => {
                    device.state = DeviceState::Failed;
                    return Err(InitFailure {
                        device: device.name(),
                        error,
                    });
                }
            }
        }

        Ok(order.len())
    }
}

impl<const N: usize> DeviceRegistry for DeviceTable<N> {
    fn create_device(&mut self, spec: DeviceSpec) -> Result<(), RegistryError> {
        if self.find(spec.name).is_some() || self.get(spec.kind).is_some() {
            return Err(RegistryError::Duplicate);
        }
        self.devices
            .push(Device {
                spec,
                state: DeviceState::Created,
            })
            .map_err(|_| RegistryError::Full)
    }
}
