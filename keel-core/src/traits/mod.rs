//! Bring-up collaborator traits
//!
//! These traits define the interface between the board-agnostic bring-up
//! sequence and the chip HAL, the tick source and the device registry.

pub mod hal;
pub mod registry;

pub use hal::{HalError, PeripheralHal, TickSource};
pub use registry::{
    DeviceKind, DeviceRegistry, DeviceSpec, DriverKind, InitTier, RegistryError,
    INIT_PRIO_DEFAULT,
};

/// Everything bring-up talks to
pub trait Platform: PeripheralHal + TickSource + DeviceRegistry {}

// Blanket implementation
impl<T: PeripheralHal + TickSource + DeviceRegistry> Platform for T {}
