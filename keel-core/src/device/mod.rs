//! Device table
//!
//! In-tree device registry holding every device created at boot.

pub mod table;

pub use table::{Device, DeviceState, DeviceTable, DriverError, DriverInit, InitFailure};
