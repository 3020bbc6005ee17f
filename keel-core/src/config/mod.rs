//! Configuration types
//!
//! The build-time configuration snapshot and the peripheral configs
//! derived from it.

pub mod peripheral;
pub mod syscfg;

pub use peripheral::*;
pub use syscfg::*;
