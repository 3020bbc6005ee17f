//! Keel Hardware Abstraction Layer
//!
//! This crate defines the hardware abstractions shared by the board
//! support crates. Board crates (nRF52, ...) implement the traits; the
//! board-agnostic bring-up logic in `keel-core` only ever sees them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  keel-firmware (board binary)           │
//! └─────────────────────────────────────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐    ┌─────────────────┐
//! │   keel-core     │    │ keel-hal-nrf52  │
//! │ (bring-up plan) │◀───│ (chip specific) │
//! └─────────────────┘    └─────────────────┘
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  keel-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! - [`spi::SpiRegisters`], [`spi::PolledSpi`] - Register-level polled SPI master
//! - [`flash::FlashMap`], [`flash::FlashDescriptor`] - Flash device lookup
//! - [`bsp::Bsp`], [`bsp::MemDumpRegion`] - Board support hooks
//! - [`gpio::Pin`] - Abstract pin identifier

#![no_std]
#![deny(unsafe_code)]

pub mod bsp;
pub mod flash;
pub mod gpio;
pub mod spi;

// Re-export key types at crate root for convenience
pub use bsp::{Bsp, MemDumpRegion, PowerState};
pub use flash::{FlashDescriptor, FlashMap};
pub use gpio::Pin;
pub use spi::{PolledSpi, PolledSpiError, SpiRegisters};
