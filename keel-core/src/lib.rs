//! Board-agnostic bring-up logic
//!
//! This crate contains everything about bringing a board up that does
//! not depend on a specific chip:
//!
//! - Configuration snapshot and peripheral config builders
//! - Collaborator traits (chip HAL, tick source, device registry)
//! - Typed device table
//! - The bring-up plan and its executor

#![no_std]
#![deny(unsafe_code)]

pub mod bringup;
pub mod config;
pub mod device;
pub mod traits;
