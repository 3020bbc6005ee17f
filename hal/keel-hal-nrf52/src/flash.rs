//! Internal flash descriptor
//!
//! The nRF52840's 1 MiB of internal flash is the only flash device this
//! board maps, under id 0.

use keel_hal::FlashDescriptor;

use crate::memory::{FLASH_SIZE, FLASH_START};

/// Flash id of the internal flash
pub const INTERNAL_FLASH_ID: u8 = 0;

const SECTOR_SIZE: u32 = 4096;

/// nRF52840 internal flash (NVMC)
pub static NRF52840_FLASH: FlashDescriptor = FlashDescriptor {
    name: "nrf52840-flash",
    base_address: FLASH_START as u32,
    sector_count: FLASH_SIZE as u32 / SECTOR_SIZE,
    sector_size: SECTOR_SIZE,
    write_alignment: 4,
    erased_value: 0xFF,
};

/// Look up a flash device by id
pub fn flash_dev(id: u8) -> Option<&'static FlashDescriptor> {
    match id {
        INTERNAL_FLASH_ID => Some(&NRF52840_FLASH),
        _ => None,
    }
}
