//! Flash device descriptors
//!
//! Boards expose their flash devices through a small numeric id space.
//! Id 0 is always the MCU's internal flash; anything a board does not
//! know about is simply "not found".

/// Static description of a flash device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashDescriptor {
    /// Human-readable device name
    pub name: &'static str,
    /// Address of the first byte
    pub base_address: u32,
    /// Number of erase sectors
    pub sector_count: u32,
    /// Size of one erase sector in bytes
    pub sector_size: u32,
    /// Minimum write granularity in bytes
    pub write_alignment: u8,
    /// Value of an erased byte
    pub erased_value: u8,
}

impl FlashDescriptor {
    /// Total size in bytes
    pub const fn size(&self) -> u32 {
        self.sector_count * self.sector_size
    }

    /// Start address of a sector, or `None` past the end of the device
    pub fn sector_address(&self, sector: u32) -> Option<u32> {
        if sector < self.sector_count {
            Some(self.base_address + sector * self.sector_size)
        } else {
            None
        }
    }

    /// Check whether an address lies inside this device
    pub fn contains(&self, address: u32) -> bool {
        address >= self.base_address && address - self.base_address < self.size()
    }
}

/// Flash device lookup by id
pub trait FlashMap {
    /// Get the flash device registered under `id`
    ///
    /// Returns `None` for ids the board does not map.
    fn flash_dev(&self, id: u8) -> Option<&'static FlashDescriptor>;
}
