//! Memory map and crash-dump regions

use keel_hal::MemDumpRegion;

/// Start of data RAM
pub const RAM_START: usize = 0x2000_0000;

/// Size of data RAM (256 KiB)
pub const RAM_SIZE: usize = 256 * 1024;

/// Start of code flash
pub const FLASH_START: usize = 0x0000_0000;

/// Size of code flash (1 MiB)
pub const FLASH_SIZE: usize = 1024 * 1024;

/// What memory to include in a core dump: all of RAM
static CORE_DUMP_REGIONS: [MemDumpRegion; 1] = [MemDumpRegion::new(RAM_START, RAM_SIZE)];

/// Regions the fault handler captures on a crash
///
/// The region count is the slice length.
pub fn core_dump_regions() -> &'static [MemDumpRegion] {
    &CORE_DUMP_REGIONS
}
