//! Keel - Board bring-up firmware
//!
//! Boots the nRF52840 preview development kit: applies the board's
//! interrupt priority policy, registers every configured on-chip
//! peripheral in a fixed order, then runs driver init tier by tier.
//!
//! The board configuration is `syscfg.toml`, resolved at build time.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_nrf::interrupt::{self, InterruptExt};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use keel_core::bringup::initialize_board;
use keel_core::config::{SpiConfig, SpiRole};
use keel_core::device::DeviceTable;
use keel_core::traits::InitTier;
use keel_hal::Bsp;
use keel_hal_nrf52::irq::{irqn, LOWEST_PRIORITY};
use keel_hal_nrf52::{ClockConfig, Nrf52840Pdk, Nrf52Platform, PolledSpi0, Spi0, SpiFrequency};

use crate::drivers::{chip_config, nvic_priority, BoardDrivers};

mod drivers;

mod syscfg {
    use keel_core::config::*;

    include!(concat!(env!("OUT_DIR"), "/syscfg.rs"));
}

use syscfg::SYSCFG;

/// Room for every device bring-up can create
const MAX_DEVICES: usize = 16;

static BOARD: Nrf52840Pdk = Nrf52840Pdk::new();

/// Both crystals are fitted on the PDK
const CLOCKS: ClockConfig = ClockConfig::NRF52840PDK;

// Device table lives for the whole run; drivers keep references into it
static DEVICES: StaticCell<DeviceTable<MAX_DEVICES>> = StaticCell::new();

/// Polled SPI master on SPI0, when enabled in syscfg
static POLLED_SPI: Mutex<CriticalSectionRawMutex, RefCell<Option<PolledSpi0>>> =
    Mutex::new(RefCell::new(None));

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Keel firmware starting...");

    let p = embassy_nrf::init(chip_config(&CLOCKS));
    info!("Peripherals initialized");

    // Radio always pre-empts everything else
    let radio = BOARD.nvic_priority(irqn::RADIO, LOWEST_PRIORITY);
    interrupt::RADIO.set_priority(nvic_priority(radio));

    for region in BOARD.core_dump() {
        debug!(
            "core dump region {=usize:#x}..{=usize:#x}",
            region.start,
            region.end()
        );
    }

    let devices = DEVICES.init(DeviceTable::new());
    let mut platform = Nrf52Platform::new(devices, SYSCFG.cputime.timer()).with_clocks(CLOCKS);

    if let Err(e) = initialize_board(&SYSCFG, &mut platform) {
        panic!("bring-up failed: {}", e);
    }
    info!("Bring-up complete");

    if SYSCFG.polled_spi {
        let spi_cfg = match SpiConfig::from_options(&SYSCFG.spi_0_master, SpiRole::Master) {
            Ok(cfg) => cfg,
            Err(e) => panic!("polled SPI0 config: {}", e),
        };
        if let Err(e) = platform.claim_polled_spi(&spi_cfg) {
            panic!("polled SPI0 unavailable: {}", e);
        }

        // Serial box 0 is ours now; keep the HAL from handing it out
        drop(p.TWISPI0);

        // SAFETY: serial box 0 was claimed above and its singleton consumed
        let mut regs = unsafe { Spi0::steal() };
        regs.configure(&spi_cfg, SpiFrequency::M4);
        POLLED_SPI.lock(|cell| cell.replace(Some(regs.into_polled())));
        info!("Polled SPI0 ready");
    }

    // Platform borrow ends here; the device table is read-only from now on
    drop(platform);

    let mut drivers = BoardDrivers::new(&BOARD);
    for tier in [InitTier::Kernel, InitTier::Primary] {
        match devices.initialize_tier(tier, &mut drivers) {
            Ok(count) => info!("{} init: {} devices", tier, count),
            Err(failure) => panic!("{} init failed: {}", tier, failure),
        }
    }

    loop {
        Timer::after_secs(10).await;
        debug!("alive, {} devices", devices.len());
    }
}
