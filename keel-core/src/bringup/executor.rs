//! Bring-up executor
//!
//! Runs a [`BringupPlan`] against the platform, step by step. The first
//! failing step ends bring-up; nothing after it runs and nothing is
//! retried. There is no partially booted board: the caller is expected
//! to halt on any error.

use crate::config::{ConfigError, SysConfig, TIMER_COUNT};
use crate::traits::{HalError, Platform, RegistryError};

use super::plan::{plan, BringupPlan, Step, StepKind};

/// Why a step failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepError {
    /// Rejected by the chip HAL or the tick source
    Hal(HalError),
    /// Rejected by the device registry
    Registry(RegistryError),
    /// The tick source's timer was not claimed by an earlier step
    TickTimerUnclaimed(u8),
}

impl From<HalError> for StepError {
    fn from(e: HalError) -> Self {
        StepError::Hal(e)
    }
}

impl From<RegistryError> for StepError {
    fn from(e: RegistryError) -> Self {
        StepError::Registry(e)
    }
}

/// Fatal bring-up error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringupError {
    /// The configuration can never boot; no step ran
    Config(ConfigError),
    /// A step failed; every step before it succeeded, none after it ran
    Step { step: StepKind, error: StepError },
}

impl From<ConfigError> for BringupError {
    fn from(e: ConfigError) -> Self {
        BringupError::Config(e)
    }
}

/// Bring the board up
///
/// Meant to run exactly once per boot, before any task is spawned.
/// Running it again against the same registry fails on the first
/// duplicate device (or on a timer that is already claimed).
pub fn initialize_board<P: Platform>(cfg: &SysConfig, platform: &mut P) -> Result<(), BringupError> {
    let steps = plan(cfg)?;
    execute(steps, platform)
}

/// Run every step of `plan` in order, stopping at the first failure
pub fn execute<P: Platform>(plan: BringupPlan, platform: &mut P) -> Result<(), BringupError> {
    let mut claimed_timers = [false; TIMER_COUNT];

    for step in plan {
        let kind = step.kind();

        #[cfg(feature = "defmt")]
        defmt::debug!("bring-up: {}", kind);

        if let Err(error) = run_step(step, platform, &mut claimed_timers) {
            #[cfg(feature = "defmt")]
            defmt::error!("bring-up failed at {}: {}", kind, error);

            return Err(BringupError::Step { step: kind, error });
        }
    }

    Ok(())
}

fn run_step<P: Platform>(
    step: Step,
    platform: &mut P,
    claimed_timers: &mut [bool; TIMER_COUNT],
) -> Result<(), StepError> {
    match step {
        Step::ClockStart => platform.clock_start(),
        Step::Timer(index) => {
            platform.timer_init(index)?;
            if let Some(slot) = claimed_timers.get_mut(index as usize) {
                *slot = true;
            }
        }
        Step::Device(spec) => platform.create_device(spec)?,
        Step::TickSource { timer, freq_hz } => {
            if !claimed_timers.get(timer as usize).copied().unwrap_or(false) {
                return Err(StepError::TickTimerUnclaimed(timer));
            }
            platform.init_tick_source(freq_hz)?;
        }
        Step::I2c { index, config } => platform.i2c_init(index, &config)?,
        Step::Spi {
            index,
            role,
            config,
        } => platform.spi_init(index, &config, role)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{I2cConfig, SpiConfig, SpiRole, PWM_COUNT};
    use crate::device::DeviceTable;
    use crate::traits::{DeviceRegistry, DeviceSpec, PeripheralHal, TickSource};
    use heapless::Vec;

    /// Collaborator call, as seen by the mock platform
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Clock,
        Timer(u8),
        Device(&'static str),
        Tick(u32),
        I2c(u8),
        Spi(u8, SpiRole),
    }

    /// Mock platform recording every collaborator call
    struct MockPlatform {
        calls: Vec<Call, 64>,
        devices: DeviceTable<16>,
        fail: Option<(Call, HalError)>,
    }

    impl MockPlatform {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                devices: DeviceTable::new(),
                fail: None,
            }
        }

        fn record(&mut self, call: Call) -> Result<(), HalError> {
            self.calls.push(call).unwrap();
            match self.fail {
                Some((c, e)) if c == call => Err(e),
                _ => Ok(()),
            }
        }
    }

    impl PeripheralHal for MockPlatform {
        fn clock_start(&mut self) {
            self.calls.push(Call::Clock).unwrap();
        }

        fn timer_init(&mut self, index: u8) -> Result<(), HalError> {
            self.record(Call::Timer(index))
        }

        fn i2c_init(&mut self, index: u8, _config: &I2cConfig) -> Result<(), HalError> {
            self.record(Call::I2c(index))
        }

        fn spi_init(
            &mut self,
            index: u8,
            _config: &SpiConfig,
            role: SpiRole,
        ) -> Result<(), HalError> {
            self.record(Call::Spi(index, role))
        }
    }

    impl TickSource for MockPlatform {
        fn init_tick_source(&mut self, freq_hz: u32) -> Result<(), HalError> {
            self.record(Call::Tick(freq_hz))
        }
    }

    impl DeviceRegistry for MockPlatform {
        fn create_device(&mut self, spec: DeviceSpec) -> Result<(), RegistryError> {
            self.calls.push(Call::Device(spec.name)).unwrap();
            self.devices.create_device(spec)
        }
    }

    fn everything() -> SysConfig {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.timers = [true, true, false, false, false, false];
        cfg.pwm = [true; PWM_COUNT];
        cfg.soft_pwm = true;
        cfg.adc_0.enabled = true;
        cfg.i2c_0.enabled = true;
        cfg.spi_0_slave.enabled = true;
        cfg.uart_1.enabled = true;
        cfg
    }

    #[test]
    fn test_stock_board() {
        let mut platform = MockPlatform::new();
        initialize_board(&SysConfig::NRF52840PDK, &mut platform).unwrap();

        assert_eq!(
            platform.calls.as_slice(),
            &[
                Call::Clock,
                Call::Timer(0),
                Call::Tick(1_000_000),
                Call::Device("uart0"),
            ]
        );
        assert_eq!(platform.devices.len(), 1);
    }

    #[test]
    fn test_full_board_call_order() {
        let mut platform = MockPlatform::new();
        initialize_board(&everything(), &mut platform).unwrap();

        assert_eq!(
            platform.calls.as_slice(),
            &[
                Call::Clock,
                Call::Timer(0),
                Call::Timer(1),
                Call::Device("adc0"),
                Call::Device("pwm0"),
                Call::Device("pwm1"),
                Call::Device("pwm2"),
                Call::Device("pwm3"),
                Call::Device("spwm"),
                Call::Tick(1_000_000),
                Call::I2c(0),
                Call::Spi(0, SpiRole::Slave),
                Call::Device("uart0"),
                Call::Device("uart1"),
            ]
        );
        assert_eq!(platform.devices.len(), 8);
    }

    #[test]
    fn test_disabled_peripherals_make_no_calls() {
        let mut platform = MockPlatform::new();
        initialize_board(&SysConfig::disabled(), &mut platform).unwrap();

        assert_eq!(platform.calls.as_slice(), &[Call::Clock]);
        assert!(platform.devices.is_empty());
    }

    #[test]
    fn test_fail_fast() {
        let mut platform = MockPlatform::new();
        platform.fail = Some((Call::Timer(1), HalError::ResourceConflict));

        let err = initialize_board(&everything(), &mut platform).unwrap_err();
        assert_eq!(
            err,
            BringupError::Step {
                step: StepKind::Timer(1),
                error: StepError::Hal(HalError::ResourceConflict),
            }
        );
        // Nothing after the failing step ran
        assert_eq!(
            platform.calls.as_slice(),
            &[Call::Clock, Call::Timer(0), Call::Timer(1)]
        );
        assert!(platform.devices.is_empty());
    }

    #[test]
    fn test_tick_source_failure_stops_buses() {
        let mut platform = MockPlatform::new();
        platform.fail = Some((Call::Tick(1_000_000), HalError::TimerUnclaimed));

        let err = initialize_board(&everything(), &mut platform).unwrap_err();
        assert_eq!(
            err,
            BringupError::Step {
                step: StepKind::TickSource,
                error: StepError::Hal(HalError::TimerUnclaimed),
            }
        );
        assert!(!platform.calls.contains(&Call::I2c(0)));
        assert!(platform.devices.find("uart0").is_none());
    }

    #[test]
    fn test_tick_source_needs_its_timer() {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.timers = [false, true, false, false, false, false];
        cfg.cputime.timer_num = 0;

        let mut platform = MockPlatform::new();
        let err = initialize_board(&cfg, &mut platform).unwrap_err();
        assert_eq!(
            err,
            BringupError::Step {
                step: StepKind::TickSource,
                error: StepError::TickTimerUnclaimed(0),
            }
        );
        assert_eq!(platform.calls.as_slice(), &[Call::Clock, Call::Timer(1)]);
    }

    #[test]
    fn test_invalid_config_makes_no_calls() {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.spi_0_master.enabled = true;
        cfg.spi_0_slave.enabled = true;

        let mut platform = MockPlatform::new();
        assert_eq!(
            initialize_board(&cfg, &mut platform),
            Err(BringupError::Config(ConfigError::SpiRoleConflict))
        );
        assert!(platform.calls.is_empty());
    }

    #[test]
    fn test_second_run_is_fatal() {
        // No timers, so the first thing to collide is a device name
        let mut cfg = SysConfig::disabled();
        cfg.adc_0.enabled = true;
        cfg.uart_0.enabled = true;

        let mut platform = MockPlatform::new();
        initialize_board(&cfg, &mut platform).unwrap();
        assert_eq!(
            initialize_board(&cfg, &mut platform),
            Err(BringupError::Step {
                step: StepKind::Device("adc0"),
                error: StepError::Registry(RegistryError::Duplicate),
            })
        );
        assert_eq!(platform.devices.len(), 2);
    }
}
