//! Bring-up plan
//!
//! Turns the configuration snapshot into the ordered list of bring-up
//! steps. Only enabled peripherals produce a step, and a peripheral's
//! config is only built when its step is.
//!
//! The order is fixed:
//!
//! 1. system clocks
//! 2. hardware timers
//! 3. kernel-tier devices (ADC, PWM, soft PWM)
//! 4. tick source, which requires its timer from step 2
//! 5. TWI, then SPI master, then SPI slave
//! 6. serial devices (primary tier)

use heapless::Vec;

use crate::config::{
    AdcConfig, BitbangUartConfig, ConfigError, I2cConfig, PeripheralConfig, PwmConfig, SpiConfig,
    SpiRole, SysConfig, UartConfig, PWM_COUNT, TIMER_COUNT,
};
use crate::traits::{DeviceKind, DeviceSpec, DriverKind, InitTier, INIT_PRIO_DEFAULT};

/// Upper bound on the number of steps any configuration can produce
///
/// Clocks, timers, ADC, PWM, soft PWM, tick source, I2C, one SPI role and
/// both UARTs.
pub const MAX_STEPS: usize = 1 + TIMER_COUNT + 1 + PWM_COUNT + 1 + 1 + 1 + 1 + 2;

/// Device names of the hardware PWM instances
const PWM_NAMES: [&str; PWM_COUNT] = ["pwm0", "pwm1", "pwm2", "pwm3"];

/// One bring-up step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Start the system clocks
    ClockStart,
    /// Claim a hardware timer
    Timer(u8),
    /// Register a device
    Device(DeviceSpec),
    /// Start the tick source on an already claimed timer
    TickSource { timer: u8, freq_hz: u32 },
    /// Claim a TWI master
    I2c { index: u8, config: I2cConfig },
    /// Claim an SPI instance
    Spi {
        index: u8,
        role: SpiRole,
        config: SpiConfig,
    },
}

/// Step identity, used for logging and error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepKind {
    ClockStart,
    Timer(u8),
    Device(&'static str),
    TickSource,
    I2c(u8),
    Spi(u8, SpiRole),
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::ClockStart => StepKind::ClockStart,
            Step::Timer(index) => StepKind::Timer(*index),
            Step::Device(spec) => StepKind::Device(spec.name),
            Step::TickSource { .. } => StepKind::TickSource,
            Step::I2c { index, .. } => StepKind::I2c(*index),
            Step::Spi { index, role, .. } => StepKind::Spi(*index, *role),
        }
    }
}

/// Ordered bring-up steps
pub type BringupPlan = Vec<Step, MAX_STEPS>;

/// Build the bring-up plan for a configuration
///
/// Rejects configurations that can never boot before producing any step.
pub fn plan(cfg: &SysConfig) -> Result<BringupPlan, ConfigError> {
    cfg.validate()?;

    let mut steps = BringupPlan::new();
    let mut push = |step: Step| {
        let pushed = steps.push(step).is_ok();
        debug_assert!(pushed, "MAX_STEPS too small for this configuration");
    };

    push(Step::ClockStart);

    for (index, &on) in cfg.timers.iter().enumerate() {
        if on {
            push(Step::Timer(index as u8));
        }
    }

    if cfg.adc_0.enabled {
        push(Step::Device(DeviceSpec {
            name: "adc0",
            kind: DeviceKind::Adc(0),
            tier: InitTier::Kernel,
            priority: INIT_PRIO_DEFAULT,
            driver: DriverKind::Saadc,
            config: PeripheralConfig::Adc(AdcConfig::from_options(&cfg.adc_0)?),
        }));
    }

    for (index, &on) in cfg.pwm.iter().enumerate() {
        if !on {
            continue;
        }
        push(Step::Device(DeviceSpec {
            name: PWM_NAMES[index],
            kind: DeviceKind::Pwm(index as u8),
            tier: InitTier::Kernel,
            priority: INIT_PRIO_DEFAULT,
            driver: DriverKind::Pwm,
            config: PeripheralConfig::Pwm(PwmConfig { index: index as u8 }),
        }));
    }

    if cfg.soft_pwm {
        push(Step::Device(DeviceSpec {
            name: "spwm",
            kind: DeviceKind::SoftPwm,
            tier: InitTier::Kernel,
            priority: INIT_PRIO_DEFAULT,
            driver: DriverKind::SoftPwm,
            config: PeripheralConfig::SoftPwm,
        }));
    }

    if let Some(timer) = cfg.cputime.timer() {
        push(Step::TickSource {
            timer,
            freq_hz: cfg.cputime.freq,
        });
    }

    if cfg.i2c_0.enabled {
        push(Step::I2c {
            index: 0,
            config: I2cConfig::from_options(&cfg.i2c_0)?,
        });
    }

    if cfg.spi_0_master.enabled {
        push(Step::Spi {
            index: 0,
            role: SpiRole::Master,
            config: SpiConfig::from_options(&cfg.spi_0_master, SpiRole::Master)?,
        });
    }

    if cfg.spi_0_slave.enabled {
        push(Step::Spi {
            index: 0,
            role: SpiRole::Slave,
            config: SpiConfig::from_options(&cfg.spi_0_slave, SpiRole::Slave)?,
        });
    }

    if cfg.uart_0.enabled {
        push(Step::Device(DeviceSpec {
            name: "uart0",
            kind: DeviceKind::Uart(0),
            tier: InitTier::Primary,
            priority: 0,
            driver: DriverKind::UartHal,
            config: PeripheralConfig::Uart(UartConfig::from_options(&cfg.uart_0)?),
        }));
    }

    if cfg.uart_1.enabled {
        push(Step::Device(DeviceSpec {
            name: "uart1",
            kind: DeviceKind::Uart(1),
            tier: InitTier::Primary,
            priority: 0,
            driver: DriverKind::UartBitbang,
            config: PeripheralConfig::BitbangUart(BitbangUartConfig::from_options(
                &cfg.uart_1,
                cfg,
            )),
        }));
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn everything() -> SysConfig {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.timers = [true; TIMER_COUNT];
        cfg.pwm = [true; PWM_COUNT];
        cfg.soft_pwm = true;
        cfg.adc_0.enabled = true;
        cfg.i2c_0.enabled = true;
        cfg.spi_0_master.enabled = true;
        cfg.uart_1.enabled = true;
        cfg
    }

    fn kinds(plan: &BringupPlan) -> Vec<StepKind, MAX_STEPS> {
        plan.iter().map(Step::kind).collect()
    }

    #[test]
    fn test_stock_plan() {
        let plan = plan(&SysConfig::NRF52840PDK).unwrap();
        assert_eq!(
            kinds(&plan).as_slice(),
            &[
                StepKind::ClockStart,
                StepKind::Timer(0),
                StepKind::TickSource,
                StepKind::Device("uart0"),
            ]
        );
        assert_eq!(
            plan[2],
            Step::TickSource {
                timer: 0,
                freq_hz: 1_000_000
            }
        );
    }

    #[test]
    fn test_full_plan_order() {
        let plan = plan(&everything()).unwrap();
        assert_eq!(
            kinds(&plan).as_slice(),
            &[
                StepKind::ClockStart,
                StepKind::Timer(0),
                StepKind::Timer(1),
                StepKind::Timer(2),
                StepKind::Timer(3),
                StepKind::Timer(4),
                StepKind::Timer(5),
                StepKind::Device("adc0"),
                StepKind::Device("pwm0"),
                StepKind::Device("pwm1"),
                StepKind::Device("pwm2"),
                StepKind::Device("pwm3"),
                StepKind::Device("spwm"),
                StepKind::TickSource,
                StepKind::I2c(0),
                StepKind::Spi(0, SpiRole::Master),
                StepKind::Device("uart0"),
                StepKind::Device("uart1"),
            ]
        );
    }

    #[test]
    fn test_largest_plan_fits() {
        assert_eq!(plan(&everything()).unwrap().len(), MAX_STEPS);

        let mut slave = everything();
        slave.spi_0_master.enabled = false;
        slave.spi_0_slave.enabled = true;
        assert_eq!(plan(&slave).unwrap().len(), MAX_STEPS);
    }

    #[test]
    fn test_disabled_config_only_starts_clocks() {
        let plan = plan(&SysConfig::disabled()).unwrap();
        assert_eq!(kinds(&plan).as_slice(), &[StepKind::ClockStart]);
    }

    #[test]
    fn test_disabled_options_never_built() {
        // Options that would fail to build are fine while disabled
        let mut cfg = SysConfig::disabled();
        cfg.adc_0.resolution = 11;
        cfg.i2c_0.freq_khz = 1;
        assert_eq!(plan(&cfg).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_config_yields_no_steps() {
        let mut cfg = SysConfig::NRF52840PDK;
        cfg.spi_0_master.enabled = true;
        cfg.spi_0_slave.enabled = true;
        assert_eq!(plan(&cfg), Err(ConfigError::SpiRoleConflict));
    }

    #[test]
    fn test_device_configs() {
        let plan = plan(&everything()).unwrap();
        let uart1 = plan
            .iter()
            .find_map(|s| match s {
                Step::Device(spec) if spec.name == "uart1" => Some(*spec),
                _ => None,
            })
            .unwrap();
        assert_eq!(uart1.tier, InitTier::Primary);
        assert_eq!(uart1.driver, DriverKind::UartBitbang);
        match uart1.config {
            PeripheralConfig::BitbangUart(c) => assert_eq!(c.cputimer_freq, 1_000_000),
            other => panic!("unexpected config {:?}", other),
        }

        let pwm3 = plan
            .iter()
            .find_map(|s| match s {
                Step::Device(spec) if spec.kind == DeviceKind::Pwm(3) => Some(*spec),
                _ => None,
            })
            .unwrap();
        assert_eq!(pwm3.name, "pwm3");
        assert_eq!(pwm3.priority, INIT_PRIO_DEFAULT);
    }

    fn arb_config() -> impl Strategy<Value = SysConfig> {
        (
            any::<[bool; TIMER_COUNT]>(),
            any::<[bool; PWM_COUNT]>(),
            any::<[bool; 6]>(),
            -1i8..TIMER_COUNT as i8,
        )
            .prop_map(|(timers, pwm, flags, timer_num)| {
                let mut cfg = SysConfig::NRF52840PDK;
                cfg.timers = timers;
                cfg.pwm = pwm;
                cfg.soft_pwm = flags[0];
                cfg.adc_0.enabled = flags[1];
                cfg.i2c_0.enabled = flags[2];
                cfg.spi_0_master.enabled = flags[3];
                cfg.spi_0_slave.enabled = flags[4] && !flags[3];
                cfg.uart_1.enabled = flags[5];
                cfg.cputime.timer_num = timer_num;
                cfg
            })
    }

    proptest! {
        #[test]
        fn prop_timers_before_tick_before_buses(cfg in arb_config()) {
            let plan = plan(&cfg).unwrap();
            let pos = |pred: &dyn Fn(&Step) -> bool| plan.iter().position(|s| pred(s));
            let rpos = |pred: &dyn Fn(&Step) -> bool| plan.iter().rposition(|s| pred(s));

            let last_timer = rpos(&|s| matches!(s, Step::Timer(_)));
            let tick = pos(&|s| matches!(s, Step::TickSource { .. }));
            let first_bus = pos(&|s| {
                matches!(s, Step::I2c { .. } | Step::Spi { .. })
                    || matches!(s, Step::Device(d) if matches!(d.kind, DeviceKind::Uart(_)))
            });

            if let (Some(t), Some(c)) = (last_timer, tick) {
                prop_assert!(t < c);
            }
            if let (Some(c), Some(b)) = (tick, first_bus) {
                prop_assert!(c < b);
            }
            if let (Some(t), Some(b)) = (last_timer, first_bus) {
                prop_assert!(t < b);
            }
        }

        #[test]
        fn prop_one_step_per_enabled_peripheral(cfg in arb_config()) {
            let plan = plan(&cfg).unwrap();
            let devices = plan.iter().filter(|s| matches!(s, Step::Device(_))).count();
            let expected = cfg.pwm.iter().filter(|&&p| p).count()
                + cfg.adc_0.enabled as usize
                + cfg.soft_pwm as usize
                + cfg.uart_0.enabled as usize
                + cfg.uart_1.enabled as usize;
            prop_assert_eq!(devices, expected);

            let timers = plan.iter().filter(|s| matches!(s, Step::Timer(_))).count();
            prop_assert_eq!(timers, cfg.timer_count());
        }
    }
}
