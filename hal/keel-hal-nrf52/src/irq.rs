//! Interrupt numbers and priority policy
//!
//! nRF52840 implements 3 NVIC priority bits, so priorities run from 0
//! (highest) to 7 (lowest).

/// Interrupt numbers (IRQn) of the nRF52840
pub mod irqn {
    pub const POWER_CLOCK: i16 = 0;
    pub const RADIO: i16 = 1;
    pub const UARTE0: i16 = 2;
    /// SPIM0 / SPIS0 / TWIM0 / TWIS0 / SPI0 / TWI0
    pub const SERIAL0: i16 = 3;
    /// SPIM1 / SPIS1 / TWIM1 / TWIS1 / SPI1 / TWI1
    pub const SERIAL1: i16 = 4;
    pub const GPIOTE: i16 = 6;
    pub const SAADC: i16 = 7;
    pub const TIMER0: i16 = 8;
    pub const TIMER1: i16 = 9;
    pub const TIMER2: i16 = 10;
    pub const RTC0: i16 = 11;
    pub const RTC1: i16 = 17;
    pub const TIMER3: i16 = 26;
    pub const TIMER4: i16 = 27;
    pub const PWM0: i16 = 28;
    pub const PWM1: i16 = 33;
    pub const PWM2: i16 = 34;
    pub const SPIM2: i16 = 35;
    pub const UARTE1: i16 = 40;
    pub const PWM3: i16 = 45;
}

/// Numerically lowest, i.e. most urgent, NVIC priority
pub const HIGHEST_PRIORITY: u32 = 0;

/// Lowest NVIC priority
pub const LOWEST_PRIORITY: u32 = (1 << NVIC_PRIO_BITS) - 1;

/// Implemented NVIC priority bits
pub const NVIC_PRIO_BITS: u32 = 3;

/// Effective priority for an interrupt
///
/// The radio always pre-empts everything else; every other interrupt
/// keeps the priority it asked for.
pub fn resolve_priority(irq: i16, requested: u32) -> u32 {
    match irq {
        irqn::RADIO => HIGHEST_PRIORITY,
        _ => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_radio_pinned() {
        assert_eq!(resolve_priority(irqn::RADIO, LOWEST_PRIORITY), 0);
        assert_eq!(resolve_priority(irqn::RADIO, 0), 0);
    }

    #[test]
    fn test_others_pass_through() {
        assert_eq!(resolve_priority(irqn::SAADC, 5), 5);
        assert_eq!(resolve_priority(irqn::UARTE0, 0), 0);
        // Core exceptions have negative numbers
        assert_eq!(resolve_priority(-1, 3), 3);
    }

    proptest! {
        #[test]
        fn prop_radio_ignores_request(requested in any::<u32>()) {
            prop_assert_eq!(resolve_priority(irqn::RADIO, requested), HIGHEST_PRIORITY);
        }

        #[test]
        fn prop_pass_through(irq in any::<i16>(), requested in any::<u32>()) {
            prop_assume!(irq != irqn::RADIO);
            prop_assert_eq!(resolve_priority(irq, requested), requested);
        }
    }
}
