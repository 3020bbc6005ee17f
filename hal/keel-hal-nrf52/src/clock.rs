//! Clock sources
//!
//! The PDK carries a 32 MHz crystal for HFCLK and a 32.768 kHz crystal for
//! LFCLK. The runtime's chip init starts whatever is selected here, so the
//! firmware hands this to it before bring-up runs.

/// High-frequency clock source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HfclkSource {
    /// HFINT, the internal RC oscillator
    Internal,
    /// HFXO, 32 MHz crystal
    ExternalXtal,
}

/// Low-frequency clock source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LfclkSource {
    /// LFRC
    InternalRc,
    /// Derived from HFCLK
    Synthesized,
    /// LFXO, 32.768 kHz crystal
    ExternalXtal,
}

/// Clock sources started at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    pub hfclk: HfclkSource,
    pub lfclk: LfclkSource,
}

impl ClockConfig {
    /// Both crystals, as fitted on the PDK
    pub const NRF52840PDK: Self = Self {
        hfclk: HfclkSource::ExternalXtal,
        lfclk: LfclkSource::ExternalXtal,
    };
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::NRF52840PDK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdk_runs_on_crystals() {
        let clocks = ClockConfig::default();
        assert_eq!(clocks.hfclk, HfclkSource::ExternalXtal);
        assert_eq!(clocks.lfclk, LfclkSource::ExternalXtal);
    }
}
