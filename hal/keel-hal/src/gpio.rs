//! GPIO pin identifiers
//!
//! Bring-up never drives pins itself; it only hands pin assignments to
//! the drivers. A pin is therefore just a validated number.

/// Abstract pin identifier
///
/// On the nRF52840 pins are numbered `port * 32 + pin`, so P1.02 is 34.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(pub u8);

impl Pin {
    /// Create a pin from its absolute number
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// Create a pin from port and pin-in-port
    pub const fn from_port(port: u8, pin: u8) -> Self {
        Self(port * 32 + pin)
    }

    /// Absolute pin number
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Port this pin belongs to
    pub const fn port(self) -> u8 {
        self.0 / 32
    }

    /// Pin index within its port
    pub const fn pin(self) -> u8 {
        self.0 % 32
    }

    /// Convert an optional raw pin number
    ///
    /// Only a negative value means "not connected". A value that does not
    /// fit a pin number is handed back as the error.
    pub fn optional(raw: i16) -> Result<Option<Self>, i16> {
        if raw < 0 {
            return Ok(None);
        }
        u8::try_from(raw).map(|n| Some(Self(n))).map_err(|_| raw)
    }
}

impl From<u8> for Pin {
    fn from(number: u8) -> Self {
        Self(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_split() {
        let pin = Pin::from_port(1, 2);
        assert_eq!(pin.number(), 34);
        assert_eq!(pin.port(), 1);
        assert_eq!(pin.pin(), 2);

        let p0 = Pin::new(6);
        assert_eq!(p0.port(), 0);
        assert_eq!(p0.pin(), 6);
    }

    #[test]
    fn test_optional_pin() {
        assert_eq!(Pin::optional(-1), Ok(None));
        assert_eq!(Pin::optional(i16::MIN), Ok(None));
        assert_eq!(Pin::optional(5), Ok(Some(Pin(5))));
        assert_eq!(Pin::optional(255), Ok(Some(Pin(255))));
        // Out of range is an error, never "not connected"
        assert_eq!(Pin::optional(300), Err(300));
    }
}
