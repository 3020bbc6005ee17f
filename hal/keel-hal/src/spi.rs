//! Polled SPI master transfers
//!
//! Register-level, busy-waiting byte exchange for code that needs the bus
//! before (or instead of) the interrupt-driven SPI driver. The protocol is
//! address-prefixed: the first byte selects a register on the slave, every
//! following byte is data. Slave select is a plain GPIO handled by the
//! caller around each transfer.
//!
//! # Pipeline
//!
//! The bus is full duplex and the controller raises one READY event per
//! byte shifted, in both directions. TXD is double buffered, so the
//! address byte and the first data (or dummy) byte are queued back to
//! back, and every received byte answers the byte sent *before* it:
//!
//! ```text
//! TXD:   addr   d0     d1    ...   dN-1
//! RXD:          r(addr) r(d0) ...  r(dN-2)  r(dN-1)   <- trailing drain
//! ```
//!
//! A transfer of `N` bytes therefore sees `N + 1` READY events.

/// Register interface of a polled SPI master
///
/// Implemented by chip crates on top of the memory-mapped register block.
pub trait SpiRegisters {
    /// Queue a byte in the transmit register
    fn write_txd(&mut self, byte: u8);

    /// Read the receive register
    fn read_rxd(&mut self) -> u8;

    /// Check the READY event flag
    fn event_ready(&mut self) -> bool;

    /// Clear the READY event flag
    fn clear_event_ready(&mut self);
}

/// Errors from polled SPI transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PolledSpiError {
    /// READY never fired within the configured spin limit
    ///
    /// The controller is left mid-transfer; the caller must reset it
    /// before the next use.
    Timeout,
}

/// Polled SPI master
///
/// Owns the register block for its lifetime, so two transfers can never
/// interleave on the same controller. Not safe to mix with the
/// interrupt-driven driver on the same instance.
///
/// By default every wait on READY is unbounded: a slave that never
/// clocks back hangs the caller. [`PolledSpi::with_spin_limit`] bounds
/// the wait instead.
pub struct PolledSpi<R> {
    regs: R,
    spin_limit: Option<u32>,
}

impl<R: SpiRegisters> PolledSpi<R> {
    /// Create a polled master with unbounded waits
    pub fn new(regs: R) -> Self {
        Self {
            regs,
            spin_limit: None,
        }
    }

    /// Bound every READY wait to `limit` polls of the event flag
    pub fn with_spin_limit(mut self, limit: u32) -> Self {
        self.spin_limit = Some(limit.max(1));
        self
    }

    /// Current spin limit (`None` = wait forever)
    pub fn spin_limit(&self) -> Option<u32> {
        self.spin_limit
    }

    /// Give the register block back
    pub fn release(self) -> R {
        self.regs
    }

    /// Write `data` to the register at `addr`
    ///
    /// Sends `addr` followed by every byte of `data`. Received bytes are
    /// drained and discarded. Does nothing for empty `data`.
    pub fn write_buf(&mut self, addr: u8, data: &[u8]) -> Result<(), PolledSpiError> {
        if data.is_empty() {
            return Ok(());
        }

        self.regs.clear_event_ready();
        self.regs.write_txd(addr);

        for &byte in data {
            self.regs.write_txd(byte);
            self.drain()?;
        }

        // Shift of the last data byte
        self.drain()?;
        Ok(())
    }

    /// Read `buf.len()` bytes from the register at `addr`
    ///
    /// Sends `addr` and then one dummy zero byte per byte to read. The
    /// byte received while the address went out is discarded. Does
    /// nothing for an empty `buf`.
    pub fn read_buf(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), PolledSpiError> {
        let Some(last) = buf.len().checked_sub(1) else {
            return Ok(());
        };

        self.regs.clear_event_ready();
        self.regs.write_txd(addr);

        // Answer to the address byte
        self.regs.write_txd(0);
        self.drain()?;

        for slot in &mut buf[..last] {
            self.regs.write_txd(0);
            *slot = self.drain()?;
        }

        buf[last] = self.drain()?;
        Ok(())
    }

    /// Wait for READY, consume the event and return the received byte
    fn drain(&mut self) -> Result<u8, PolledSpiError> {
        self.wait_ready()?;
        self.regs.clear_event_ready();
        Ok(self.regs.read_rxd())
    }

    fn wait_ready(&mut self) -> Result<(), PolledSpiError> {
        match self.spin_limit {
            None => {
                while !self.regs.event_ready() {
                    core::hint::spin_loop();
                }
                Ok(())
            }
            Some(limit) => {
                for _ in 0..limit {
                    if self.regs.event_ready() {
                        return Ok(());
                    }
                    core::hint::spin_loop();
                }
                Err(PolledSpiError::Timeout)
            }
        }
    }
}
