//! Bus transport trait definitions

use alloc::boxed::Box;

use crate::error::{Error, Result};

/// Lowest non-reserved 7-bit I2C address
pub const MIN_ADDRESS: u8 = 0x03;
/// Highest non-reserved 7-bit I2C address
pub const MAX_ADDRESS: u8 = 0x77;

/// Check that `addr` is a usable 7-bit device address
pub fn check_address(addr: u8) -> Result<()> {
    if (MIN_ADDRESS..=MAX_ADDRESS).contains(&addr) {
        Ok(())
    } else {
        Err(Error::InvalidAddress(addr))
    }
}

/// I2C master trait
///
/// This trait represents a bus adapter that can execute addressed
/// transactions against a device.
///
/// ## Transaction shapes
///
/// - `write` non-empty, `read` empty: a single write message
/// - `write` empty, `read` non-empty: a single bare read message
/// - both non-empty: a write message immediately followed by a read
///   message with a repeated start. The pair must reach the bus as one
///   combined transaction; nothing may be interleaved between them.
///
/// Implementations do not retry. A failed transfer is reported as
/// [`Error::BusTransaction`] and the caller decides what to do.
pub trait I2cMaster {
    /// Execute one transaction against the device at `addr`
    fn transact(&mut self, addr: u8, write: &[u8], read: &mut [u8]) -> Result<()>;

    /// Block for the specified number of milliseconds
    ///
    /// The bootloader needs real settle times between steps. Emulators may
    /// return immediately.
    fn delay_ms(&mut self, ms: u32);
}

impl<M: I2cMaster + ?Sized> I2cMaster for &mut M {
    fn transact(&mut self, addr: u8, write: &[u8], read: &mut [u8]) -> Result<()> {
        (**self).transact(addr, write, read)
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

// Blanket impl for boxed masters to allow trait objects
impl I2cMaster for Box<dyn I2cMaster + Send> {
    fn transact(&mut self, addr: u8, write: &[u8], read: &mut [u8]) -> Result<()> {
        (**self).transact(addr, write, read)
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}
