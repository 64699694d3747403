//! ftflash-linux-i2c - Linux i2c-dev support
//!
//! This crate provides access to touch controllers through the
//! `/dev/i2c-N` character devices.
//!
//! # Example
//!
//! ```no_run
//! use ftflash_linux_i2c::{LinuxI2c, LinuxI2cConfig};
//! use ftflash_core::protocol::{read_register, registers};
//!
//! let mut i2c = LinuxI2c::open(&LinuxI2cConfig::for_bus(2))?;
//! i2c.set_address(0x38)?;
//!
//! let chip_id = read_register(&mut i2c, 0x38, registers::ID_G_CIPHER)?;
//! println!("Chip ID: {:#04x}", chip_id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with i2c-dev support (`CONFIG_I2C_CHARDEV`)
//! - Read/write access to `/dev/i2c-N`
//! - The touchscreen kernel driver may hold the address; addresses are
//!   claimed with I2C_SLAVE_FORCE by default

pub mod device;
pub mod error;

// Re-exports
pub use device::{LinuxI2c, LinuxI2cConfig};
pub use error::{LinuxI2cError, Result};

/// Open `/dev/i2c-<bus>`, claim `addr` and return a boxed I2cMaster
pub fn open_linux_i2c(
    bus: u32,
    addr: u8,
) -> Result<Box<dyn ftflash_core::bus::I2cMaster + Send>> {
    let mut i2c = LinuxI2c::open_bus(bus)?;
    i2c.set_address(addr)?;
    Ok(Box::new(i2c))
}
