//! ftflash-core - Firmware update protocol for FT5x06-family controllers
//!
//! This crate drives the undocumented bootloader of FocalTech FT5x06,
//! FT5x16 and FT5x26 capacitive touch controllers over I2C: identify the
//! chip, enter the bootloader, erase, program in 128-byte packets, verify
//! the device checksum and reset. It can also dump the current firmware.
//!
//! It is `no_std` (with `alloc`); the bus is reached through the
//! [`I2cMaster`](bus::I2cMaster) trait.
//!
//! # Features
//!
//! - `std` - Implement `std::error::Error` for [`Error`]
//!
//! # Example
//!
//! ```ignore
//! use ftflash_core::{flash_firmware, DeviceSession, FirmwareImage, HandshakeConfig, NoProgress};
//!
//! fn update<M: ftflash_core::bus::I2cMaster>(bus: M, data: Vec<u8>) -> ftflash_core::Result<()> {
//!     let mut session = DeviceSession::open(bus, 0x38, None)?;
//!     let image = FirmwareImage::new(data)?;
//!     let report = flash_firmware(&mut session, &image, &HandshakeConfig::default(), &mut NoProgress)?;
//!     println!("ECC {:02x} over {} packets", report.checksum, report.packets);
//!     Ok(())
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod bus;
pub mod chip;
pub mod error;
pub mod handshake;
pub mod image;
pub mod protocol;
pub mod readback;
pub mod session;
pub mod transfer;
pub mod update;

#[cfg(test)]
mod testing;

pub use error::{Error, Result, Warning};
pub use handshake::HandshakeConfig;
pub use image::FirmwareImage;
pub use readback::{read_firmware, ReadbackReport};
pub use session::DeviceSession;
pub use update::{flash_firmware, NoProgress, UpdateProgress, UpdateReport};
