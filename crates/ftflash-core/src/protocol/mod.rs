//! Register-level protocol helpers
//!
//! `registers` holds the register map of the controller (documented and
//! bootloader-only). `access` implements single-register reads and writes
//! on top of [`I2cMaster`](crate::bus::I2cMaster).

pub mod access;
pub mod registers;

pub use access::*;
