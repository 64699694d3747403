//! Error types for ftflash-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate, plus the non-fatal [`Warning`] kind that the
//! bootloader protocol tolerates.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Bus errors
    /// A bus transaction failed (NACK, arbitration loss, adapter error)
    BusTransaction,
    /// Device address is not a valid 7-bit address
    InvalidAddress(u8),
    /// A transaction was requested with neither write nor read data
    InvalidParameter,

    // Chip errors
    /// Chip identifier is not in the profile table
    UnsupportedChip(u8),

    // Protocol errors
    /// Bootloader never answered with the expected identity
    HandshakeExhausted {
        /// Number of reset cycles attempted
        attempts: u32,
    },
    /// Device-reported checksum does not match the transmitted data
    ChecksumMismatch {
        /// Value read back from the ECC register
        device: u8,
        /// Value accumulated while sending packets
        host: u8,
    },

    // Image errors
    /// Firmware image is smaller than 8 bytes or larger than 64 KiB
    ImageSize {
        /// Rejected image length
        len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusTransaction => write!(f, "bus transaction failed"),
            Self::InvalidAddress(addr) => write!(f, "invalid 7-bit device address 0x{:02x}", addr),
            Self::InvalidParameter => write!(f, "empty bus transaction"),
            Self::UnsupportedChip(id) => write!(f, "unsupported chip ID 0x{:02x}", id),
            Self::HandshakeExhausted { attempts } => {
                write!(f, "bootloader did not identify after {} attempts", attempts)
            }
            Self::ChecksumMismatch { device, host } => write!(
                f,
                "ECC error: device reports 0x{:02x}, expected 0x{:02x}",
                device, host
            ),
            Self::ImageSize { len } => write!(
                f,
                "firmware image is {} bytes (must be {} to {} bytes)",
                len,
                crate::image::MIN_IMAGE_SIZE,
                crate::image::MAX_IMAGE_SIZE
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

/// Conditions the bootloader protocol tolerates
///
/// These are reported and logged but never abort an operation. Keeping them
/// out of [`Error`] means a caller can't mistake a missed progress poll for
/// a failed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// The HID-to-I2C mode switch answered with an unexpected sequence
    ModeSwitchMismatch {
        /// The three bytes returned by the controller
        response: [u8; 3],
    },
    /// The HID-to-I2C mode switch exchange failed on the bus
    ModeSwitchBusError,
    /// Flash status never reported the packet as written
    FlashStatusTimeout {
        /// Index of the packet (offset / 128)
        packet: u16,
        /// Last status value read, if any read succeeded
        last_status: Option<u16>,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeSwitchMismatch { response } => write!(
                f,
                "HID to I2C switch returned {:02x} {:02x} {:02x}",
                response[0], response[1], response[2]
            ),
            Self::ModeSwitchBusError => write!(f, "HID to I2C switch failed on the bus"),
            Self::FlashStatusTimeout {
                packet,
                last_status: Some(status),
            } => write!(
                f,
                "flash status for packet {} not confirmed (last 0x{:04x})",
                packet, status
            ),
            Self::FlashStatusTimeout {
                packet,
                last_status: None,
            } => write!(f, "flash status for packet {} not readable", packet),
        }
    }
}
