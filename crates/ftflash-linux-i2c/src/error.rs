//! Error types for Linux I2C operations

use thiserror::Error;

/// Linux I2C specific errors
#[derive(Debug, Error)]
pub enum LinuxI2cError {
    /// Failed to open device
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to claim the device address
    #[error("Failed to set slave address 0x{addr:02x}: {source}")]
    SetAddressFailed {
        addr: u8,
        #[source]
        source: std::io::Error,
    },

    /// I2C transfer failed
    #[error("I2C transfer failed: {0}")]
    TransferFailed(#[source] std::io::Error),

    /// A single message exceeds the kernel's 16-bit length field
    #[error("I2C message of {0} bytes is too long")]
    MessageTooLong(usize),

    /// Transaction with neither write nor read data
    #[error("Empty I2C transaction")]
    EmptyTransaction,

    /// Device not specified
    #[error("No device specified. Use /dev/i2c-N or a bus number")]
    NoDevice,
}

/// Result type for Linux I2C operations
pub type Result<T> = std::result::Result<T, LinuxI2cError>;
