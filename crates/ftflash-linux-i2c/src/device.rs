//! Linux I2C device implementation
//!
//! This module provides the `LinuxI2c` struct that implements the
//! `I2cMaster` trait using Linux's i2c-dev interface.

use crate::error::{LinuxI2cError, Result};

use ftflash_core::bus::I2cMaster;
use ftflash_core::error::{Error as CoreError, Result as CoreResult};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// Linux i2c-dev ioctl constants
mod ioctl {
    use nix::{ioctl_write_int_bad, ioctl_write_ptr_bad};

    /// Use this slave address
    const I2C_SLAVE: u16 = 0x0703;
    /// Use this slave address, even if it is already in use by a driver
    const I2C_SLAVE_FORCE: u16 = 0x0706;
    /// Combined R/W transfer (one STOP only)
    const I2C_RDWR: u16 = 0x0707;

    /// Message flag: read data, from slave to master
    pub const I2C_M_RD: u16 = 0x0001;

    /// Kernel `struct i2c_msg`
    #[repr(C)]
    #[derive(Debug)]
    pub struct I2cMsg {
        pub addr: u16,
        pub flags: u16,
        pub len: u16,
        pub buf: *mut u8,
    }

    /// Kernel `struct i2c_rdwr_ioctl_data`
    #[repr(C)]
    #[derive(Debug)]
    pub struct I2cRdwrIoctlData {
        pub msgs: *mut I2cMsg,
        pub nmsgs: u32,
    }

    ioctl_write_int_bad!(i2c_slave, I2C_SLAVE);
    ioctl_write_int_bad!(i2c_slave_force, I2C_SLAVE_FORCE);
    ioctl_write_ptr_bad!(i2c_rdwr, I2C_RDWR, I2cRdwrIoctlData);
}

/// Configuration for opening a Linux I2C adapter
#[derive(Debug, Clone)]
pub struct LinuxI2cConfig {
    /// Device path (e.g., "/dev/i2c-2")
    pub device: String,
    /// Claim addresses even when a kernel driver is bound to them
    pub force: bool,
}

impl Default for LinuxI2cConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            force: true,
        }
    }
}

impl LinuxI2cConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Create a configuration for `/dev/i2c-<bus>`
    pub fn for_bus(bus: u32) -> Self {
        Self::new(format!("/dev/i2c-{}", bus))
    }

    /// Set whether addresses are claimed with I2C_SLAVE_FORCE
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Linux I2C adapter using the i2c-dev interface
///
/// Every transaction goes through I2C_RDWR, so a write followed by a read
/// is issued as one combined transfer with a repeated start.
pub struct LinuxI2c {
    /// File handle for the i2c-dev node
    file: File,
    /// Whether addresses are claimed with I2C_SLAVE_FORCE
    force: bool,
}

impl LinuxI2c {
    /// Open a Linux I2C adapter with the given configuration
    pub fn open(config: &LinuxI2cConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxI2cError::NoDevice);
        }

        log::info!("Opening {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxI2cError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        Ok(Self {
            file,
            force: config.force,
        })
    }

    /// Open `/dev/i2c-<bus>` with default settings
    pub fn open_bus(bus: u32) -> Result<Self> {
        Self::open(&LinuxI2cConfig::for_bus(bus))
    }

    /// Claim `addr` on this adapter
    ///
    /// I2C_RDWR carries the address in every message, but claiming it first
    /// makes a missing or busy device fail here with a clear error.
    pub fn set_address(&mut self, addr: u8) -> Result<()> {
        log::info!("Setting addr to {:#04x}", addr);
        let fd = self.file.as_raw_fd();
        let ret = unsafe {
            if self.force {
                ioctl::i2c_slave_force(fd, libc::c_int::from(addr))
            } else {
                ioctl::i2c_slave(fd, libc::c_int::from(addr))
            }
        };
        ret.map_err(|e| LinuxI2cError::SetAddressFailed {
            addr,
            source: std::io::Error::from_raw_os_error(e as i32),
        })?;
        Ok(())
    }

    /// Perform one I2C_RDWR transaction
    fn rdwr(&mut self, addr: u8, write: &[u8], read: &mut [u8]) -> Result<()> {
        check_message_len(write.len())?;
        check_message_len(read.len())?;

        let mut msgs = Vec::with_capacity(2);
        if !write.is_empty() {
            msgs.push(ioctl::I2cMsg {
                addr: u16::from(addr),
                flags: 0,
                len: write.len() as u16,
                // The kernel only reads from write buffers
                buf: write.as_ptr() as *mut u8,
            });
        }
        if !read.is_empty() {
            msgs.push(ioctl::I2cMsg {
                addr: u16::from(addr),
                flags: ioctl::I2C_M_RD,
                len: read.len() as u16,
                buf: read.as_mut_ptr(),
            });
        }
        if msgs.is_empty() {
            return Err(LinuxI2cError::EmptyTransaction);
        }

        let data = ioctl::I2cRdwrIoctlData {
            msgs: msgs.as_mut_ptr(),
            nmsgs: msgs.len() as u32,
        };

        let fd = self.file.as_raw_fd();
        unsafe { ioctl::i2c_rdwr(fd, &data) }.map_err(|e| {
            LinuxI2cError::TransferFailed(std::io::Error::from_raw_os_error(e as i32))
        })?;

        Ok(())
    }
}

impl I2cMaster for LinuxI2c {
    fn transact(&mut self, addr: u8, write: &[u8], read: &mut [u8]) -> CoreResult<()> {
        self.rdwr(addr, write, read).map_err(|e| {
            log::debug!("linux_i2c: {}", e);
            match e {
                LinuxI2cError::EmptyTransaction => CoreError::InvalidParameter,
                _ => CoreError::BusTransaction,
            }
        })
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

/// Check that a message fits the kernel's 16-bit length field
pub fn check_message_len(len: usize) -> Result<()> {
    if len > usize::from(u16::MAX) {
        return Err(LinuxI2cError::MessageTooLong(len));
    }
    Ok(())
}
