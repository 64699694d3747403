//! Device session
//!
//! A [`DeviceSession`] owns the bus for one addressed controller and the
//! profile selected for it. It is created once per run, after the bus is
//! open, and every protocol operation goes through it.

use crate::bus::{check_address, I2cMaster};
use crate::chip::{self, ChipProfile};
use crate::error::{Error, Result};
use crate::protocol::{read_register, registers};

/// One open connection to one controller
pub struct DeviceSession<M: I2cMaster> {
    master: M,
    address: u8,
    chip: &'static ChipProfile,
    firmware_version: u8,
}

impl<M: I2cMaster> DeviceSession<M> {
    /// Identify the controller at `address` and open a session
    ///
    /// When `forced_chip_id` is given the ID register is not read. The
    /// firmware version is always read, so a controller that does not
    /// answer fails here, before anything is written to it.
    pub fn open(mut master: M, address: u8, forced_chip_id: Option<u8>) -> Result<Self> {
        check_address(address)?;

        let chip_id = match forced_chip_id {
            Some(id) => {
                log::info!("Using forced chip ID 0x{:02x}", id);
                id
            }
            None => read_register(&mut master, address, registers::ID_G_CIPHER)?,
        };

        let chip = chip::find_by_id(chip_id).ok_or(Error::UnsupportedChip(chip_id))?;
        log::info!("Chip ID: 0x{:02x} ({})", chip.chip_id, chip.name);

        let firmware_version = read_register(&mut master, address, registers::ID_G_FIRMID)?;
        log::info!("Firmware version: {}.0.0", firmware_version);

        Ok(Self {
            master,
            address,
            chip,
            firmware_version,
        })
    }

    /// Profile of the attached controller
    pub fn chip(&self) -> &'static ChipProfile {
        self.chip
    }

    /// 7-bit device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Firmware version read when the session was opened (or last refreshed)
    pub fn firmware_version(&self) -> u8 {
        self.firmware_version
    }

    /// Re-read the firmware version, e.g. after an update
    pub fn refresh_firmware_version(&mut self) -> Result<u8> {
        self.firmware_version =
            read_register(&mut self.master, self.address, registers::ID_G_FIRMID)?;
        Ok(self.firmware_version)
    }

    /// Borrow the bus adapter
    pub fn master_mut(&mut self) -> &mut M {
        &mut self.master
    }

    /// Bus adapter and device address, borrowed together
    pub(crate) fn bus(&mut self) -> (&mut M, u8) {
        (&mut self.master, self.address)
    }

    /// Close the session and return the bus adapter
    pub fn into_inner(self) -> M {
        self.master
    }
}
