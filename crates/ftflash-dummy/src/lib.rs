//! ftflash-dummy - In-memory controller emulator for testing
//!
//! This crate provides a bus adapter that emulates an FT5x06-family touch
//! controller and its bootloader in memory. It's useful for testing and for
//! dry runs without real hardware. Faults can be injected to exercise the
//! retry and warning paths.

use ftflash_core::bus::I2cMaster;
use ftflash_core::chip::{self, ChipProfile, Quirks};
use ftflash_core::error::{Error, Result};
use ftflash_core::image::MAX_IMAGE_SIZE;
use ftflash_core::protocol::registers;
use ftflash_core::transfer::Checksum;

#[cfg(test)]
mod scenarios;

/// Configuration for the emulated controller
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Bus address the controller answers on
    pub address: u8,
    /// Value of the chip ID register
    pub chip_id: u8,
    /// Value of the firmware version register
    pub firmware_version: u8,
    /// Number of READ-ID requests answered with a wrong identity first
    pub failed_identifications: u32,
    /// Reply to the HID to I2C switch
    pub mode_switch_reply: [u8; 3],
    /// Report a checksum that does not match the received data
    pub corrupt_ecc: bool,
    /// Never report packets as programmed in the flash status register
    pub silent_status: bool,
    /// NACK every write that starts with this command byte
    pub nack_command: Option<u8>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            address: 0x38,
            chip_id: chip::FT5X06_ID,
            firmware_version: 0x10,
            failed_identifications: 0,
            mode_switch_reply: registers::HID_TO_I2C_ACK,
            corrupt_ecc: false,
            silent_status: false,
            nack_command: None,
        }
    }
}

impl DummyConfig {
    /// Emulate the controller with chip ID `chip_id`
    pub fn for_chip(chip_id: u8) -> Self {
        Self {
            chip_id,
            ..Default::default()
        }
    }
}

/// Operating mode of the emulated controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Running the touch application
    Application,
    /// 0xAA written to the reset register
    ResetArmed,
    /// Rebooted into the bootloader, waiting for the upgrade-entry sequence
    BootloaderEntry,
    /// In upgrade mode, accepting flash commands
    Upgrade,
}

/// Emulated touch controller
pub struct DummyController {
    config: DummyConfig,
    profile: Option<&'static ChipProfile>,
    flash: Vec<u8>,
    mode: Mode,
    hid_switched: bool,
    pending_read: Option<[u8; 3]>,
    identifications_left: u32,
    ecc: Checksum,
    status: u16,
    announced_len: Option<u32>,
    writes: Vec<Vec<u8>>,
    elapsed_ms: u64,
}

impl DummyController {
    /// Create a controller with blank (0xFF) flash
    pub fn new(config: DummyConfig) -> Self {
        let profile = chip::find_by_id(config.chip_id);
        let identifications_left = config.failed_identifications;
        Self {
            config,
            profile,
            flash: vec![0xff; MAX_IMAGE_SIZE],
            mode: Mode::Application,
            hid_switched: false,
            pending_read: None,
            identifications_left,
            ecc: Checksum::new(),
            status: 0,
            announced_len: None,
            writes: Vec::new(),
            elapsed_ms: 0,
        }
    }

    /// Create a controller whose flash starts with `firmware`
    pub fn with_firmware(config: DummyConfig, firmware: &[u8]) -> Self {
        let mut controller = Self::new(config);
        let len = core::cmp::min(firmware.len(), controller.flash.len());
        controller.flash[..len].copy_from_slice(&firmware[..len]);
        controller
    }

    /// Flash contents
    pub fn flash(&self) -> &[u8] {
        &self.flash
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Length announced with FW_LENGTH, if any
    pub fn announced_len(&self) -> Option<u32> {
        self.announced_len
    }

    /// Write phases of every transaction seen, in order
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Number of transactions whose write phase starts with `prefix`
    pub fn count_writes(&self, prefix: &[u8]) -> usize {
        self.writes.iter().filter(|w| w.starts_with(prefix)).count()
    }

    /// Total time spent in `delay_ms`
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    fn needs_mode_switch(&self) -> bool {
        self.profile
            .is_some_and(|p| p.has_quirk(Quirks::HID_TO_I2C))
    }

    fn boot_id(&self) -> [u8; 2] {
        self.profile.map_or([0xff, 0xff], |p| p.boot_id)
    }

    fn handle_write(&mut self, write: &[u8]) -> Result<()> {
        match (self.mode, write) {
            (_, [registers::RST_CMD, registers::UPGRADE_AA]) => {
                self.mode = Mode::ResetArmed;
            }
            (Mode::ResetArmed, [registers::RST_CMD, registers::UPGRADE_55]) => {
                log::trace!("dummy: rebooting into bootloader");
                self.mode = Mode::BootloaderEntry;
                self.hid_switched = false;
            }
            (Mode::BootloaderEntry, req) if req == registers::HID_TO_I2C_REQUEST => {
                self.hid_switched = true;
                self.pending_read = Some(self.config.mode_switch_reply);
            }
            (Mode::BootloaderEntry, req) if req == registers::UPGRADE_ENTRY => {
                self.mode = Mode::Upgrade;
                self.ecc = Checksum::new();
            }
            (Mode::Upgrade, [registers::ERASE_APP]) => {
                self.flash.fill(0xff);
            }
            (Mode::Upgrade, [registers::ERASE_PANEL]) => {}
            (Mode::Upgrade, [registers::FW_LENGTH, hi, mid, lo]) => {
                self.announced_len = Some(u32::from_be_bytes([0, *hi, *mid, *lo]));
            }
            (Mode::Upgrade, [registers::FW_START, 0x00, oh, ol, lh, ll, payload @ ..]) => {
                let offset = u16::from_be_bytes([*oh, *ol]) as usize;
                let len = u16::from_be_bytes([*lh, *ll]) as usize;
                if len != payload.len() || offset + len > self.flash.len() {
                    return Err(Error::BusTransaction);
                }
                self.flash[offset..offset + len].copy_from_slice(payload);
                self.ecc.update(payload);
                if !self.config.silent_status {
                    self.status = registers::FLASH_STATUS_PACKET_BASE + (offset / 128) as u16;
                }
            }
            (Mode::Upgrade, [registers::RESET_FW]) => {
                self.mode = Mode::Application;
            }
            (mode, other) => {
                log::debug!("dummy: unexpected write {:02x?} in {:?}", other, mode);
                return Err(Error::BusTransaction);
            }
        }
        Ok(())
    }

    fn handle_read(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        match (self.mode, write) {
            (Mode::Application, [reg]) => {
                let value = match *reg {
                    registers::ID_G_CIPHER => self.config.chip_id,
                    registers::ID_G_FIRMID => self.config.firmware_version,
                    _ => 0,
                };
                read.fill(value);
            }
            (Mode::BootloaderEntry, []) => {
                let reply = self.pending_read.take().ok_or(Error::BusTransaction)?;
                let n = core::cmp::min(read.len(), reply.len());
                read[..n].copy_from_slice(&reply[..n]);
            }
            (Mode::Upgrade, [registers::READ_ID, 0x00, 0x00, 0x00]) => {
                let id = if self.identifications_left > 0 {
                    self.identifications_left -= 1;
                    [0x00, 0x00]
                } else if self.needs_mode_switch() && !self.hid_switched {
                    [0xff, 0xff]
                } else {
                    self.boot_id()
                };
                let n = core::cmp::min(read.len(), 2);
                read[..n].copy_from_slice(&id[..n]);
            }
            (Mode::Upgrade, [registers::FLASH_STATUS]) => {
                let status = self.status.to_be_bytes();
                let n = core::cmp::min(read.len(), 2);
                read[..n].copy_from_slice(&status[..n]);
            }
            (Mode::Upgrade, [registers::ECC]) => {
                let mut ecc = self.ecc.value();
                if self.config.corrupt_ecc {
                    ecc ^= 0xff;
                }
                read.fill(ecc);
            }
            (Mode::Upgrade, [registers::FW_READ, 0x00, oh, ol]) => {
                let offset = u16::from_be_bytes([*oh, *ol]) as usize;
                for (i, byte) in read.iter_mut().enumerate() {
                    *byte = self.flash.get(offset + i).copied().unwrap_or(0xff);
                }
            }
            (mode, other) => {
                log::debug!("dummy: unexpected read {:02x?} in {:?}", other, mode);
                return Err(Error::BusTransaction);
            }
        }
        Ok(())
    }
}

impl I2cMaster for DummyController {
    fn transact(&mut self, addr: u8, write: &[u8], read: &mut [u8]) -> Result<()> {
        if write.is_empty() && read.is_empty() {
            return Err(Error::InvalidParameter);
        }
        self.writes.push(write.to_vec());

        if addr != self.config.address {
            return Err(Error::BusTransaction);
        }
        if let (Some(cmd), Some(first)) = (self.config.nack_command, write.first()) {
            if cmd == *first {
                return Err(Error::BusTransaction);
            }
        }

        if read.is_empty() {
            self.handle_write(write)
        } else {
            self.handle_read(write, read)
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        // No delay needed for in-memory operations
        self.elapsed_ms += u64::from(ms);
    }
}
