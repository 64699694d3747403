//! Firmware update orchestration
//!
//! An update is a fixed sequence of [`UpdateStep`]s. Any failing step ends
//! the update with its error. There is no rollback: once the erase step has
//! run, a failed update leaves the controller in its bootloader without a
//! valid application, and the only recovery is to run the update again.

mod progress;

pub use progress::*;

use alloc::vec::Vec;

use crate::bus::I2cMaster;
use crate::chip::ChipProfile;
use crate::error::{Result, Warning};
use crate::handshake::{enter_bootloader, HandshakeConfig};
use crate::image::FirmwareImage;
use crate::protocol::{registers, write_command};
use crate::session::DeviceSession;
use crate::transfer::{verify_checksum, write_packets};

/// Settle time between the last packet and the checksum read, in ms
pub const SETTLE_DELAY_MS: u32 = 50;
/// Settle time after resetting into the new firmware, in ms
pub const RESET_DELAY_MS: u32 = 100;

/// One step of a firmware update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    /// Reset into the bootloader and check its identity
    Handshake,
    /// Erase the application (and panel area where the profile says so)
    Erase,
    /// Tell the bootloader how many bytes follow
    AnnounceLength,
    /// Send the image as write packets
    Transfer,
    /// Give the bootloader time to finish programming
    Settle,
    /// Compare checksums
    Verify,
    /// Restart into the application
    Reset,
}

impl UpdateStep {
    /// Steps of a firmware update, in order
    pub const SEQUENCE: [UpdateStep; 7] = [
        UpdateStep::Handshake,
        UpdateStep::Erase,
        UpdateStep::AnnounceLength,
        UpdateStep::Transfer,
        UpdateStep::Settle,
        UpdateStep::Verify,
        UpdateStep::Reset,
    ];

    /// Short description for logs
    pub const fn description(self) -> &'static str {
        match self {
            UpdateStep::Handshake => "Enter bootloader",
            UpdateStep::Erase => "Erase current app",
            UpdateStep::AnnounceLength => "Announce firmware length",
            UpdateStep::Transfer => "Write firmware to CTPM flash",
            UpdateStep::Settle => "Wait for flash to settle",
            UpdateStep::Verify => "Verify checksum",
            UpdateStep::Reset => "Reset the new FW",
        }
    }
}

/// Summary of a completed update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Profile used for the update
    pub chip: &'static ChipProfile,
    /// Image bytes written
    pub bytes_written: usize,
    /// Write packets sent
    pub packets: usize,
    /// Checksum agreed by host and device
    pub checksum: u8,
    /// Handshake attempts used
    pub handshake_attempts: u32,
    /// Tolerated problems, in the order they happened
    pub warnings: Vec<Warning>,
}

/// Flash `image` into the controller of `session`
pub fn flash_firmware<M, P>(
    session: &mut DeviceSession<M>,
    image: &FirmwareImage,
    config: &HandshakeConfig,
    progress: &mut P,
) -> Result<UpdateReport>
where
    M: I2cMaster,
    P: UpdateProgress + ?Sized,
{
    let chip = session.chip();
    let (master, addr) = session.bus();
    let data = image.as_bytes();

    let mut report = UpdateReport {
        chip,
        bytes_written: 0,
        packets: 0,
        checksum: 0,
        handshake_attempts: 0,
        warnings: Vec::new(),
    };

    for step in UpdateStep::SEQUENCE {
        log::info!("{}", step.description());
        match step {
            UpdateStep::Handshake => {
                let outcome = enter_bootloader(master, addr, chip, config, progress)?;
                report.handshake_attempts = outcome.attempts;
                report.warnings.extend(outcome.warnings);
            }
            UpdateStep::Erase => {
                progress.erasing(chip.delay_erase_ms);
                for erase in chip.erase_steps() {
                    log::debug!("Erase command 0x{:02x} ({:?})", erase.command(), erase);
                    write_command(master, addr, erase.command())?;
                }
                master.delay_ms(chip.delay_erase_ms);
            }
            UpdateStep::AnnounceLength => {
                let [_, len_hi, len_mid, len_lo] = (data.len() as u32).to_be_bytes();
                master.transact(addr, &[registers::FW_LENGTH, len_hi, len_mid, len_lo], &mut [])?;
            }
            UpdateStep::Transfer => {
                let state = write_packets(master, addr, data, progress, &mut report.warnings)?;
                report.bytes_written = state.offset();
                report.packets = state.packets();
                report.checksum = state.checksum();
            }
            UpdateStep::Settle => master.delay_ms(SETTLE_DELAY_MS),
            UpdateStep::Verify => {
                progress.verifying();
                verify_checksum(master, addr, report.checksum)?;
            }
            UpdateStep::Reset => reset_to_application(master, addr)?,
        }
    }

    progress.complete();
    Ok(report)
}

/// Leave the bootloader and start the application firmware
pub fn reset_to_application<M: I2cMaster + ?Sized>(master: &mut M, addr: u8) -> Result<()> {
    write_command(master, addr, registers::RESET_FW)?;
    master.delay_ms(RESET_DELAY_MS);
    Ok(())
}
