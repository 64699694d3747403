//! Firmware readback
//!
//! Dumps the whole 64 KiB flash window. The controller does not report the
//! size of the installed firmware, so bytes past its end are whatever the
//! flash holds there.

use alloc::vec::Vec;

use crate::bus::I2cMaster;
use crate::error::{Result, Warning};
use crate::handshake::{enter_bootloader, HandshakeConfig};
use crate::image::{FirmwareImage, MAX_IMAGE_SIZE};
use crate::session::DeviceSession;
use crate::transfer::read_packets;
use crate::update::{reset_to_application, UpdateProgress};

/// Result of a completed readback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadbackReport {
    /// Contents of the flash window
    pub image: FirmwareImage,
    /// Handshake attempts used
    pub handshake_attempts: u32,
    /// Tolerated problems, in the order they happened
    pub warnings: Vec<Warning>,
}

/// Read the firmware currently in the controller of `session`
pub fn read_firmware<M, P>(
    session: &mut DeviceSession<M>,
    config: &HandshakeConfig,
    progress: &mut P,
) -> Result<ReadbackReport>
where
    M: I2cMaster,
    P: UpdateProgress + ?Sized,
{
    let chip = session.chip();
    let (master, addr) = session.bus();

    let outcome = enter_bootloader(master, addr, chip, config, progress)?;

    log::info!("Read the FW from flash");
    let data = read_packets(master, addr, MAX_IMAGE_SIZE, progress)?;

    log::info!("Reset the new FW");
    reset_to_application(master, addr)?;
    progress.complete();

    Ok(ReadbackReport {
        image: FirmwareImage::from_readback(data),
        handshake_attempts: outcome.attempts,
        warnings: outcome.warnings,
    })
}
