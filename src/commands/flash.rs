//! Flash command

use crate::error::ToolError;
use ftflash_core::bus::I2cMaster;
use ftflash_core::{
    flash_firmware, DeviceSession, FirmwareImage, HandshakeConfig, UpdateProgress, UpdateReport,
};
use std::path::Path;

/// Read file contents into a firmware image
fn read_image(path: &Path) -> Result<FirmwareImage, ToolError> {
    let data = std::fs::read(path).map_err(|e| ToolError::file(path, e))?;
    println!("Read {} bytes from {:?}", data.len(), path);
    Ok(FirmwareImage::new(data)?)
}

/// Flash the firmware in `input` into the controller
///
/// The new firmware version is read back afterwards. Failing to read it is
/// logged and does not fail the command, the update itself has been
/// verified by then.
pub fn run_flash<M, P>(
    session: &mut DeviceSession<M>,
    input: &Path,
    config: &HandshakeConfig,
    progress: &mut P,
) -> Result<UpdateReport, ToolError>
where
    M: I2cMaster,
    P: UpdateProgress + ?Sized,
{
    let image = read_image(input)?;
    let old_version = session.firmware_version();

    let report = flash_firmware(session, &image, config, progress)?;

    println!(
        "Flashed {} bytes in {} packets to {} (checksum 0x{:02x}, {} handshake attempt(s))",
        report.bytes_written,
        report.packets,
        report.chip.name,
        report.checksum,
        report.handshake_attempts
    );

    match session.refresh_firmware_version() {
        Ok(version) => println!("Firmware version: {}.0.0 (was {}.0.0)", version, old_version),
        Err(e) => log::warn!("Could not read the new firmware version: {}", e),
    }

    Ok(report)
}
