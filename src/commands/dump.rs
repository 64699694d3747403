//! Dump command

use crate::error::ToolError;
use ftflash_core::bus::I2cMaster;
use ftflash_core::{read_firmware, DeviceSession, HandshakeConfig, ReadbackReport, UpdateProgress};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Read the controller firmware and write it to `output`
///
/// The file is created before the controller is touched, so an unwritable
/// path fails without resetting the device. It is removed again when the
/// readback fails, so no empty dump is left behind.
pub fn run_dump<M, P>(
    session: &mut DeviceSession<M>,
    output: &Path,
    config: &HandshakeConfig,
    progress: &mut P,
) -> Result<ReadbackReport, ToolError>
where
    M: I2cMaster,
    P: UpdateProgress + ?Sized,
{
    let mut file = File::create(output).map_err(|e| ToolError::file(output, e))?;

    let report = match read_firmware(session, config, progress) {
        Ok(report) => report,
        Err(e) => {
            drop(file);
            if let Err(rm) = std::fs::remove_file(output) {
                log::warn!("Could not remove {:?}: {}", output, rm);
            }
            return Err(e.into());
        }
    };

    let image = &report.image;
    file.write_all(image.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| ToolError::file(output, e))?;
    println!(
        "Wrote {} bytes to {:?} (checksum 0x{:02x})",
        image.len(),
        output,
        image.checksum()
    );

    Ok(report)
}
