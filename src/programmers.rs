//! Programmer registration and dispatch
//!
//! This module provides a centralized registry of bus adapters, with
//! support for feature-gated inclusion and dynamic help text generation.

use ftflash_core::bus::I2cMaster;

/// Boxed bus adapter as handed to the protocol code
pub type BoxedI2cMaster = Box<dyn I2cMaster + Send>;

/// Information about a programmer
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Where to find the controller
#[derive(Debug, Clone, Copy)]
pub struct Target {
    /// I2C bus number
    pub bus: u32,
    /// 7-bit device address
    pub address: u8,
    /// Chip ID forced on the command line
    pub chip_id: Option<u8>,
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "linux-i2c")]
    programmers.push(ProgrammerInfo {
        name: "linux_i2c",
        aliases: &["linux-i2c", "i2cdev"],
        description: "Linux i2c-dev adapter (/dev/i2c-<bus>)",
    });

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &["emulator"],
        description: "In-memory controller emulator for dry runs",
    });

    programmers
}

/// Get a short comma-separated list of programmer names
pub fn programmer_names_short() -> String {
    available_programmers()
        .iter()
        .map(|p| p.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a programmer name or alias to its primary name
pub fn find_programmer(name: &str) -> Option<&'static str> {
    available_programmers()
        .into_iter()
        .find(|p| p.name == name || p.aliases.contains(&name))
        .map(|p| p.name)
}

/// Open the bus adapter `programmer` and claim the target address
///
/// Failing to open the adapter or to claim the address is the one error the
/// tool always treats as fatal.
pub fn open_programmer(
    programmer: &str,
    target: &Target,
) -> Result<BoxedI2cMaster, Box<dyn std::error::Error>> {
    match find_programmer(programmer) {
        #[cfg(feature = "linux-i2c")]
        Some("linux_i2c") => {
            let master = ftflash_linux_i2c::open_linux_i2c(target.bus, target.address)?;
            Ok(master)
        }
        #[cfg(feature = "dummy")]
        Some("dummy") => {
            use ftflash_dummy::{DummyConfig, DummyController};

            let config = DummyConfig {
                address: target.address,
                ..DummyConfig::for_chip(
                    target
                        .chip_id
                        .unwrap_or(ftflash_core::chip::FT5X06_ID),
                )
            };
            log::warn!("Using the in-memory emulator; no hardware will be touched");
            Ok(Box::new(DummyController::new(config)))
        }
        _ => Err(unknown_programmer_error(programmer)),
    }
}

fn unknown_programmer_error(name: &str) -> Box<dyn std::error::Error> {
    format!(
        "Unknown programmer: {} (available: {})",
        name,
        programmer_names_short()
    )
    .into()
}
