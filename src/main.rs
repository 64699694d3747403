//! ftflash - Firmware tool for FT5x06-family touch controllers
//!
//! Reads the firmware out of a FocalTech FT5x06, FT5x16 or FT5x26 touch
//! controller and flashes new firmware into it over I2C.
//!
//! # Order of operations
//!
//! 1. Open the bus adapter and claim the address (fatal on failure)
//! 2. Identify the controller and read its firmware version
//! 3. Dump the current firmware if `--output` is given
//! 4. Flash new firmware if `--input` is given
//!
//! Failures from step 2 on are logged and the tool still exits 0, unless
//! `--strict` is given.

mod cli;
mod commands;
mod error;
mod programmers;

use clap::Parser;
use cli::Cli;
use error::ToolError;
use ftflash_core::bus::I2cMaster;
use ftflash_core::{DeviceSession, HandshakeConfig};
use log::LevelFilter;
use programmers::Target;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // -v / -vv pick the level; RUST_LOG still overrides it
    logger_builder(cli.verbose, env_logger::Env::default()).init();

    if cli.list_chips {
        commands::list_chips();
        println!();
        commands::list_programmers();
        return Ok(());
    }

    let target = Target {
        bus: cli.bus,
        address: cli.address,
        chip_id: cli.chip_id,
    };
    log::info!(
        "Opening {} on bus {}, address 0x{:02x}",
        cli.programmer,
        target.bus,
        target.address
    );
    let master = programmers::open_programmer(&cli.programmer, &target)?;

    exit_status(run(&cli, master), cli.strict)
}

/// Log level for the number of `-v` flags
fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn logger_builder(verbose: u8, env: env_logger::Env<'_>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log_level(verbose)).parse_env(env);
    builder
}

/// Failures are already logged; only `--strict` makes them the exit status
fn exit_status(
    result: Result<(), ToolError>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Err(e) if strict => Err(e.into()),
        _ => Ok(()),
    }
}

/// Everything after the bus is open
///
/// Each failure is logged where it happens. The first one is returned so
/// `--strict` can turn it into the exit status.
fn run<M: I2cMaster>(cli: &Cli, master: M) -> Result<(), ToolError> {
    let mut session = match DeviceSession::open(master, cli.address, cli.chip_id) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Couldn't identify the controller: {}", e);
            return Err(e.into());
        }
    };

    if cli.input.is_none() && cli.output.is_none() {
        log::info!("Nothing to do (read or write)");
        return Ok(());
    }

    let config = HandshakeConfig::default().with_max_attempts(cli.handshake_attempts);
    let mut progress = commands::IndicatifProgress::new();
    let mut first_error = None;

    if let Some(output) = &cli.output {
        match commands::run_dump(&mut session, output, &config, &mut progress) {
            Ok(_) => {}
            // Without somewhere to put the backup, don't go on to flash
            Err(e @ ToolError::FileAccess { .. }) => {
                log::error!("Unable to write the firmware dump: {}", e);
                return Err(e);
            }
            Err(e) => {
                log::error!("Failed to read FW: {}", e);
                first_error = Some(e);
            }
        }
    }

    if let Some(input) = &cli.input {
        log::info!("Flashing {:?}", input);
        if let Err(e) = commands::run_flash(&mut session, input, &config, &mut progress) {
            log::error!("Failed to flash FW: {}", e);
            first_error.get_or_insert(e);
        }
    }

    first_error.map_or(Ok(()), Err)
}
