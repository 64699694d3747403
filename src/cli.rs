//! CLI argument parsing

use crate::programmers;
use clap::Parser;
use std::path::PathBuf;

/// Parse a string as a hex u8, with or without a 0x prefix
fn parse_hex_u8(s: &str) -> Result<u8, String> {
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u8::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
}

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Bus adapter to use [available: {}]",
        programmers::programmer_names_short()
    )
}

#[derive(Parser, Debug)]
#[command(name = "ftflash")]
#[command(
    author,
    version,
    about = "Read and write FT5x06-family touch controller firmware",
    long_about = None
)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(short, long, default_value = "linux_i2c", help = programmer_help())]
    pub programmer: String,

    /// I2C bus the controller is on
    #[arg(short, long, default_value_t = 2)]
    pub bus: u32,

    /// I2C address of the controller (hex)
    #[arg(short, long, value_parser = parse_hex_u8, default_value = "38")]
    pub address: u8,

    /// Force the chip ID (hex) instead of reading it from the controller
    #[arg(short = 'c', long = "chipid", value_parser = parse_hex_u8)]
    pub chip_id: Option<u8>,

    /// Firmware file to flash
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// File to write the current firmware to (read before flashing)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum bootloader handshake attempts
    #[arg(long, default_value_t = ftflash_core::handshake::DEFAULT_MAX_ATTEMPTS,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub handshake_attempts: u32,

    /// Exit with an error when reading or flashing fails
    #[arg(long)]
    pub strict: bool,

    /// List supported controllers and exit
    #[arg(long)]
    pub list_chips: bool,
}
