//! Static table of supported controllers
//!
//! Values follow the FocalTech reference driver. The table is built at
//! compile time and never changes; look profiles up by chip ID.

use super::types::{ChipProfile, Quirks};

/// Chip ID of the FT5x06
pub const FT5X06_ID: u8 = 0x55;
/// Chip ID of the FT5x16
pub const FT5X16_ID: u8 = 0x0a;
/// Chip ID of the FT5x26 (FT5426)
pub const FT5X26_ID: u8 = 0x54;

/// All supported controllers
pub static PROFILES: &[ChipProfile] = &[
    ChipProfile {
        chip_id: FT5X06_ID,
        name: "ft5x06",
        max_touch_points: 5,
        auto_calibration: true,
        delay_aa_ms: 50,
        delay_55_ms: 30,
        boot_id: [0x79, 0x03],
        delay_read_id_ms: 10,
        delay_erase_ms: 2000,
        flash_offset: 0x0000,
        quirks: Quirks::ERASE_PANEL,
    },
    ChipProfile {
        chip_id: FT5X16_ID,
        name: "ft5x16",
        max_touch_points: 5,
        auto_calibration: true,
        delay_aa_ms: 50,
        delay_55_ms: 30,
        boot_id: [0x79, 0x07],
        delay_read_id_ms: 10,
        delay_erase_ms: 1500,
        flash_offset: 0x0000,
        quirks: Quirks::ERASE_PANEL,
    },
    ChipProfile {
        chip_id: FT5X26_ID,
        name: "ft5x26",
        max_touch_points: 5,
        auto_calibration: false,
        delay_aa_ms: 4,
        delay_55_ms: 250,
        boot_id: [0x54, 0x2c],
        delay_read_id_ms: 10,
        delay_erase_ms: 3000,
        flash_offset: 0x1800,
        quirks: Quirks::HID_TO_I2C,
    },
];

/// Find the profile for a chip ID
pub fn find_by_id(chip_id: u8) -> Option<&'static ChipProfile> {
    PROFILES.iter().find(|p| p.chip_id == chip_id)
}

/// Find a profile by name (case-insensitive)
pub fn find_by_name(name: &str) -> Option<&'static ChipProfile> {
    PROFILES.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
