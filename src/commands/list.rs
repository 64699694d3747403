//! List commands implementation

use crate::programmers;
use ftflash_core::chip::{self, ChipProfile};

/// List all supported programmers
pub fn list_programmers() {
    println!("Supported programmers:");
    println!();
    for p in programmers::available_programmers() {
        println!("  {:<10} - {}", p.name, p.description);
    }
}

fn quirk_names(profile: &ChipProfile) -> String {
    let names: Vec<&str> = profile
        .quirks
        .iter_names()
        .map(|(name, _)| name)
        .collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(",")
    }
}

/// List all supported controllers
pub fn list_chips() {
    println!("Supported controllers:");
    println!();
    println!(
        "{:<8} {:>7} {:>8} {:>9} {:>8} {:>9}  {}",
        "Name", "Chip ID", "Boot ID", "Erase ms", "Offset", "AA/55 ms", "Quirks"
    );
    println!("{}", "-".repeat(72));

    for profile in chip::PROFILES {
        println!(
            "{:<8} {:>7} {:>8} {:>9} {:>8} {:>9}  {}",
            profile.name,
            format!("0x{:02x}", profile.chip_id),
            format!("{:02x} {:02x}", profile.boot_id[0], profile.boot_id[1]),
            profile.delay_erase_ms,
            format!("0x{:04x}", profile.flash_offset),
            format!("{}/{}", profile.delay_aa_ms, profile.delay_55_ms),
            quirk_names(profile)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftflash_core::chip::Quirks;

    #[test]
    fn test_quirk_names() {
        let ft5x06 = chip::find_by_id(chip::FT5X06_ID).unwrap();
        assert_eq!(quirk_names(ft5x06), "ERASE_PANEL");

        let ft5x26 = chip::find_by_id(chip::FT5X26_ID).unwrap();
        assert_eq!(quirk_names(ft5x26), "HID_TO_I2C");

        let bare = ChipProfile {
            quirks: Quirks::empty(),
            ..*ft5x06
        };
        assert_eq!(quirk_names(&bare), "-");
    }
}
