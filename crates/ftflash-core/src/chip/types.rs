//! Controller profile type definitions

use bitflags::bitflags;

use crate::protocol::registers;

bitflags! {
    /// Per-variant deviations from the common update sequence
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Quirks: u8 {
        /// Panel parameters must be erased together with the application
        const ERASE_PANEL = 1 << 0;
        /// Bootloader starts in HID mode and needs a switch to I2C before
        /// it accepts the upgrade-entry sequence
        const HID_TO_I2C  = 1 << 1;
    }
}

/// One erase command issued before programming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseStep {
    /// Erase the application area
    Application,
    /// Erase the panel parameter area
    Panel,
}

impl EraseStep {
    /// All erase steps in the order they are issued
    pub const ALL: [EraseStep; 2] = [EraseStep::Application, EraseStep::Panel];

    /// Bootloader command byte for this step
    pub const fn command(self) -> u8 {
        match self {
            EraseStep::Application => registers::ERASE_APP,
            EraseStep::Panel => registers::ERASE_PANEL,
        }
    }

    /// Quirk a profile must carry for this step to run
    const fn required(self) -> Quirks {
        match self {
            EraseStep::Application => Quirks::empty(),
            EraseStep::Panel => Quirks::ERASE_PANEL,
        }
    }
}

/// Controller profile
///
/// Immutable description of one controller variant. The delays are settle
/// times measured on real parts and must be honoured as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipProfile {
    /// Value of the ID_G_CIPHER register
    pub chip_id: u8,
    /// Short name
    pub name: &'static str,
    /// Maximum number of simultaneous touch points
    pub max_touch_points: u8,
    /// Whether the firmware runs auto calibration after an update
    pub auto_calibration: bool,
    /// Delay after writing 0xAA to the reset register, in ms
    pub delay_aa_ms: u32,
    /// Delay after writing 0x55 to the reset register, in ms
    pub delay_55_ms: u32,
    /// Identity the bootloader returns from READ_ID
    pub boot_id: [u8; 2],
    /// Delay before reading the bootloader identity, in ms
    pub delay_read_id_ms: u32,
    /// Delay after the erase commands, in ms
    pub delay_erase_ms: u32,
    /// Start of the application area in flash
    pub flash_offset: u32,
    /// Deviations from the common sequence
    pub quirks: Quirks,
}

impl ChipProfile {
    /// Check whether this profile carries `quirk`
    pub const fn has_quirk(&self, quirk: Quirks) -> bool {
        self.quirks.contains(quirk)
    }

    /// Erase commands to issue for this controller, in order
    pub fn erase_steps(&self) -> impl Iterator<Item = EraseStep> + '_ {
        EraseStep::ALL
            .into_iter()
            .filter(move |step| self.quirks.contains(step.required()))
    }
}
