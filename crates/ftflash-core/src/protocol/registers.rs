//! FT5x06-family register map
//!
//! The documented registers come from the controller datasheet. The
//! bootloader registers are undocumented and were recovered from the
//! vendor driver; their values must not change.

// ============================================================================
// Documented registers (normal operating mode)
// ============================================================================

/// Touch detection threshold
pub const ID_G_THGROUP: u8 = 0x80;
/// Valid touch peak threshold
pub const ID_G_THPEAK: u8 = 0x81;
/// Touch focus threshold
pub const ID_G_THCAL: u8 = 0x82;
/// Water threshold
pub const ID_G_THWATER: u8 = 0x83;
/// Temperature compensation threshold
pub const ID_G_THTEMP: u8 = 0x84;
/// Power control mode
pub const ID_G_CTRL: u8 = 0x86;
/// Delay before entering monitor mode
pub const ID_G_TIME_ENTER_MONITOR: u8 = 0x87;
/// Report period in active mode
pub const ID_G_PERIODACTIVE: u8 = 0x88;
/// Report period in monitor mode
pub const ID_G_PERIODMONITOR: u8 = 0x89;
/// Auto calibration mode
pub const ID_G_AUTO_CLB_MODE: u8 = 0xa0;
/// Library version, high byte
pub const ID_G_LIB_VERSION_H: u8 = 0xa1;
/// Library version, low byte
pub const ID_G_LIB_VERSION_L: u8 = 0xa2;
/// Chip vendor ID (selects the chip profile)
pub const ID_G_CIPHER: u8 = 0xa3;
/// Interrupt mode
pub const ID_G_MODE: u8 = 0xa4;
/// Firmware version
pub const ID_G_FIRMID: u8 = 0xa6;
/// CTPM vendor ID
pub const ID_G_FT5201ID: u8 = 0xa8;
/// Error code
pub const ID_G_ERR: u8 = 0xa9;
/// Calibration trigger
pub const ID_G_CLB: u8 = 0xaa;
/// Large area touch threshold
pub const ID_G_B_AREA_TH: u8 = 0xae;

// ============================================================================
// Bootloader commands
// ============================================================================

/// Read firmware from flash (addressed, 256-byte packets)
pub const FW_READ: u8 = 0x03;
/// Leave the bootloader and start the application
pub const RESET_FW: u8 = 0x07;
/// Erase the application area
pub const ERASE_APP: u8 = 0x61;
/// Erase the panel parameter area
pub const ERASE_PANEL: u8 = 0x63;
/// Flash write status (16-bit, big endian)
pub const FLASH_STATUS: u8 = 0x6a;
/// Read parameter area
pub const PARAM_READ: u8 = 0x85;
/// Read bootloader identity
pub const READ_ID: u8 = 0x90;
/// Announce total firmware length (24-bit, big endian)
pub const FW_LENGTH: u8 = 0xb0;
/// Write firmware to flash (addressed, 128-byte packets)
pub const FW_START: u8 = 0xbf;
/// Read the bootloader's XOR checksum of received data
pub const ECC: u8 = 0xcc;
/// Soft reset control register
pub const RST_CMD: u8 = 0xfc;

// ============================================================================
// Magic values
// ============================================================================

/// First byte of the reset and upgrade-entry sequences
pub const UPGRADE_AA: u8 = 0xaa;
/// Second byte of the reset and upgrade-entry sequences
pub const UPGRADE_55: u8 = 0x55;

/// Upgrade-entry sequence written after the soft reset
pub const UPGRADE_ENTRY: [u8; 2] = [UPGRADE_55, UPGRADE_AA];

/// HID to I2C mode switch request
pub const HID_TO_I2C_REQUEST: [u8; 3] = [0xeb, 0xaa, 0x09];
/// HID to I2C mode switch acknowledgement
pub const HID_TO_I2C_ACK: [u8; 3] = [0xeb, 0xaa, 0x08];

/// Base value of the flash status register after a packet is written
pub const FLASH_STATUS_PACKET_BASE: u16 = 0x1000;
