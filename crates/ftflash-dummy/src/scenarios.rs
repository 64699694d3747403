//! End-to-end update and readback runs against the emulator

use super::*;
use ftflash_core::chip::{FT5X06_ID, FT5X16_ID, FT5X26_ID};
use ftflash_core::error::Warning;
use ftflash_core::transfer::WRITE_PACKET_LEN;
use ftflash_core::{
    flash_firmware, read_firmware, DeviceSession, FirmwareImage, HandshakeConfig, NoProgress,
    UpdateReport,
};

fn firmware(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(13) ^ 0x5a).collect()
}

fn flash(dev: &mut DummyController, data: &[u8]) -> ftflash_core::Result<UpdateReport> {
    let mut session = DeviceSession::open(dev, 0x38, None)?;
    let image = FirmwareImage::from_slice(data)?;
    flash_firmware(&mut session, &image, &HandshakeConfig::default(), &mut NoProgress)
}

fn packet_lengths(dev: &DummyController) -> Vec<usize> {
    dev.writes()
        .iter()
        .filter(|w| w.first() == Some(&registers::FW_START))
        .map(|w| w.len() - 6)
        .collect()
}

#[test]
fn test_flash_ft5x06() {
    let data = firmware(4000);
    let mut dev = DummyController::new(DummyConfig::for_chip(FT5X06_ID));

    let report = flash(&mut dev, &data).unwrap();
    assert_eq!(report.chip.name, "ft5x06");
    assert_eq!(report.bytes_written, 4000);
    assert_eq!(report.packets, 32);
    assert!(report.warnings.is_empty());

    assert_eq!(&dev.flash()[..4000], &data[..]);
    assert!(dev.flash()[4000..].iter().all(|&b| b == 0xff));
    assert_eq!(dev.announced_len(), Some(4000));
    assert_eq!(dev.mode(), Mode::Application);

    assert_eq!(dev.count_writes(&[registers::ERASE_APP]), 1);
    assert_eq!(dev.count_writes(&[registers::ERASE_PANEL]), 1);
    assert_eq!(dev.count_writes(&registers::HID_TO_I2C_REQUEST), 0);
}

#[test]
fn test_flash_ft5x26_variant_steps() {
    let data = firmware(1024);
    let mut dev = DummyController::new(DummyConfig::for_chip(FT5X26_ID));

    let report = flash(&mut dev, &data).unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(&dev.flash()[..1024], &data[..]);

    assert_eq!(dev.count_writes(&[registers::ERASE_APP]), 1);
    assert_eq!(dev.count_writes(&[registers::ERASE_PANEL]), 0);
    assert_eq!(dev.count_writes(&registers::HID_TO_I2C_REQUEST), 1);

    // The mode switch comes before the upgrade-entry sequence
    let switch = dev
        .writes()
        .iter()
        .position(|w| w[..] == registers::HID_TO_I2C_REQUEST)
        .unwrap();
    let entry = dev
        .writes()
        .iter()
        .position(|w| w[..] == registers::UPGRADE_ENTRY)
        .unwrap();
    assert!(switch < entry);
}

#[test]
fn test_erase_delays_are_honoured() {
    for (chip_id, erase_ms) in [(FT5X06_ID, 2000), (FT5X16_ID, 1500), (FT5X26_ID, 3000)] {
        let mut dev = DummyController::new(DummyConfig::for_chip(chip_id));
        flash(&mut dev, &firmware(8)).unwrap();
        assert!(dev.elapsed_ms() >= erase_ms, "chip 0x{:02x}", chip_id);
    }
}

#[test]
fn test_packetisation() {
    for (len, expected) in [
        (100, vec![100]),
        (256, vec![128, 128]),
        (300, vec![128, 128, 44]),
    ] {
        let mut dev = DummyController::new(DummyConfig::default());
        flash(&mut dev, &firmware(len)).unwrap();
        assert_eq!(packet_lengths(&dev), expected, "{} byte image", len);
    }
}

#[test]
fn test_full_size_image() {
    let data = firmware(MAX_IMAGE_SIZE);
    let mut dev = DummyController::new(DummyConfig::default());

    let report = flash(&mut dev, &data).unwrap();
    assert_eq!(report.packets, MAX_IMAGE_SIZE / WRITE_PACKET_LEN);
    assert_eq!(dev.flash(), &data[..]);
    assert_eq!(*packet_lengths(&dev).last().unwrap(), WRITE_PACKET_LEN);
}

#[test]
fn test_dump_then_reflash_gives_same_checksum() {
    let original = firmware(5000);
    let mut dev = DummyController::new(DummyConfig::default());
    let first = flash(&mut dev, &original).unwrap();

    let mut session = DeviceSession::open(&mut dev, 0x38, None).unwrap();
    let dump = read_firmware(&mut session, &HandshakeConfig::default(), &mut NoProgress)
        .unwrap()
        .image;
    assert_eq!(dump.len(), MAX_IMAGE_SIZE);
    assert_eq!(&dump.as_bytes()[..5000], &original[..]);

    let second = flash(&mut dev, &dump.as_bytes()[..5000]).unwrap();
    assert_eq!(second.checksum, first.checksum);
}

#[test]
fn test_dump_leaves_application_running() {
    let data = firmware(300);
    let mut dev = DummyController::with_firmware(DummyConfig::for_chip(FT5X16_ID), &data);

    let mut session = DeviceSession::open(&mut dev, 0x38, None).unwrap();
    let dump = read_firmware(&mut session, &HandshakeConfig::default(), &mut NoProgress)
        .unwrap()
        .image;
    assert_eq!(&dump.as_bytes()[..300], &data[..]);
    assert_eq!(dev.mode(), Mode::Application);
    assert_eq!(dev.count_writes(&[registers::FW_READ]), MAX_IMAGE_SIZE / 256);
}

#[test]
fn test_handshake_retries_then_succeeds() {
    let config = DummyConfig {
        failed_identifications: 4,
        ..Default::default()
    };
    let mut dev = DummyController::new(config);

    let report = flash(&mut dev, &firmware(64)).unwrap();
    assert_eq!(report.handshake_attempts, 5);
    assert_eq!(
        dev.count_writes(&[registers::RST_CMD, registers::UPGRADE_AA]),
        5
    );
}

#[test]
fn test_handshake_exhausted() {
    let config = DummyConfig {
        failed_identifications: 100,
        ..Default::default()
    };
    let mut dev = DummyController::new(config);

    let result = flash(&mut dev, &firmware(64));
    assert_eq!(result, Err(Error::HandshakeExhausted { attempts: 30 }));
    assert_eq!(
        dev.count_writes(&[registers::RST_CMD, registers::UPGRADE_AA]),
        30
    );
    assert_eq!(dev.count_writes(&[registers::ERASE_APP]), 0);
}

#[test]
fn test_checksum_mismatch() {
    let config = DummyConfig {
        corrupt_ecc: true,
        ..Default::default()
    };
    let mut dev = DummyController::new(config);

    let result = flash(&mut dev, &firmware(64));
    assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
    // Left in the bootloader
    assert_eq!(dev.mode(), Mode::Upgrade);
}

#[test]
fn test_silent_status_only_warns() {
    let config = DummyConfig {
        silent_status: true,
        ..Default::default()
    };
    let mut dev = DummyController::new(config);

    let report = flash(&mut dev, &firmware(300)).unwrap();
    assert_eq!(report.warnings.len(), 3);
    assert!(report
        .warnings
        .iter()
        .all(|w| matches!(w, Warning::FlashStatusTimeout { .. })));
}

#[test]
fn test_mode_switch_mismatch_only_warns() {
    let config = DummyConfig {
        mode_switch_reply: [0x00, 0x00, 0x00],
        ..DummyConfig::for_chip(FT5X26_ID)
    };
    let mut dev = DummyController::new(config);

    let report = flash(&mut dev, &firmware(64)).unwrap();
    assert_eq!(
        report.warnings,
        [Warning::ModeSwitchMismatch {
            response: [0x00, 0x00, 0x00]
        }]
    );
}

#[test]
fn test_dump_reports_mode_switch_mismatch() {
    let config = DummyConfig {
        mode_switch_reply: [0xeb, 0xaa, 0x09],
        ..DummyConfig::for_chip(FT5X26_ID)
    };
    let mut dev = DummyController::new(config);

    let mut session = DeviceSession::open(&mut dev, 0x38, None).unwrap();
    let report =
        read_firmware(&mut session, &HandshakeConfig::default(), &mut NoProgress).unwrap();
    assert_eq!(report.image.len(), MAX_IMAGE_SIZE);
    assert_eq!(
        report.warnings,
        [Warning::ModeSwitchMismatch {
            response: [0xeb, 0xaa, 0x09]
        }]
    );
}

#[test]
fn test_transfer_nack_is_fatal() {
    let config = DummyConfig {
        nack_command: Some(registers::FW_START),
        ..Default::default()
    };
    let mut dev = DummyController::new(config);

    let result = flash(&mut dev, &firmware(64));
    assert_eq!(result, Err(Error::BusTransaction));
    assert_eq!(dev.count_writes(&[registers::ECC]), 0);
}

#[test]
fn test_unsupported_chip() {
    let mut dev = DummyController::new(DummyConfig::for_chip(0x36));

    let result = flash(&mut dev, &firmware(64));
    assert_eq!(result, Err(Error::UnsupportedChip(0x36)));
    assert_eq!(dev.count_writes(&[registers::RST_CMD]), 0);
}
