//! Packet transfer over the bus

use alloc::vec::Vec;

use super::packet::{
    encode_read_request, encode_write_packet, packets, Checksum, PacketSpan, READ_PACKET_LEN,
    WRITE_PACKET_LEN,
};
use crate::bus::I2cMaster;
use crate::error::{Error, Result, Warning};
use crate::image::MAX_IMAGE_SIZE;
use crate::protocol::{read_register, read_register_u16, registers};
use crate::update::UpdateProgress;

/// Packet offsets are 16 bits wide, so transfers stop at 64 KiB
fn check_transfer_len(len: usize) -> Result<()> {
    if len > MAX_IMAGE_SIZE {
        return Err(Error::ImageSize { len });
    }
    Ok(())
}

/// Times the flash status is polled after each write packet
pub const STATUS_POLL_COUNT: usize = 5;
/// Delay before each flash status poll, in ms
pub const STATUS_POLL_DELAY_MS: u32 = 5;
/// Delay before each read packet, in ms
pub const READ_PACKET_DELAY_MS: u32 = 10;

/// Running state of a write transfer
///
/// The offset only moves forward and the checksum covers exactly the
/// payload bytes sent so far.
#[derive(Debug, Clone, Default)]
pub struct TransferState {
    offset: usize,
    packets: usize,
    checksum: Checksum,
}

impl TransferState {
    /// Start at offset 0 with an empty checksum
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a packet that has been sent
    fn advance(&mut self, span: PacketSpan, payload: &[u8]) {
        debug_assert_eq!(span.offset, self.offset, "packets must be sent in order");
        self.checksum.update(payload);
        self.offset = span.end();
        self.packets += 1;
    }

    /// Bytes sent so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Packets sent so far
    pub fn packets(&self) -> usize {
        self.packets
    }

    /// Checksum of the bytes sent so far
    pub fn checksum(&self) -> u8 {
        self.checksum.value()
    }
}

/// Send `data` to the bootloader as FW_START packets
///
/// A bus failure while sending a packet aborts the transfer. A flash status
/// that never confirms a packet is only recorded in `warnings`. More than
/// 64 KiB of `data` is rejected before anything is sent.
pub fn write_packets<M, P>(
    master: &mut M,
    addr: u8,
    data: &[u8],
    progress: &mut P,
    warnings: &mut Vec<Warning>,
) -> Result<TransferState>
where
    M: I2cMaster + ?Sized,
    P: UpdateProgress + ?Sized,
{
    check_transfer_len(data.len())?;
    let mut state = TransferState::new();
    progress.writing(data.len());

    for span in packets(data.len(), WRITE_PACKET_LEN) {
        let payload = &data[span.offset..span.end()];
        log::debug!(
            "Write pkt [{:x}] @{:x} - len {}",
            registers::FW_START,
            span.offset,
            span.len
        );

        let packet = encode_write_packet(registers::FW_START, span.offset, payload);
        master.transact(addr, &packet, &mut [])?;
        state.advance(span, payload);

        if let Some(warning) = poll_flash_status(master, addr, span) {
            log::warn!("{}", warning);
            warnings.push(warning);
        }
        progress.write_progress(state.offset());
    }

    Ok(state)
}

/// Wait for the bootloader to report the packet as programmed
///
/// Best effort: the status register confirms progress but does not gate
/// correctness, which the final checksum covers.
fn poll_flash_status<M: I2cMaster + ?Sized>(
    master: &mut M,
    addr: u8,
    span: PacketSpan,
) -> Option<Warning> {
    let packet = span.index(WRITE_PACKET_LEN) as u16;
    let expected = registers::FLASH_STATUS_PACKET_BASE + packet;
    let mut last_status = None;

    for _ in 0..STATUS_POLL_COUNT {
        master.delay_ms(STATUS_POLL_DELAY_MS);
        match read_register_u16(master, addr, registers::FLASH_STATUS) {
            Ok(status) if status == expected => return None,
            Ok(status) => last_status = Some(status),
            Err(e) => log::trace!("Flash status read failed: {}", e),
        }
    }

    Some(Warning::FlashStatusTimeout {
        packet,
        last_status,
    })
}

/// Read `total` bytes of flash with FW_READ requests
pub fn read_packets<M, P>(master: &mut M, addr: u8, total: usize, progress: &mut P) -> Result<Vec<u8>>
where
    M: I2cMaster + ?Sized,
    P: UpdateProgress + ?Sized,
{
    check_transfer_len(total)?;
    let mut data = Vec::with_capacity(total);
    let mut buf = [0u8; READ_PACKET_LEN];
    progress.reading(total);

    for span in packets(total, READ_PACKET_LEN) {
        log::debug!(
            "Read pkt [{:x}] @{:x} - len {}",
            registers::FW_READ,
            span.offset,
            span.len
        );
        master.delay_ms(READ_PACKET_DELAY_MS);

        let request = encode_read_request(registers::FW_READ, span.offset);
        let chunk = &mut buf[..span.len];
        master.transact(addr, &request, chunk)?;
        data.extend_from_slice(chunk);
        progress.read_progress(data.len());
    }

    Ok(data)
}

/// Compare the bootloader's checksum with the one accumulated locally
pub fn verify_checksum<M: I2cMaster + ?Sized>(master: &mut M, addr: u8, host: u8) -> Result<()> {
    let device = read_register(master, addr, registers::ECC)?;
    if device != host {
        log::debug!("ECC error {:02x} vs. {:02x}", device, host);
        return Err(Error::ChecksumMismatch { device, host });
    }
    log::debug!("ECC ok: {:02x}", device);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedBus;
    use crate::update::NoProgress;

    const ADDR: u8 = 0x38;

    fn image(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 + 5) as u8).collect()
    }

    fn xor(data: &[u8]) -> u8 {
        data.iter().fold(0, |a, b| a ^ b)
    }

    #[test]
    fn test_write_packets_framing() {
        let data = image(300);
        let mut bus = ScriptedBus::new();
        bus.respond(&[registers::FLASH_STATUS], &[0x10, 0x00]);
        bus.respond(&[registers::FLASH_STATUS], &[0x10, 0x01]);
        bus.respond(&[registers::FLASH_STATUS], &[0x10, 0x02]);
        let mut warnings = Vec::new();

        let state = write_packets(&mut bus, ADDR, &data, &mut NoProgress, &mut warnings).unwrap();
        assert_eq!(state.packets(), 3);
        assert_eq!(state.offset(), 300);
        assert_eq!(state.checksum(), xor(&data));
        assert!(warnings.is_empty());

        let sent: Vec<_> = bus
            .log
            .iter()
            .filter(|t| t.write[0] == registers::FW_START)
            .collect();
        assert_eq!(sent.len(), 3);
        assert_eq!(&sent[0].write[..6], &[0xbf, 0, 0x00, 0x00, 0x00, 0x80]);
        assert_eq!(&sent[1].write[..6], &[0xbf, 0, 0x00, 0x80, 0x00, 0x80]);
        assert_eq!(&sent[2].write[..6], &[0xbf, 0, 0x01, 0x00, 0x00, 0x2c]);
        assert_eq!(&sent[2].write[6..], &data[256..]);

        // Status confirmed on the first poll of every packet
        assert_eq!(bus.count(&[registers::FLASH_STATUS]), 3);
    }

    #[test]
    fn test_status_timeout_is_a_warning() {
        let data = image(200);
        let mut bus = ScriptedBus::new();
        bus.respond(&[registers::FLASH_STATUS], &[0x0f, 0xff]);
        let mut warnings = Vec::new();

        let state = write_packets(&mut bus, ADDR, &data, &mut NoProgress, &mut warnings).unwrap();
        assert_eq!(state.packets(), 2);
        assert_eq!(bus.count(&[registers::FLASH_STATUS]), 2 * STATUS_POLL_COUNT);
        assert_eq!(
            warnings,
            [
                Warning::FlashStatusTimeout {
                    packet: 0,
                    last_status: Some(0x0fff)
                },
                Warning::FlashStatusTimeout {
                    packet: 1,
                    last_status: Some(0x0fff)
                },
            ]
        );
        assert!(bus.delays.iter().all(|&d| d == STATUS_POLL_DELAY_MS));
    }

    #[test]
    fn test_status_read_failure_is_tolerated() {
        let data = image(64);
        let mut bus = ScriptedBus::new();
        bus.fail_on(&[registers::FLASH_STATUS]);
        let mut warnings = Vec::new();

        write_packets(&mut bus, ADDR, &data, &mut NoProgress, &mut warnings).unwrap();
        assert_eq!(
            warnings,
            [Warning::FlashStatusTimeout {
                packet: 0,
                last_status: None
            }]
        );
    }

    #[test]
    fn test_packet_bus_error_is_fatal() {
        let data = image(512);
        let mut bus = ScriptedBus::new();
        bus.fail_on(&[registers::FW_START, 0x00, 0x01, 0x00]);
        let mut warnings = Vec::new();

        let result = write_packets(&mut bus, ADDR, &data, &mut NoProgress, &mut warnings);
        assert!(matches!(result, Err(Error::BusTransaction)));
        // Nothing after the failed packet
        assert_eq!(bus.log.last().unwrap().write[..4], [0xbf, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_read_packets() {
        let mut bus = ScriptedBus::new();
        bus.respond(&[registers::FW_READ, 0x00, 0x00, 0x00], &[0x11; 256]);
        bus.respond(&[registers::FW_READ, 0x00, 0x01, 0x00], &[0x22; 256]);
        bus.respond(&[registers::FW_READ, 0x00, 0x02, 0x00], &[0x33; 256]);

        let data = read_packets(&mut bus, ADDR, 600, &mut NoProgress).unwrap();
        assert_eq!(data.len(), 600);
        assert!(data[..256].iter().all(|&b| b == 0x11));
        assert!(data[256..512].iter().all(|&b| b == 0x22));
        assert!(data[512..].iter().all(|&b| b == 0x33));

        let lens: Vec<_> = bus.log.iter().map(|t| t.read_len).collect();
        assert_eq!(lens, [256, 256, 88]);
        assert_eq!(bus.delays, [10, 10, 10]);
    }

    #[test]
    fn test_oversized_transfers_rejected() {
        let data = image(MAX_IMAGE_SIZE + 1);
        let mut bus = ScriptedBus::new();
        let mut warnings = Vec::new();

        assert_eq!(
            write_packets(&mut bus, ADDR, &data, &mut NoProgress, &mut warnings).map(|_| ()),
            Err(Error::ImageSize {
                len: MAX_IMAGE_SIZE + 1
            })
        );
        assert_eq!(
            read_packets(&mut bus, ADDR, MAX_IMAGE_SIZE + 128, &mut NoProgress),
            Err(Error::ImageSize {
                len: MAX_IMAGE_SIZE + 128
            })
        );
        assert!(bus.log.is_empty());
    }

    #[test]
    fn test_last_packet_offset_fits() {
        let data = image(MAX_IMAGE_SIZE);
        let mut bus = ScriptedBus::new();
        let mut warnings = Vec::new();

        let state = write_packets(&mut bus, ADDR, &data, &mut NoProgress, &mut warnings).unwrap();
        assert_eq!(state.offset(), MAX_IMAGE_SIZE);
        let last = bus
            .log
            .iter()
            .rev()
            .find(|t| t.write[0] == registers::FW_START)
            .unwrap();
        assert_eq!(&last.write[..6], &[0xbf, 0x00, 0xff, 0x80, 0x00, 0x80]);
    }

    #[test]
    fn test_verify_checksum() {
        let mut bus = ScriptedBus::new();
        bus.respond(&[registers::ECC], &[0x5a]);

        assert!(verify_checksum(&mut bus, ADDR, 0x5a).is_ok());
        assert_eq!(
            verify_checksum(&mut bus, ADDR, 0x5b),
            Err(Error::ChecksumMismatch {
                device: 0x5a,
                host: 0x5b
            })
        );
    }
}
