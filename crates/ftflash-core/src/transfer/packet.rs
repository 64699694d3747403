//! Packet framing and checksum

use alloc::vec::Vec;

/// Payload size of a write packet
pub const WRITE_PACKET_LEN: usize = 128;
/// Size of a read packet
pub const READ_PACKET_LEN: usize = 256;
/// Write packet header: command, 0, offset (2), length (2)
pub const WRITE_HEADER_LEN: usize = 6;
/// Read request: command, 0, offset (2)
pub const READ_HEADER_LEN: usize = 4;

/// Position of one packet within an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketSpan {
    /// Byte offset into the image
    pub offset: usize,
    /// Number of bytes in the packet
    pub len: usize,
}

impl PacketSpan {
    /// Offset one past the last byte of the packet
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Sequence number of the packet for packets of `packet_len` bytes
    pub fn index(&self, packet_len: usize) -> usize {
        self.offset / packet_len
    }
}

/// Iterator over the packets covering `total` bytes
///
/// Packets are contiguous, non-overlapping and in increasing offset order.
/// Only the last one may be shorter than `packet_len`.
#[derive(Debug, Clone)]
pub struct Packets {
    total: usize,
    packet_len: usize,
    offset: usize,
}

/// Split `total` bytes into packets of at most `packet_len` bytes
pub fn packets(total: usize, packet_len: usize) -> Packets {
    assert!(packet_len > 0, "packet length must be non-zero");
    Packets {
        total,
        packet_len,
        offset: 0,
    }
}

impl Iterator for Packets {
    type Item = PacketSpan;

    fn next(&mut self) -> Option<PacketSpan> {
        if self.offset >= self.total {
            return None;
        }
        let len = core::cmp::min(self.packet_len, self.total - self.offset);
        let span = PacketSpan {
            offset: self.offset,
            len,
        };
        self.offset += len;
        Some(span)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.offset.min(self.total)).div_ceil(self.packet_len);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Packets {}

/// Frame a write packet: header followed by `payload`
///
/// Offset and length are 16-bit big-endian; callers keep offsets below
/// 64 KiB.
pub(crate) fn encode_write_packet(command: u8, offset: usize, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(WRITE_HEADER_LEN + payload.len());
    buf.push(command);
    buf.push(0x00);
    buf.extend_from_slice(&(offset as u16).to_be_bytes());
    buf.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Frame a read request for the packet at `offset`
pub(crate) fn encode_read_request(command: u8, offset: usize) -> [u8; READ_HEADER_LEN] {
    let [hi, lo] = (offset as u16).to_be_bytes();
    [command, 0x00, hi, lo]
}

/// The bootloader's 8-bit XOR accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum(u8);

impl Checksum {
    /// Start a new accumulator
    pub const fn new() -> Self {
        Self(0)
    }

    /// Fold `data` into the accumulator
    pub fn update(&mut self, data: &[u8]) {
        self.0 = data.iter().fold(self.0, |acc, b| acc ^ b);
    }

    /// Current value
    pub const fn value(&self) -> u8 {
        self.0
    }
}
