//! Packet transfer engine
//!
//! Firmware moves over the bus in addressed packets: 128-byte payloads when
//! writing, 256-byte reads when dumping. `packet` holds the framing and the
//! checksum accumulator; `engine` drives packets through a bus.

mod engine;
mod packet;

pub use engine::*;
pub use packet::*;
