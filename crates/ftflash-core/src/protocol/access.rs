//! Single-register access
//!
//! Thin wrappers that encode the controller's register protocol: one
//! address byte followed either by a value (write) or by a read phase.
//! Transport failures are surfaced unchanged.

use crate::bus::I2cMaster;
use crate::error::Result;

/// Read one register
pub fn read_register<M: I2cMaster + ?Sized>(master: &mut M, addr: u8, reg: u8) -> Result<u8> {
    let mut buf = [0u8; 1];
    master.transact(addr, &[reg], &mut buf)?;
    Ok(buf[0])
}

/// Read a 16-bit big-endian register pair starting at `reg`
pub fn read_register_u16<M: I2cMaster + ?Sized>(master: &mut M, addr: u8, reg: u8) -> Result<u16> {
    let mut buf = [0u8; 2];
    master.transact(addr, &[reg], &mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

/// Write one register
pub fn write_register<M: I2cMaster + ?Sized>(
    master: &mut M,
    addr: u8,
    reg: u8,
    value: u8,
) -> Result<()> {
    master.transact(addr, &[reg, value], &mut [])
}

/// Send a bare one-byte command
pub fn write_command<M: I2cMaster + ?Sized>(master: &mut M, addr: u8, cmd: u8) -> Result<()> {
    master.transact(addr, &[cmd], &mut [])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedBus;

    #[test]
    fn test_read_register() {
        let mut bus = ScriptedBus::new();
        bus.respond(&[0xa3], &[0x55]);

        assert_eq!(read_register(&mut bus, 0x38, 0xa3).unwrap(), 0x55);
        assert_eq!(bus.writes(), [&[0xa3][..]]);
        assert_eq!(bus.log[0].addr, 0x38);
        assert_eq!(bus.log[0].read_len, 1);
    }

    #[test]
    fn test_read_register_u16_is_big_endian() {
        let mut bus = ScriptedBus::new();
        bus.respond(&[0x6a], &[0x10, 0x02]);

        assert_eq!(read_register_u16(&mut bus, 0x38, 0x6a).unwrap(), 0x1002);
    }

    #[test]
    fn test_write_register() {
        let mut bus = ScriptedBus::new();
        write_register(&mut bus, 0x38, 0xfc, 0xaa).unwrap();

        assert_eq!(bus.writes(), [&[0xfc, 0xaa][..]]);
        assert_eq!(bus.log[0].read_len, 0);
    }

    #[test]
    fn test_failure_is_surfaced() {
        let mut bus = ScriptedBus::new();
        bus.fail_on(&[0xa6]);

        assert_eq!(
            read_register(&mut bus, 0x38, 0xa6),
            Err(crate::Error::BusTransaction)
        );
    }
}
