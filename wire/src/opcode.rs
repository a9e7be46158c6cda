//! Message opcodes.

use std::fmt;

use bitstream::{BitReader, BitWriter};

use crate::error::WireResult;

/// Width of the opcode that starts every message.
pub const OPCODE_BITS: usize = 8;

/// Identifier of a concrete message type, unique per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode(u8);

impl Opcode {
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Writes the opcode field.
    pub fn write(self, writer: &mut BitWriter<'_>) -> WireResult<()> {
        writer.write_bits(u64::from(self.0), OPCODE_BITS)?;
        Ok(())
    }

    /// Reads the opcode field.
    pub fn read(reader: &mut BitReader<'_>) -> WireResult<Self> {
        Ok(Self(reader.read_bits(OPCODE_BITS)? as u8))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Opcode {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitstream::BitBuffer;

    #[test]
    fn opcode_is_one_byte_on_the_wire() {
        let mut buffer = BitBuffer::new(2);
        let mut writer = BitWriter::new(&mut buffer);
        Opcode::new(0xA5).write(&mut writer).unwrap();
        assert_eq!(writer.bits_written(), OPCODE_BITS);
        assert_eq!(buffer.as_bytes(), &[0xA5]);

        let mut reader = BitReader::new(&buffer);
        assert_eq!(Opcode::read(&mut reader).unwrap(), Opcode::new(0xA5));
    }

    #[test]
    fn opcode_read_underflows_on_empty_input() {
        let buffer = BitBuffer::new(1);
        let mut reader = BitReader::new(&buffer);
        assert!(Opcode::read(&mut reader).is_err());
    }
}
