//! Bit-level writer for encoding packed binary data.

use crate::buffer::BitBuffer;
use crate::error::{BitError, BitResult};
use crate::STRING_LENGTH_BITS;

/// A bit-level writer over a borrowed [`BitBuffer`].
///
/// Fields are packed LSB-first with no padding between them. Every write is
/// checked against the buffer capacity and fails without moving the cursor.
#[derive(Debug)]
pub struct BitWriter<'a> {
    buffer: &'a mut BitBuffer,
    bit_pos: usize,
}

impl<'a> BitWriter<'a> {
    /// Starts a new encode pass over `buffer`, clearing any previous contents.
    pub fn new(buffer: &'a mut BitBuffer) -> Self {
        buffer.clear();
        Self { buffer, bit_pos: 0 }
    }

    /// Returns the number of bits written so far.
    #[must_use]
    pub const fn bits_written(&self) -> usize {
        self.bit_pos
    }

    /// Returns the number of bits that can still be written.
    #[must_use]
    pub fn bits_available(&self) -> usize {
        self.buffer.capacity_bits() - self.bit_pos
    }

    /// Writes a single bit.
    pub fn write_bool(&mut self, value: bool) -> BitResult<()> {
        self.write_bits(u64::from(value), 1)
    }

    /// Writes the low `bits` bits of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits > 64`.
    /// Returns [`BitError::Overflow`] if the write would exceed the capacity.
    pub fn write_bits(&mut self, value: u64, bits: usize) -> BitResult<()> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits == 0 {
            return Ok(());
        }
        let available = self.bits_available();
        if bits > available {
            return Err(BitError::Overflow {
                requested: bits,
                available,
            });
        }

        let mut value = if bits == 64 {
            value
        } else {
            value & ((1u64 << bits) - 1)
        };
        let mut remaining = bits;
        let data = self.buffer.data_mut();
        while remaining > 0 {
            let byte_idx = self.bit_pos / 8;
            let bit_off = self.bit_pos % 8;
            let take = (8 - bit_off).min(remaining);
            let mask = ((1u16 << take) - 1) as u8;
            let chunk = (value as u8) & mask;
            let byte = &mut data[byte_idx];
            *byte = (*byte & !(mask << bit_off)) | (chunk << bit_off);
            value >>= take;
            remaining -= take;
            self.bit_pos += take;
        }
        self.buffer.extend_written(self.bit_pos);
        Ok(())
    }

    /// Writes an 8-bit unsigned integer.
    pub fn write_u8(&mut self, value: u8) -> BitResult<()> {
        self.write_bits(u64::from(value), 8)
    }

    /// Writes a 16-bit unsigned integer.
    pub fn write_u16(&mut self, value: u16) -> BitResult<()> {
        self.write_bits(u64::from(value), 16)
    }

    /// Writes a 32-bit unsigned integer.
    pub fn write_u32(&mut self, value: u32) -> BitResult<()> {
        self.write_bits(u64::from(value), 32)
    }

    /// Writes a 64-bit unsigned integer.
    pub fn write_u64(&mut self, value: u64) -> BitResult<()> {
        self.write_bits(value, 64)
    }

    /// Writes a 32-bit signed integer (two's complement).
    pub fn write_i32(&mut self, value: i32) -> BitResult<()> {
        self.write_bits(u64::from(value as u32), 32)
    }

    /// Writes a 64-bit signed integer (two's complement).
    pub fn write_i64(&mut self, value: i64) -> BitResult<()> {
        self.write_bits(value as u64, 64)
    }

    /// Writes the raw IEEE-754 bits of an `f32`.
    pub fn write_f32(&mut self, value: f32) -> BitResult<()> {
        self.write_bits(u64::from(value.to_bits()), 32)
    }

    /// Writes a length-prefixed UTF-8 string.
    ///
    /// The prefix is [`STRING_LENGTH_BITS`] wide and counts bytes; each byte
    /// follows as an 8-bit field. There is no terminator.
    pub fn write_string(&mut self, value: &str) -> BitResult<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Writes a length-prefixed byte blob (same layout as strings).
    pub fn write_bytes(&mut self, value: &[u8]) -> BitResult<()> {
        let max = (1usize << STRING_LENGTH_BITS) - 1;
        if value.len() > max {
            return Err(BitError::StringTooLong {
                len: value.len(),
                max,
            });
        }
        let needed = STRING_LENGTH_BITS + value.len() * 8;
        let available = self.bits_available();
        if needed > available {
            return Err(BitError::Overflow {
                requested: needed,
                available,
            });
        }
        self.write_bits(value.len() as u64, STRING_LENGTH_BITS)?;
        for &byte in value {
            self.write_u8(byte)?;
        }
        Ok(())
    }
}
