//! Bit-level reader with bounded operations.

use crate::buffer::BitBuffer;
use crate::error::{BitError, BitResult};
use crate::STRING_LENGTH_BITS;

/// A bit-level reader over a borrowed [`BitBuffer`].
///
/// Reads are limited to the written extent of the buffer and return errors
/// instead of panicking on malformed input. A failed read does not move the
/// cursor.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    limit: usize,
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a reader positioned at the start of `buffer`.
    #[must_use]
    pub fn new(buffer: &'a BitBuffer) -> Self {
        Self {
            data: buffer.data(),
            limit: buffer.bits_written(),
            bit_pos: 0,
        }
    }

    /// Returns the number of bits remaining to read.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        self.limit - self.bit_pos
    }

    /// Returns `true` if there are no more bits to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    /// Returns the current bit position.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Reads a single bit as a boolean.
    pub fn read_bool(&mut self) -> BitResult<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Reads up to 64 bits as an unsigned integer.
    pub fn read_bits(&mut self, bits: usize) -> BitResult<u64> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits == 0 {
            return Ok(0);
        }
        self.ensure_bits(bits)?;

        let mut value = 0u64;
        let mut shift = 0usize;
        while shift < bits {
            let byte_idx = self.bit_pos / 8;
            let bit_off = self.bit_pos % 8;
            let take = (8 - bit_off).min(bits - shift);
            let mask = ((1u16 << take) - 1) as u8;
            let chunk = (self.data[byte_idx] >> bit_off) & mask;
            value |= u64::from(chunk) << shift;
            shift += take;
            self.bit_pos += take;
        }
        Ok(value)
    }

    /// Reads an 8-bit unsigned integer.
    pub fn read_u8(&mut self) -> BitResult<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Reads a 16-bit unsigned integer.
    pub fn read_u16(&mut self) -> BitResult<u16> {
        Ok(self.read_bits(16)? as u16)
    }

    /// Reads a 32-bit unsigned integer.
    pub fn read_u32(&mut self) -> BitResult<u32> {
        Ok(self.read_bits(32)? as u32)
    }

    /// Reads a 64-bit unsigned integer.
    pub fn read_u64(&mut self) -> BitResult<u64> {
        self.read_bits(64)
    }

    /// Reads a 32-bit signed integer (two's complement).
    pub fn read_i32(&mut self) -> BitResult<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Reads a 64-bit signed integer (two's complement).
    pub fn read_i64(&mut self) -> BitResult<i64> {
        Ok(self.read_bits(64)? as i64)
    }

    /// Reads the raw IEEE-754 bits of an `f32`.
    pub fn read_f32(&mut self) -> BitResult<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> BitResult<String> {
        let start = self.bit_pos;
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| {
            self.bit_pos = start;
            BitError::InvalidUtf8
        })
    }

    /// Reads a length-prefixed byte blob.
    ///
    /// The declared length is checked against the remaining bits before
    /// anything is allocated.
    pub fn read_bytes(&mut self) -> BitResult<Vec<u8>> {
        self.ensure_bits(STRING_LENGTH_BITS)?;
        let start = self.bit_pos;
        let len = self.read_bits(STRING_LENGTH_BITS)? as usize;
        if let Err(err) = self.ensure_bits(len * 8) {
            self.bit_pos = start;
            return Err(err);
        }
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.read_u8()?);
        }
        Ok(out)
    }

    fn ensure_bits(&self, bits: usize) -> BitResult<()> {
        let available = self.bits_remaining();
        if bits > available {
            return Err(BitError::Underflow {
                requested: bits,
                available,
            });
        }
        Ok(())
    }
}
