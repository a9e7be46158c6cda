//! Structured record codecs.
//!
//! A [`Serializable`] type writes its fields in declared order with no
//! presence mask. Collections carry a [`COUNT_BITS`]-wide element count.

use bitstream::{BitReader, BitWriter};

use crate::error::{CodecError, CodecResult};

/// Width of the element-count prefix in front of collections.
pub const COUNT_BITS: usize = 16;

/// Largest element count a collection may carry.
pub const MAX_COUNT: usize = (1 << COUNT_BITS) - 1;

/// A record with a fixed, ordered field layout.
pub trait Serializable: Sized {
    /// Writes every field in declared order.
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()>;

    /// Reads every field in declared order into a fresh value.
    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self>;
}

/// Writes a collection count prefix.
pub fn write_count(len: usize, writer: &mut BitWriter<'_>) -> CodecResult<()> {
    if len > MAX_COUNT {
        return Err(CodecError::CountOverflow {
            len,
            max: MAX_COUNT,
        });
    }
    writer.write_bits(len as u64, COUNT_BITS)?;
    Ok(())
}

/// Reads a collection count prefix.
pub fn read_count(reader: &mut BitReader<'_>) -> CodecResult<usize> {
    Ok(reader.read_bits(COUNT_BITS)? as usize)
}

impl Serializable for bool {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        Ok(writer.write_bool(*self)?)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Ok(reader.read_bool()?)
    }
}

impl Serializable for u8 {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        Ok(writer.write_u8(*self)?)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Ok(reader.read_u8()?)
    }
}

impl Serializable for u16 {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        Ok(writer.write_u16(*self)?)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Ok(reader.read_u16()?)
    }
}

impl Serializable for u32 {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        Ok(writer.write_u32(*self)?)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Ok(reader.read_u32()?)
    }
}

impl Serializable for u64 {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        Ok(writer.write_u64(*self)?)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Ok(reader.read_u64()?)
    }
}

impl Serializable for i32 {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        Ok(writer.write_i32(*self)?)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Ok(reader.read_i32()?)
    }
}

impl Serializable for String {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        Ok(writer.write_string(self)?)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Ok(reader.read_string()?)
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        write_count(self.len(), writer)?;
        for item in self {
            item.serialize(writer)?;
        }
        Ok(())
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        let count = read_count(reader)?;
        // A hostile count must not drive the allocation.
        let mut items = Self::with_capacity(count.min(reader.bits_remaining()));
        for _ in 0..count {
            items.push(T::deserialize(reader)?);
        }
        Ok(items)
    }
}
