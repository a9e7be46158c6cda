//! Quantized geometry value types.
//!
//! Each type carries the quantization it is encoded with. Equality compares
//! the quantized representation and tolerates one step per component, so a
//! value compares equal to its own decoded copy.
//!
//! The [`Serializable`] impls use `DEFAULT_QUANT` on both sides and reject
//! values built with another quantization. Such values travel through the
//! `write_with`/`read_with` pair, with the quantization agreed out of band.

use bitstream::{BitReader, BitWriter};
use schema::{AngleQuant, LinearQuant, ScalarCodec};

use crate::error::{CodecError, CodecResult};
use crate::quant::{read_scalar, within_one_step, write_scalar};
use crate::record::Serializable;

/// A 3D position, `x, y, z` on the wire.
#[derive(Debug, Clone, Copy)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    quant: LinearQuant,
}

impl Vector3 {
    /// World-space positions: about 1/16 unit over ±2^19 units.
    pub const DEFAULT_QUANT: LinearQuant = LinearQuant::new(-524_288.0, 524_288.0, 24);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self::with_quant(x, y, z, Self::DEFAULT_QUANT)
    }

    #[must_use]
    pub const fn with_quant(x: f32, y: f32, z: f32, quant: LinearQuant) -> Self {
        Self { x, y, z, quant }
    }

    #[must_use]
    pub const fn quant(&self) -> LinearQuant {
        self.quant
    }

    /// Encoded size in bits.
    #[must_use]
    pub const fn bit_len(&self) -> usize {
        3 * self.quant.bits as usize
    }

    /// Encodes with the vector's own quantization.
    pub fn write_with(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        let codec = ScalarCodec::Linear(self.quant);
        write_scalar(codec, self.x, writer)?;
        write_scalar(codec, self.y, writer)?;
        write_scalar(codec, self.z, writer)
    }

    /// Decodes a vector encoded with `quant`.
    pub fn read_with(quant: LinearQuant, reader: &mut BitReader<'_>) -> CodecResult<Self> {
        let codec = ScalarCodec::Linear(quant);
        let x = read_scalar(codec, reader)?;
        let y = read_scalar(codec, reader)?;
        let z = read_scalar(codec, reader)?;
        Ok(Self::with_quant(x, y, z, quant))
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        let codec = ScalarCodec::Linear(self.quant);
        self.quant == other.quant
            && within_one_step(codec, self.x, other.x)
            && within_one_step(codec, self.y, other.y)
            && within_one_step(codec, self.z, other.z)
    }
}

impl Serializable for Vector3 {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        if self.quant != Self::DEFAULT_QUANT {
            return Err(CodecError::NonDefaultQuant { ty: "Vector3" });
        }
        self.write_with(writer)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Self::read_with(Self::DEFAULT_QUANT, reader)
    }
}

/// A 2D position, `x, y` on the wire.
#[derive(Debug, Clone, Copy)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
    quant: LinearQuant,
}

impl Vector2 {
    /// Map-space positions: 1/8 unit over ±2^20 units.
    pub const DEFAULT_QUANT: LinearQuant = LinearQuant::new(-1_048_576.0, 1_048_576.0, 24);

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self::with_quant(x, y, Self::DEFAULT_QUANT)
    }

    #[must_use]
    pub const fn with_quant(x: f32, y: f32, quant: LinearQuant) -> Self {
        Self { x, y, quant }
    }

    #[must_use]
    pub const fn quant(&self) -> LinearQuant {
        self.quant
    }

    pub fn write_with(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        let codec = ScalarCodec::Linear(self.quant);
        write_scalar(codec, self.x, writer)?;
        write_scalar(codec, self.y, writer)
    }

    pub fn read_with(quant: LinearQuant, reader: &mut BitReader<'_>) -> CodecResult<Self> {
        let codec = ScalarCodec::Linear(quant);
        let x = read_scalar(codec, reader)?;
        let y = read_scalar(codec, reader)?;
        Ok(Self::with_quant(x, y, quant))
    }
}

impl Default for Vector2 {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl PartialEq for Vector2 {
    fn eq(&self, other: &Self) -> bool {
        let codec = ScalarCodec::Linear(self.quant);
        self.quant == other.quant
            && within_one_step(codec, self.x, other.x)
            && within_one_step(codec, self.y, other.y)
    }
}

impl Serializable for Vector2 {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        if self.quant != Self::DEFAULT_QUANT {
            return Err(CodecError::NonDefaultQuant { ty: "Vector2" });
        }
        self.write_with(writer)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Self::read_with(Self::DEFAULT_QUANT, reader)
    }
}

/// Two angles in radians (pitch and yaw), `x, y` on the wire.
///
/// Inputs may be any finite angle; decoded values are in `[0, 2π)`, and
/// congruent angles compare equal.
#[derive(Debug, Clone, Copy)]
pub struct Rotator2 {
    pub x: f32,
    pub y: f32,
    quant: AngleQuant,
}

impl Rotator2 {
    pub const DEFAULT_QUANT: AngleQuant = AngleQuant::new(16);

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self::with_quant(x, y, Self::DEFAULT_QUANT)
    }

    #[must_use]
    pub const fn with_quant(x: f32, y: f32, quant: AngleQuant) -> Self {
        Self { x, y, quant }
    }

    #[must_use]
    pub const fn quant(&self) -> AngleQuant {
        self.quant
    }

    pub fn write_with(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        let codec = ScalarCodec::Angle(self.quant);
        write_scalar(codec, self.x, writer)?;
        write_scalar(codec, self.y, writer)
    }

    pub fn read_with(quant: AngleQuant, reader: &mut BitReader<'_>) -> CodecResult<Self> {
        let codec = ScalarCodec::Angle(quant);
        let x = read_scalar(codec, reader)?;
        let y = read_scalar(codec, reader)?;
        Ok(Self::with_quant(x, y, quant))
    }
}

impl Default for Rotator2 {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl PartialEq for Rotator2 {
    fn eq(&self, other: &Self) -> bool {
        let codec = ScalarCodec::Angle(self.quant);
        self.quant == other.quant
            && within_one_step(codec, self.x, other.x)
            && within_one_step(codec, self.y, other.y)
    }
}

impl Serializable for Rotator2 {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        if self.quant != Self::DEFAULT_QUANT {
            return Err(CodecError::NonDefaultQuant { ty: "Rotator2" });
        }
        self.write_with(writer)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Self::read_with(Self::DEFAULT_QUANT, reader)
    }
}
