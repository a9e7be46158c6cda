//! Field codec and quantization definitions.

use std::f64::consts::TAU;

use crate::error::{SchemaError, SchemaResult};

/// Widest integer field a record may declare.
pub const MAX_INT_BITS: u8 = 64;

/// Widest quantized scalar a record may declare.
pub const MAX_SCALAR_BITS: u8 = 32;

/// Linear quantization of a float over a closed range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearQuant {
    /// Lowest representable value; inputs below are clamped.
    pub min: f32,
    /// Highest representable value; inputs above are clamped.
    pub max: f32,
    /// Bits per encoded value.
    pub bits: u8,
}

impl LinearQuant {
    /// Creates linear quantization parameters.
    #[must_use]
    pub const fn new(min: f32, max: f32, bits: u8) -> Self {
        Self { min, max, bits }
    }

    /// Largest raw value, `2^bits - 1`.
    #[must_use]
    pub const fn max_raw(&self) -> u64 {
        match 1u64.checked_shl(self.bits as u32) {
            Some(buckets) => buckets - 1,
            None => u64::MAX,
        }
    }

    /// Distance between two adjacent representable values.
    #[must_use]
    pub fn step(&self) -> f64 {
        (f64::from(self.max) - f64::from(self.min)) / self.max_raw() as f64
    }

    /// Checks the bit width and range.
    pub fn validate(&self) -> SchemaResult<()> {
        validate_scalar_bits(self.bits)?;
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(SchemaError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Full-turn quantization of an angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngleQuant {
    /// Bits per encoded angle.
    pub bits: u8,
}

impl AngleQuant {
    /// Creates angle quantization parameters.
    #[must_use]
    pub const fn new(bits: u8) -> Self {
        Self { bits }
    }

    /// Number of buckets in one full turn, `2^bits`.
    #[must_use]
    pub const fn buckets(&self) -> u64 {
        match 1u64.checked_shl(self.bits as u32) {
            Some(buckets) => buckets,
            None => u64::MAX,
        }
    }

    /// Angular distance between two adjacent representable values.
    #[must_use]
    pub fn step(&self) -> f64 {
        TAU / self.buckets() as f64
    }

    /// Checks the bit width.
    pub fn validate(&self) -> SchemaResult<()> {
        validate_scalar_bits(self.bits)
    }
}

/// Quantization applied to a float field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarCodec {
    /// Clamped affine mapping over `[min, max]`.
    Linear(LinearQuant),
    /// Wrapping mapping over `[0, 2π)`.
    Angle(AngleQuant),
}

impl ScalarCodec {
    /// Bits per encoded value.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        match self {
            Self::Linear(quant) => quant.bits,
            Self::Angle(quant) => quant.bits,
        }
    }

    /// Distance between two adjacent representable values.
    #[must_use]
    pub fn step(&self) -> f64 {
        match self {
            Self::Linear(quant) => quant.step(),
            Self::Angle(quant) => quant.step(),
        }
    }

    /// Checks the quantization parameters.
    pub fn validate(&self) -> SchemaResult<()> {
        match self {
            Self::Linear(quant) => quant.validate(),
            Self::Angle(quant) => quant.validate(),
        }
    }
}

/// The encoding for a record field (representation only).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldCodec {
    /// Boolean (1 bit).
    Bool,

    /// Unsigned integer with fixed bit width.
    UInt { bits: u8 },

    /// Signed integer with fixed bit width (two's complement).
    SInt { bits: u8 },

    /// Length-prefixed UTF-8 text.
    Text,

    /// Quantized float.
    Scalar(ScalarCodec),

    /// Nested structured record, serialized in full.
    Record,
}

impl FieldCodec {
    /// Creates a boolean field codec.
    #[must_use]
    pub const fn bool() -> Self {
        Self::Bool
    }

    /// Creates an unsigned integer field codec.
    #[must_use]
    pub const fn uint(bits: u8) -> Self {
        Self::UInt { bits }
    }

    /// Creates a signed integer field codec.
    #[must_use]
    pub const fn sint(bits: u8) -> Self {
        Self::SInt { bits }
    }

    /// Creates a text field codec.
    #[must_use]
    pub const fn text() -> Self {
        Self::Text
    }

    /// Creates a linearly quantized float field codec.
    #[must_use]
    pub const fn linear(min: f32, max: f32, bits: u8) -> Self {
        Self::Scalar(ScalarCodec::Linear(LinearQuant::new(min, max, bits)))
    }

    /// Creates a quantized angle field codec.
    #[must_use]
    pub const fn angle(bits: u8) -> Self {
        Self::Scalar(ScalarCodec::Angle(AngleQuant::new(bits)))
    }

    /// Checks widths and ranges.
    pub fn validate(&self) -> SchemaResult<()> {
        match self {
            Self::UInt { bits } | Self::SInt { bits } => {
                if *bits == 0 || *bits > MAX_INT_BITS {
                    return Err(SchemaError::InvalidBitWidth {
                        bits: *bits,
                        max: MAX_INT_BITS,
                    });
                }
                Ok(())
            }
            Self::Scalar(codec) => codec.validate(),
            Self::Bool | Self::Text | Self::Record => Ok(()),
        }
    }
}

/// Named field definition within a record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDef {
    pub name: String,
    pub codec: FieldCodec,
}

impl FieldDef {
    /// Creates a field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, codec: FieldCodec) -> Self {
        Self {
            name: name.into(),
            codec,
        }
    }
}

fn validate_scalar_bits(bits: u8) -> SchemaResult<()> {
    if bits == 0 || bits > MAX_SCALAR_BITS {
        return Err(SchemaError::InvalidBitWidth {
            bits,
            max: MAX_SCALAR_BITS,
        });
    }
    Ok(())
}
