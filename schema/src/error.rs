//! Schema validation errors.

use std::fmt;

use crate::Direction;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Bit width outside the range supported by the field codec.
    InvalidBitWidth { bits: u8, max: u8 },

    /// Quantization range is empty, inverted or not finite.
    InvalidRange { min: f32, max: f32 },

    /// Two fields of one record share a name.
    DuplicateField { record: String, field: String },

    /// Record declares no fields.
    EmptyLayout { record: String },

    /// Two record layouts share a name.
    DuplicateRecord { record: String },

    /// Two messages in the same direction share an opcode.
    DuplicateOpcode { opcode: u8, direction: Direction },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBitWidth { bits, max } => {
                write!(f, "invalid bit width {bits}, expected 1..={max}")
            }
            Self::InvalidRange { min, max } => {
                write!(f, "invalid quantization range [{min}, {max}]")
            }
            Self::DuplicateField { record, field } => {
                write!(f, "duplicate field `{field}` in record `{record}`")
            }
            Self::EmptyLayout { record } => write!(f, "record `{record}` has no fields"),
            Self::DuplicateRecord { record } => write!(f, "duplicate record `{record}`"),
            Self::DuplicateOpcode { opcode, direction } => {
                write!(f, "duplicate opcode {opcode} for {direction} messages")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
