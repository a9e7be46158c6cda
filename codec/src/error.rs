//! Error types for codec operations.

use std::fmt;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding records.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Bitstream error.
    Bitstream(bitstream::BitError),

    /// Invalid record layout or quantization parameters.
    Schema(schema::SchemaError),

    /// Field value cannot be represented by its declared encoding.
    InvalidValue {
        field: &'static str,
        reason: ValueReason,
    },

    /// Collection has more elements than the count prefix can carry.
    CountOverflow { len: usize, max: usize },

    /// Geometry value carries a quantization its `Serializable` impl cannot
    /// decode; use its `write_with`/`read_with` pair instead.
    NonDefaultQuant { ty: &'static str },
}

/// Details for invalid value errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueReason {
    UnsignedOutOfRange { bits: u8, value: u64 },
    SignedOutOfRange { bits: u8, value: i64 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::Schema(e) => write!(f, "schema error: {e}"),
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid value for `{field}`: {reason}")
            }
            Self::CountOverflow { len, max } => {
                write!(f, "collection of {len} elements exceeds the maximum of {max}")
            }
            Self::NonDefaultQuant { ty } => {
                write!(f, "`{ty}` has a non-default quantization")
            }
        }
    }
}

impl fmt::Display for ValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsignedOutOfRange { bits, value } => {
                write!(f, "unsigned value {value} does not fit in {bits} bits")
            }
            Self::SignedOutOfRange { bits, value } => {
                write!(f, "signed value {value} does not fit in {bits} bits")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(e) => Some(e),
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bitstream::BitError> for CodecError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

impl From<schema::SchemaError> for CodecError {
    fn from(err: schema::SchemaError) -> Self {
        Self::Schema(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_value() {
        let err = CodecError::InvalidValue {
            field: "kind",
            reason: ValueReason::UnsignedOutOfRange {
                bits: 8,
                value: 300,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("kind"), "should mention field");
        assert!(msg.contains("300"), "should mention value");
    }

    #[test]
    fn error_display_count_overflow() {
        let err = CodecError::CountOverflow {
            len: 70_000,
            max: 65_535,
        };
        assert!(err.to_string().contains("70000"));
    }

    #[test]
    fn error_display_non_default_quant() {
        let err = CodecError::NonDefaultQuant { ty: "Vector3" };
        assert!(err.to_string().contains("Vector3"));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn error_from_bitstream_error() {
        let bit_err = bitstream::BitError::Underflow {
            requested: 1,
            available: 0,
        };
        let codec_err: CodecError = bit_err.into();
        assert!(matches!(codec_err, CodecError::Bitstream(_)));
        assert!(std::error::Error::source(&codec_err).is_some());
    }

    #[test]
    fn error_from_schema_error() {
        let schema_err = schema::SchemaError::InvalidBitWidth { bits: 0, max: 32 };
        let codec_err: CodecError = schema_err.into();
        assert!(matches!(codec_err, CodecError::Schema(_)));
    }

    #[test]
    fn error_source_none_for_others() {
        let err = CodecError::CountOverflow { len: 1, max: 0 };
        assert!(std::error::Error::source(&err).is_none());
    }
}
