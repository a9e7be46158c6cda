//! Error types for bitstream operations.

use std::fmt;

/// Result type for bitstream operations.
pub type BitResult<T> = Result<T, BitError>;

/// Errors that can occur during bit-level encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// Attempted to write past the buffer capacity.
    Overflow {
        /// Number of bits attempted to write.
        requested: usize,
        /// Number of bits left before the capacity is reached.
        available: usize,
    },

    /// Attempted to read past the written extent of the buffer.
    Underflow {
        /// Number of bits requested.
        requested: usize,
        /// Number of written bits left to read.
        available: usize,
    },

    /// Invalid bit count for the operation.
    InvalidBitCount {
        /// The invalid bit count provided.
        bits: usize,
        /// Maximum allowed bits for this operation.
        max_bits: usize,
    },

    /// String payload does not fit the length prefix.
    StringTooLong {
        /// Length of the string in bytes.
        len: usize,
        /// Maximum length representable by the prefix.
        max: usize,
    },

    /// String payload is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to write {requested} bits but only {available} bits of capacity left"
                )
            }
            Self::Underflow {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bits but only {available} bits available"
                )
            }
            Self::InvalidBitCount { bits, max_bits } => {
                write!(f, "invalid bit count {bits}, maximum allowed is {max_bits}")
            }
            Self::StringTooLong { len, max } => {
                write!(f, "string of {len} bytes exceeds the maximum of {max}")
            }
            Self::InvalidUtf8 => write!(f, "string payload is not valid utf-8"),
        }
    }
}

impl std::error::Error for BitError {}
