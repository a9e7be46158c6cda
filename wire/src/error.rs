//! Error types for message framing and dispatch.

use std::fmt;

use crate::Opcode;

/// Result type for wire operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors that can occur while framing or dispatching messages.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum WireError {
    /// Body encoding or decoding failed.
    Codec(codec::CodecError),

    /// No message type is registered for the opcode.
    UnknownOpcode { opcode: Opcode },

    /// A message was downcast to a type it is not.
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Two message types were registered under one opcode.
    DuplicateOpcode {
        opcode: Opcode,
        existing: &'static str,
        added: &'static str,
    },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "codec error: {e}"),
            Self::UnknownOpcode { opcode } => write!(f, "unknown opcode {opcode}"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected message {expected} but got {found}")
            }
            Self::DuplicateOpcode {
                opcode,
                existing,
                added,
            } => {
                write!(
                    f,
                    "opcode {opcode} registered for both {existing} and {added}"
                )
            }
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<codec::CodecError> for WireError {
    fn from(err: codec::CodecError) -> Self {
        Self::Codec(err)
    }
}

impl From<bitstream::BitError> for WireError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Codec(err.into())
    }
}
