//! Message traits.
//!
//! Concrete messages implement [`MessageType`]. Every `MessageType` is also a
//! [`Message`], the object-safe view the factory hands out.

use std::any::Any;
use std::fmt;

use bitstream::{BitReader, BitWriter};
use codec::CodecResult;

use crate::error::WireResult;
use crate::Opcode;

/// Static description and body codec of a concrete message.
pub trait MessageType: Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Opcode written in front of the body.
    const OPCODE: Opcode;

    /// Human-readable message name.
    const NAME: &'static str;

    /// Writes the body, without the opcode.
    fn serialize_raw(&self, writer: &mut BitWriter<'_>) -> CodecResult<()>;

    /// Populates `self` from a body, without the opcode.
    ///
    /// Implementations decode every field before assigning any, so `self` is
    /// unchanged when an error is returned.
    fn deserialize_raw(&mut self, reader: &mut BitReader<'_>) -> CodecResult<()>;
}

/// Type-erased message.
pub trait Message: fmt::Debug + Send + Sync + Any {
    fn opcode(&self) -> Opcode;

    fn name(&self) -> &'static str;

    /// Writes the opcode followed by the body.
    fn serialize(&self, writer: &mut BitWriter<'_>) -> WireResult<()>;

    /// Populates the message from a body whose opcode was already consumed.
    fn deserialize_body(&mut self, reader: &mut BitReader<'_>) -> WireResult<()>;

    /// Equality across erased messages: same concrete type and equal values.
    fn dyn_eq(&self, other: &dyn Message) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: MessageType> Message for T {
    fn opcode(&self) -> Opcode {
        T::OPCODE
    }

    fn name(&self) -> &'static str {
        T::NAME
    }

    fn serialize(&self, writer: &mut BitWriter<'_>) -> WireResult<()> {
        T::OPCODE.write(writer)?;
        self.serialize_raw(writer)?;
        Ok(())
    }

    fn deserialize_body(&mut self, reader: &mut BitReader<'_>) -> WireResult<()> {
        self.deserialize_raw(reader)?;
        Ok(())
    }

    fn dyn_eq(&self, other: &dyn Message) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl PartialEq for dyn Message {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other)
    }
}

/// Recovers the concrete type of an erased message.
///
/// # Errors
///
/// Returns [`crate::WireError::TypeMismatch`] if `message` is not a `T`.
pub fn downcast<T: MessageType>(message: Box<dyn Message>) -> WireResult<T> {
    let found = message.name();
    message
        .into_any()
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| crate::WireError::TypeMismatch {
            expected: T::NAME,
            found,
        })
}
