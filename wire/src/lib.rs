//! Message framing and dispatch for the ssync protocol.
//!
//! Every message on the wire is an 8-bit [`Opcode`] followed by the body of
//! the message type registered for it. This crate defines the message traits,
//! the framing, and the [`MessageFactory`] that reconstructs concrete messages
//! from an undifferentiated buffer. It does not know the message catalog.
//!
//! # Design Principles
//!
//! - **One buffer, one message** - Trailing bits after a body are ignored.
//! - **Immutable dispatch** - The opcode table is fixed once built.
//! - **No reinterpretation** - A downcast to the wrong type is an error.

mod error;
mod factory;
mod message;
mod opcode;

pub use error::{WireError, WireResult};
pub use factory::{Extracted, MessageFactory, MessageFactoryBuilder};
pub use message::{downcast, Message, MessageType};
pub use opcode::{Opcode, OPCODE_BITS};
