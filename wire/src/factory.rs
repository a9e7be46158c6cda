//! Opcode table and message extraction.

use std::collections::BTreeMap;

use bitstream::{BitBuffer, BitReader};
use schema::{Direction, MessageDef};
use tracing::{debug, trace};

use crate::error::{WireError, WireResult};
use crate::message::{downcast, Message, MessageType};
use crate::Opcode;

type Constructor = fn() -> Box<dyn Message>;

fn construct<T: MessageType>() -> Box<dyn Message> {
    Box::<T>::default()
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    name: &'static str,
    construct: Constructor,
}

/// A message decoded from a buffer, with the number of bits it occupied.
#[derive(Debug)]
pub struct Extracted {
    pub message: Box<dyn Message>,
    /// Bits consumed, opcode included.
    pub bits: usize,
    /// Bits left unread after the body.
    pub trailing_bits: usize,
}

/// Immutable opcode table for one direction of traffic.
///
/// Built once with [`MessageFactory::builder`]. Extraction reads the opcode,
/// constructs an empty message of the registered type and lets it decode its
/// own body.
#[derive(Debug, Clone)]
pub struct MessageFactory {
    entries: BTreeMap<Opcode, Entry>,
}

impl MessageFactory {
    #[must_use]
    pub fn builder() -> MessageFactoryBuilder {
        MessageFactoryBuilder::default()
    }

    /// Returns `true` if a message type is registered for `opcode`.
    #[must_use]
    pub fn contains(&self, opcode: Opcode) -> bool {
        self.entries.contains_key(&opcode)
    }

    /// Name of the message registered for `opcode`.
    #[must_use]
    pub fn name_of(&self, opcode: Opcode) -> Option<&'static str> {
        self.entries.get(&opcode).map(|entry| entry.name)
    }

    /// Registered opcodes in ascending order.
    pub fn opcodes(&self) -> impl Iterator<Item = Opcode> + '_ {
        self.entries.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Describes the table as schema message entries.
    #[must_use]
    pub fn message_defs(&self, direction: Direction) -> Vec<MessageDef> {
        self.entries
            .iter()
            .map(|(opcode, entry)| MessageDef::new(opcode.get(), entry.name, direction))
            .collect()
    }

    /// Reads an opcode and decodes the message registered for it.
    ///
    /// Bits after the body are left unread.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnknownOpcode`] for an unregistered opcode and
    /// [`WireError::Codec`] if the body is truncated or malformed.
    pub fn extract(&self, reader: &mut BitReader<'_>) -> WireResult<Box<dyn Message>> {
        let opcode = Opcode::read(reader)?;
        let Some(entry) = self.entries.get(&opcode) else {
            debug!(%opcode, "no message registered for opcode");
            return Err(WireError::UnknownOpcode { opcode });
        };

        let mut message = (entry.construct)();
        if let Err(err) = message.deserialize_body(reader) {
            debug!(%opcode, name = entry.name, error = %err, "message body rejected");
            return Err(err);
        }
        trace!(
            %opcode,
            name = entry.name,
            bits = reader.bit_position(),
            "extracted message"
        );
        Ok(message)
    }

    /// Extracts a message and recovers its concrete type.
    ///
    /// # Errors
    ///
    /// As [`MessageFactory::extract`], plus [`WireError::TypeMismatch`] if the
    /// opcode belongs to another type.
    pub fn extract_as<T: MessageType>(&self, reader: &mut BitReader<'_>) -> WireResult<T> {
        let message = self.extract(reader)?;
        downcast::<T>(message).map_err(|err| {
            debug!(error = %err, "extracted message has unexpected type");
            err
        })
    }

    /// Extracts the single message carried by `bytes`.
    pub fn extract_bytes(&self, bytes: &[u8]) -> WireResult<Extracted> {
        let buffer = BitBuffer::from_bytes(bytes);
        let mut reader = BitReader::new(&buffer);
        let message = self.extract(&mut reader)?;
        Ok(Extracted {
            message,
            bits: reader.bit_position(),
            trailing_bits: reader.bits_remaining(),
        })
    }
}

/// Builder for `MessageFactory`.
#[derive(Debug, Default)]
pub struct MessageFactoryBuilder {
    entries: Vec<(Opcode, Entry)>,
}

impl MessageFactoryBuilder {
    /// Registers `T` under `T::OPCODE`.
    #[must_use]
    pub fn register<T: MessageType>(mut self) -> Self {
        self.entries.push((
            T::OPCODE,
            Entry {
                name: T::NAME,
                construct: construct::<T>,
            },
        ));
        self
    }

    /// Builds the table.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::DuplicateOpcode`] if two registered types share an
    /// opcode.
    pub fn build(self) -> WireResult<MessageFactory> {
        let mut entries = BTreeMap::new();
        for (opcode, entry) in self.entries {
            if let Some(existing) = entries.insert(opcode, entry) {
                return Err(WireError::DuplicateOpcode {
                    opcode,
                    existing: existing.name,
                    added: entry.name,
                });
            }
        }
        Ok(MessageFactory { entries })
    }
}
