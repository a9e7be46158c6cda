//! Server to client messages.

use bitstream::{BitReader, BitWriter};
use codec::{CodecResult, Serializable};
use wire::{MessageType, Opcode};

use crate::{FullObjects, Mods, Scripts};

/// Answers an [`AuthenticationRequest`](crate::AuthenticationRequest).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticationResponse {
    pub accepted: bool,
    pub mods: Mods,
    pub scripts: Scripts,
    pub replicated_objects: FullObjects,
}

impl MessageType for AuthenticationResponse {
    const OPCODE: Opcode = Opcode::new(1);
    const NAME: &'static str = "AuthenticationResponse";

    fn serialize_raw(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        self.accepted.serialize(writer)?;
        self.mods.serialize(writer)?;
        self.scripts.serialize(writer)?;
        self.replicated_objects.serialize(writer)
    }

    fn deserialize_raw(&mut self, reader: &mut BitReader<'_>) -> CodecResult<()> {
        *self = Self {
            accepted: bool::deserialize(reader)?,
            mods: Mods::deserialize(reader)?,
            scripts: Scripts::deserialize(reader)?,
            replicated_objects: FullObjects::deserialize(reader)?,
        };
        Ok(())
    }
}

/// Answers an [`AssignCharacterRequest`](crate::AssignCharacterRequest).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignCharacterResponse {
    pub cookie: u32,
    /// `true` if the requesting client simulates the character.
    pub owner: bool,
    pub server_id: u32,
}

impl MessageType for AssignCharacterResponse {
    const OPCODE: Opcode = Opcode::new(2);
    const NAME: &'static str = "AssignCharacterResponse";

    fn serialize_raw(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        self.cookie.serialize(writer)?;
        self.owner.serialize(writer)?;
        self.server_id.serialize(writer)
    }

    fn deserialize_raw(&mut self, reader: &mut BitReader<'_>) -> CodecResult<()> {
        *self = Self {
            cookie: u32::deserialize(reader)?,
            owner: bool::deserialize(reader)?,
            server_id: u32::deserialize(reader)?,
        };
        Ok(())
    }
}
