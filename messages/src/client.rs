//! Client to server messages.

use bitstream::{BitReader, BitWriter};
use codec::{
    apply_differential, generate_differential, CodecResult, Rotator2, Serializable, Vector3,
};
use wire::{MessageType, Opcode};

use crate::{ActionEvent, GameId, Mods};

/// Opens a session: the client's token and its mod load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticationRequest {
    pub token: String,
    pub mods: Mods,
}

impl MessageType for AuthenticationRequest {
    const OPCODE: Opcode = Opcode::new(1);
    const NAME: &'static str = "AuthenticationRequest";

    fn serialize_raw(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        self.token.serialize(writer)?;
        self.mods.serialize(writer)
    }

    fn deserialize_raw(&mut self, reader: &mut BitReader<'_>) -> CodecResult<()> {
        *self = Self {
            token: String::deserialize(reader)?,
            mods: Mods::deserialize(reader)?,
        };
        Ok(())
    }
}

/// Asks the server to assign a character to the client.
///
/// `latest_action` travels as a differential against
/// `ActionEvent::default()`, so unset fields cost one bit each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignCharacterRequest {
    pub cookie: u32,
    pub reference_id: GameId,
    pub form_id: GameId,
    pub cell_id: GameId,
    pub position: Vector3,
    pub rotation: Rotator2,
    pub appearance_buffer: String,
    pub latest_action: ActionEvent,
}

impl MessageType for AssignCharacterRequest {
    const OPCODE: Opcode = Opcode::new(2);
    const NAME: &'static str = "AssignCharacterRequest";

    fn serialize_raw(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        self.cookie.serialize(writer)?;
        self.reference_id.serialize(writer)?;
        self.form_id.serialize(writer)?;
        self.cell_id.serialize(writer)?;
        self.position.serialize(writer)?;
        self.rotation.serialize(writer)?;
        self.appearance_buffer.serialize(writer)?;
        generate_differential(&self.latest_action, &ActionEvent::default(), writer)?;
        Ok(())
    }

    fn deserialize_raw(&mut self, reader: &mut BitReader<'_>) -> CodecResult<()> {
        let cookie = u32::deserialize(reader)?;
        let reference_id = GameId::deserialize(reader)?;
        let form_id = GameId::deserialize(reader)?;
        let cell_id = GameId::deserialize(reader)?;
        let position = Vector3::deserialize(reader)?;
        let rotation = Rotator2::deserialize(reader)?;
        let appearance_buffer = String::deserialize(reader)?;
        let mut latest_action = ActionEvent::default();
        apply_differential(&mut latest_action, reader)?;
        *self = Self {
            cookie,
            reference_id,
            form_id,
            cell_id,
            position,
            rotation,
            appearance_buffer,
            latest_action,
        };
        Ok(())
    }
}

/// Withdraws a pending [`AssignCharacterRequest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CancelAssignmentRequest {
    pub cookie: u32,
}

impl MessageType for CancelAssignmentRequest {
    const OPCODE: Opcode = Opcode::new(3);
    const NAME: &'static str = "CancelAssignmentRequest";

    fn serialize_raw(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        self.cookie.serialize(writer)
    }

    fn deserialize_raw(&mut self, reader: &mut BitReader<'_>) -> CodecResult<()> {
        self.cookie = u32::deserialize(reader)?;
        Ok(())
    }
}

/// Removes a character the client owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveCharacterRequest {
    pub server_id: u32,
}

impl MessageType for RemoveCharacterRequest {
    const OPCODE: Opcode = Opcode::new(4);
    const NAME: &'static str = "RemoveCharacterRequest";

    fn serialize_raw(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        self.server_id.serialize(writer)
    }

    fn deserialize_raw(&mut self, reader: &mut BitReader<'_>) -> CodecResult<()> {
        self.server_id = u32::deserialize(reader)?;
        Ok(())
    }
}
