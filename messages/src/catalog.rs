//! Opcode tables and the catalog description.

use codec::{layout_of, Rotator2, Vector2, Vector3};
use schema::{
    schema_hash, Direction, FieldCodec, RecordLayout, ScalarCodec, Schema, SchemaResult,
};
use wire::{MessageFactory, MessageType, WireResult};

use crate::{
    ActionEvent, AssignCharacterRequest, AssignCharacterResponse, AuthenticationRequest,
    AuthenticationResponse, CancelAssignmentRequest, RemoveCharacterRequest,
};

/// Factory for messages a server receives.
pub fn client_message_factory() -> WireResult<MessageFactory> {
    MessageFactory::builder()
        .register::<AuthenticationRequest>()
        .register::<AssignCharacterRequest>()
        .register::<CancelAssignmentRequest>()
        .register::<RemoveCharacterRequest>()
        .build()
}

/// Factory for messages a client receives.
pub fn server_message_factory() -> WireResult<MessageFactory> {
    MessageFactory::builder()
        .register::<AuthenticationResponse>()
        .register::<AssignCharacterResponse>()
        .build()
}

fn id_list_layout(name: &str) -> RecordLayout {
    RecordLayout::new(name).field("data", FieldCodec::Record)
}

fn axes_layout(layout: RecordLayout, axes: &[&str], codec: ScalarCodec) -> RecordLayout {
    axes.iter()
        .fold(layout, |layout, axis| layout.field(*axis, FieldCodec::Scalar(codec)))
}

/// Every record layout and opcode of the catalog, validated.
pub fn catalog_schema() -> SchemaResult<Schema> {
    let position = ScalarCodec::Linear(Vector3::DEFAULT_QUANT);
    let map = ScalarCodec::Linear(Vector2::DEFAULT_QUANT);
    let angle = ScalarCodec::Angle(Rotator2::DEFAULT_QUANT);

    Schema::builder()
        .record(axes_layout(RecordLayout::new("Vector3"), &["x", "y", "z"], position))
        .record(axes_layout(RecordLayout::new("Vector2"), &["x", "y"], map))
        .record(axes_layout(RecordLayout::new("Rotator2"), &["x", "y"], angle))
        .record(
            RecordLayout::new("GameId")
                .field("mod_id", FieldCodec::uint(32))
                .field("base_id", FieldCodec::uint(32)),
        )
        .record(
            RecordLayout::new("Mod")
                .field("filename", FieldCodec::text())
                .field("id", FieldCodec::uint(16)),
        )
        .record(
            RecordLayout::new("Mods")
                .field("standard_mods", FieldCodec::Record)
                .field("lite_mods", FieldCodec::Record),
        )
        .record(id_list_layout("Objects"))
        .record(id_list_layout("FullObjects"))
        .record(id_list_layout("Scripts"))
        .record(layout_of::<ActionEvent>())
        .record(
            RecordLayout::new(AuthenticationRequest::NAME)
                .field("token", FieldCodec::text())
                .field("mods", FieldCodec::Record),
        )
        .record(
            RecordLayout::new(AssignCharacterRequest::NAME)
                .field("cookie", FieldCodec::uint(32))
                .field("reference_id", FieldCodec::Record)
                .field("form_id", FieldCodec::Record)
                .field("cell_id", FieldCodec::Record)
                .field("position", FieldCodec::Record)
                .field("rotation", FieldCodec::Record)
                .field("appearance_buffer", FieldCodec::text())
                .field("latest_action", FieldCodec::Record),
        )
        .record(
            RecordLayout::new(CancelAssignmentRequest::NAME)
                .field("cookie", FieldCodec::uint(32)),
        )
        .record(
            RecordLayout::new(RemoveCharacterRequest::NAME)
                .field("server_id", FieldCodec::uint(32)),
        )
        .record(
            RecordLayout::new(AuthenticationResponse::NAME)
                .field("accepted", FieldCodec::bool())
                .field("mods", FieldCodec::Record)
                .field("scripts", FieldCodec::Record)
                .field("replicated_objects", FieldCodec::Record),
        )
        .record(
            RecordLayout::new(AssignCharacterResponse::NAME)
                .field("cookie", FieldCodec::uint(32))
                .field("owner", FieldCodec::bool())
                .field("server_id", FieldCodec::uint(32)),
        )
        .message(
            AuthenticationRequest::OPCODE.get(),
            AuthenticationRequest::NAME,
            Direction::ClientToServer,
        )
        .message(
            AssignCharacterRequest::OPCODE.get(),
            AssignCharacterRequest::NAME,
            Direction::ClientToServer,
        )
        .message(
            CancelAssignmentRequest::OPCODE.get(),
            CancelAssignmentRequest::NAME,
            Direction::ClientToServer,
        )
        .message(
            RemoveCharacterRequest::OPCODE.get(),
            RemoveCharacterRequest::NAME,
            Direction::ClientToServer,
        )
        .message(
            AuthenticationResponse::OPCODE.get(),
            AuthenticationResponse::NAME,
            Direction::ServerToClient,
        )
        .message(
            AssignCharacterResponse::OPCODE.get(),
            AssignCharacterResponse::NAME,
            Direction::ServerToClient,
        )
        .build()
}

/// Fingerprint of the catalog. Peers built from the same catalog agree.
pub fn catalog_hash() -> SchemaResult<u64> {
    Ok(schema_hash(&catalog_schema()?))
}
