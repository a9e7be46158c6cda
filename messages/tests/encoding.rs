use std::f32::consts::{PI, TAU};

use bitstream::{BitBuffer, BitReader, BitWriter};
use codec::{
    apply_differential, generate_differential, Rotator2, Serializable, Vector2, Vector3,
};
use messages::{
    client_message_factory, server_message_factory, ActionEvent, AssignCharacterRequest,
    AssignCharacterResponse, AuthenticationRequest, AuthenticationResponse,
    CancelAssignmentRequest, FullObjects, GameId, Mod, Mods, Objects, RemoveCharacterRequest,
    Scripts, MAX_MESSAGE_BYTES,
};
use wire::{downcast, Message, MessageType, Opcode, WireError, OPCODE_BITS};

fn roundtrip<T: Serializable>(value: &T) -> T {
    let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
    let mut writer = BitWriter::new(&mut buffer);
    value.serialize(&mut writer).unwrap();

    let mut reader = BitReader::new(&buffer);
    let decoded = T::deserialize(&mut reader).unwrap();
    assert!(reader.is_empty());
    decoded
}

/// Encodes `sent`, pops the opcode by hand and decodes the body into a fresh value.
fn packet_roundtrip<T: MessageType>(sent: &T) -> T {
    let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
    let mut writer = BitWriter::new(&mut buffer);
    Message::serialize(sent, &mut writer).unwrap();

    let mut reader = BitReader::new(&buffer);
    let opcode = reader.read_bits(OPCODE_BITS).unwrap();
    assert_eq!(opcode, u64::from(T::OPCODE.get()));

    let mut received = T::default();
    received.deserialize_raw(&mut reader).unwrap();
    assert!(reader.is_empty());
    received
}

fn sample_mods() -> Mods {
    Mods {
        standard_mods: vec![Mod::new("Hello", 42), Mod::new("Hi", 14)],
        lite_mods: vec![Mod::new("Test", 8), Mod::new("Toast", 49)],
    }
}

fn sample_action() -> ActionEvent {
    ActionEvent {
        tick: 48,
        actor_id: 12_345_678,
        action_id: 42,
        target_id: 963_741,
        idle_id: 87_964,
        state1: 6547,
        state2: 8963,
        kind: 4,
        event_name: "test".to_string(),
        target_event_name: "toast".to_string(),
    }
}

#[test]
fn factory_extracts_authentication_request() {
    let request = AuthenticationRequest {
        token: "TesSt".to_string(),
        ..AuthenticationRequest::default()
    };
    let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
    let mut writer = BitWriter::new(&mut buffer);
    Message::serialize(&request, &mut writer).unwrap();

    let factory = client_message_factory().unwrap();
    let mut reader = BitReader::new(&buffer);
    let message = factory.extract(&mut reader).unwrap();
    assert_eq!(message.opcode(), AuthenticationRequest::OPCODE);

    let received = downcast::<AuthenticationRequest>(message).unwrap();
    assert_eq!(received.token, request.token);
}

#[test]
fn id_lists_roundtrip() {
    let full = FullObjects::new(vec![42, 13]);
    assert_eq!(roundtrip(&full), full);
    let objects = Objects::new(vec![42, 13]);
    assert_eq!(roundtrip(&objects), objects);
    let scripts = Scripts::new(vec![42, 13]);
    assert_eq!(roundtrip(&scripts), scripts);
}

#[test]
fn game_id_roundtrip() {
    let id = GameId::new(1_456_987, 0x0078_9654);
    assert_eq!(roundtrip(&id), id);
}

#[test]
fn vector3_roundtrip() {
    let sent = Vector3::new(142.56, 45_687.7, -142.56);
    assert_eq!(roundtrip(&sent), sent);
}

#[test]
fn vector2_roundtrip() {
    let sent = Vector2::new(1000.89, -485_632.75);
    assert_eq!(roundtrip(&sent), sent);
}

#[test]
fn rotator2_roundtrip() {
    let sent = Rotator2::new(1.89, TAU);
    assert_eq!(roundtrip(&sent), sent);
}

#[test]
fn rotator2_roundtrip_needing_wrap() {
    let sent = Rotator2::new(-1.87, 18.0 * PI + 3.6);
    let received = roundtrip(&sent);
    assert_eq!(received, sent);
    assert!((0.0..TAU).contains(&received.x));
    assert!((0.0..TAU).contains(&received.y));
}

#[test]
fn action_event_full_differential() {
    let mut sent = sample_action();
    let mut received = ActionEvent::default();

    let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
    let mut writer = BitWriter::new(&mut buffer);
    let mask = generate_differential(&sent, &received, &mut writer).unwrap();
    assert_eq!(mask.count(), 10);
    let mut reader = BitReader::new(&buffer);
    apply_differential(&mut received, &mut reader).unwrap();
    assert_eq!(sent, received);

    sent.event_name = "Plot twist !".to_string();
    let mut writer = BitWriter::new(&mut buffer);
    let mask = generate_differential(&sent, &received, &mut writer).unwrap();
    assert_eq!(mask.changed_names::<ActionEvent>(), vec!["event_name"]);
    assert_eq!(writer.bits_written(), 10 + 16 + 12 * 8);

    let mut reader = BitReader::new(&buffer);
    apply_differential(&mut received, &mut reader).unwrap();
    assert_eq!(sent, received);
}

#[test]
fn mods_roundtrip() {
    let sent = sample_mods();
    assert_eq!(roundtrip(&sent), sent);
}

#[test]
fn authentication_request_packet() {
    let sent = AuthenticationRequest {
        token: "TesSt".to_string(),
        mods: sample_mods(),
    };
    assert_eq!(packet_roundtrip(&sent), sent);
}

#[test]
fn authentication_response_packet() {
    let sent = AuthenticationResponse {
        accepted: true,
        mods: sample_mods(),
        scripts: Scripts::new(vec![1, 2]),
        replicated_objects: FullObjects::new(vec![3, 4]),
    };
    assert_eq!(packet_roundtrip(&sent), sent);
}

#[test]
fn cancel_assignment_request_packet() {
    let sent = CancelAssignmentRequest { cookie: 14_523_698 };
    assert_eq!(packet_roundtrip(&sent), sent);
}

#[test]
fn remove_character_request_packet() {
    let sent = RemoveCharacterRequest {
        server_id: 14_523_698,
    };
    assert_eq!(packet_roundtrip(&sent), sent);
}

#[test]
fn assign_character_request_packet() {
    let sent = AssignCharacterRequest {
        cookie: 14_523_698,
        reference_id: GameId::new(4079, 456_799),
        form_id: GameId::new(48, 0),
        cell_id: GameId::new(0, 45),
        position: Vector3::new(-452.4, 452.4, 125_452.4),
        rotation: Rotator2::new(-1.87, 45.35),
        appearance_buffer: "toto".to_string(),
        latest_action: sample_action(),
    };
    assert_eq!(packet_roundtrip(&sent), sent);
}

#[test]
fn assign_character_response_packet() {
    let sent = AssignCharacterResponse {
        cookie: 7,
        owner: true,
        server_id: 99,
    };
    assert_eq!(packet_roundtrip(&sent), sent);
}

#[test]
fn every_client_message_dispatches() {
    let factory = client_message_factory().unwrap();
    let sent: Vec<Box<dyn Message>> = vec![
        Box::new(AuthenticationRequest {
            token: "TesSt".to_string(),
            mods: sample_mods(),
        }),
        Box::new(AssignCharacterRequest {
            cookie: 1,
            latest_action: sample_action(),
            ..AssignCharacterRequest::default()
        }),
        Box::new(CancelAssignmentRequest { cookie: 2 }),
        Box::new(RemoveCharacterRequest { server_id: 3 }),
    ];

    for message in &sent {
        let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
        let mut writer = BitWriter::new(&mut buffer);
        message.serialize(&mut writer).unwrap();

        let mut reader = BitReader::new(&buffer);
        let received = factory.extract(&mut reader).unwrap();
        assert_eq!(received.name(), message.name());
        assert!(*received == **message);
    }
}

#[test]
fn every_server_message_dispatches() {
    let factory = server_message_factory().unwrap();
    let sent: Vec<Box<dyn Message>> = vec![
        Box::new(AuthenticationResponse {
            accepted: true,
            ..AuthenticationResponse::default()
        }),
        Box::new(AssignCharacterResponse {
            cookie: 5,
            owner: false,
            server_id: 6,
        }),
    ];

    for message in &sent {
        let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
        let mut writer = BitWriter::new(&mut buffer);
        message.serialize(&mut writer).unwrap();

        let extracted = factory.extract_bytes(buffer.as_bytes()).unwrap();
        assert!(*extracted.message == **message);
        assert!(extracted.trailing_bits < 8);
    }
}

#[test]
fn unknown_opcode_is_rejected() {
    let factory = client_message_factory().unwrap();
    let buffer = BitBuffer::from_bytes(&[200]);
    let mut reader = BitReader::new(&buffer);
    assert_eq!(
        factory.extract(&mut reader).unwrap_err(),
        WireError::UnknownOpcode {
            opcode: Opcode::new(200)
        }
    );
}

#[test]
fn shared_opcode_across_directions_needs_the_right_factory() {
    let sent = AuthenticationResponse {
        accepted: true,
        ..AuthenticationResponse::default()
    };
    let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
    let mut writer = BitWriter::new(&mut buffer);
    Message::serialize(&sent, &mut writer).unwrap();

    // Opcode 1 means AuthenticationRequest to the client factory
    let factory = client_message_factory().unwrap();
    let mut reader = BitReader::new(&buffer);
    let result = factory.extract_as::<AuthenticationResponse>(&mut reader);
    assert!(result.is_err());
}

#[test]
fn truncated_assign_request_is_rejected() {
    let sent = AssignCharacterRequest {
        cookie: 1,
        appearance_buffer: "toto".to_string(),
        latest_action: sample_action(),
        ..AssignCharacterRequest::default()
    };
    let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
    let mut writer = BitWriter::new(&mut buffer);
    Message::serialize(&sent, &mut writer).unwrap();

    let bytes = buffer.as_bytes();
    let factory = client_message_factory().unwrap();
    for cut in [1, bytes.len() / 2, bytes.len() - 1] {
        let err = factory.extract_bytes(&bytes[..cut]).unwrap_err();
        assert!(matches!(err, WireError::Codec(_)), "cut at {cut}: {err}");
    }
}

#[test]
fn failed_body_decode_leaves_message_unchanged() {
    let sent = AssignCharacterRequest {
        cookie: 1,
        reference_id: GameId::new(4079, 456_799),
        appearance_buffer: "toto".to_string(),
        latest_action: sample_action(),
        ..AssignCharacterRequest::default()
    };
    let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
    let mut writer = BitWriter::new(&mut buffer);
    sent.serialize_raw(&mut writer).unwrap();

    let bytes = buffer.as_bytes();
    let truncated = BitBuffer::from_bytes(&bytes[..bytes.len() / 2]);
    let existing = AssignCharacterRequest {
        cookie: 77,
        appearance_buffer: "old".to_string(),
        ..AssignCharacterRequest::default()
    };
    let mut target = existing.clone();
    assert!(target.deserialize_raw(&mut BitReader::new(&truncated)).is_err());
    assert_eq!(target, existing);

    let response = AuthenticationResponse {
        accepted: true,
        mods: sample_mods(),
        ..AuthenticationResponse::default()
    };
    let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
    response.serialize_raw(&mut BitWriter::new(&mut buffer)).unwrap();
    let bytes = buffer.as_bytes();
    let truncated = BitBuffer::from_bytes(&bytes[..bytes.len() - 1]);
    let mut target = AuthenticationResponse::default();
    assert!(target.deserialize_body(&mut BitReader::new(&truncated)).is_err());
    assert_eq!(target, AuthenticationResponse::default());
}
