//! Deterministic schema hashing.

use blake3::Hasher;

use crate::{Direction, FieldCodec, RecordLayout, ScalarCodec, Schema};

/// Computes a deterministic fingerprint of a schema.
///
/// Two peers that compute the same hash agree on every field width, field
/// order and opcode assignment.
#[must_use]
pub fn schema_hash(schema: &Schema) -> u64 {
    let mut hasher = Hasher::new();
    write_u32(&mut hasher, schema.records.len() as u32);
    for layout in &schema.records {
        write_layout(&mut hasher, layout);
    }

    write_u32(&mut hasher, schema.messages.len() as u32);
    for message in &schema.messages {
        write_u8(&mut hasher, direction_tag(message.direction));
        write_u8(&mut hasher, message.opcode);
        write_str(&mut hasher, &message.name);
    }

    finish(&hasher)
}

/// Computes the fingerprint of a single record layout.
#[must_use]
pub fn layout_hash(layout: &RecordLayout) -> u64 {
    let mut hasher = Hasher::new();
    write_layout(&mut hasher, layout);
    finish(&hasher)
}

fn finish(hasher: &Hasher) -> u64 {
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

fn write_layout(hasher: &mut Hasher, layout: &RecordLayout) {
    write_str(hasher, &layout.name);
    write_u32(hasher, layout.fields.len() as u32);
    for field in &layout.fields {
        write_str(hasher, &field.name);
        write_codec(hasher, field.codec);
    }
}

fn write_codec(hasher: &mut Hasher, codec: FieldCodec) {
    match codec {
        FieldCodec::Bool => {
            write_u8(hasher, 0);
        }
        FieldCodec::UInt { bits } => {
            write_u8(hasher, 1);
            write_u8(hasher, bits);
        }
        FieldCodec::SInt { bits } => {
            write_u8(hasher, 2);
            write_u8(hasher, bits);
        }
        FieldCodec::Text => {
            write_u8(hasher, 3);
        }
        FieldCodec::Scalar(ScalarCodec::Linear(quant)) => {
            write_u8(hasher, 4);
            write_u32(hasher, quant.min.to_bits());
            write_u32(hasher, quant.max.to_bits());
            write_u8(hasher, quant.bits);
        }
        FieldCodec::Scalar(ScalarCodec::Angle(quant)) => {
            write_u8(hasher, 5);
            write_u8(hasher, quant.bits);
        }
        FieldCodec::Record => {
            write_u8(hasher, 6);
        }
    }
}

const fn direction_tag(direction: Direction) -> u8 {
    match direction {
        Direction::ClientToServer => 0,
        Direction::ServerToClient => 1,
    }
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}
