//! Record layouts, message tables and validation.

use std::collections::HashSet;
use std::fmt;

use crate::error::{SchemaError, SchemaResult};
use crate::{FieldCodec, FieldDef};

/// Ordered field list of a record.
///
/// The order is the wire order: a differential presence mask has one bit per
/// field in this order, and changed values follow in the same order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordLayout {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl RecordLayout {
    /// Creates a layout with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field to the layout.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, codec: FieldCodec) -> Self {
        self.fields.push(FieldDef::new(name, codec));
        self
    }

    /// Number of fields, which is also the width of the presence mask.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the named field, if present.
    #[must_use]
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|def| def.name == field)
    }

    /// Validates layout invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.fields.is_empty() {
            return Err(SchemaError::EmptyLayout {
                record: self.name.clone(),
            });
        }
        let mut names = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    record: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            field.codec.validate()?;
        }
        Ok(())
    }
}

/// Direction a message travels in. Opcodes are unique per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientToServer => f.write_str("client-to-server"),
            Self::ServerToClient => f.write_str("server-to-client"),
        }
    }
}

/// A message entry in an opcode table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageDef {
    pub opcode: u8,
    pub name: String,
    pub direction: Direction,
}

impl MessageDef {
    #[must_use]
    pub fn new(opcode: u8, name: impl Into<String>, direction: Direction) -> Self {
        Self {
            opcode,
            name: name.into(),
            direction,
        }
    }
}

/// A protocol description: record layouts plus both opcode tables.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    pub records: Vec<RecordLayout>,
    pub messages: Vec<MessageDef>,
}

impl Schema {
    /// Creates a schema after validation.
    pub fn new(records: Vec<RecordLayout>, messages: Vec<MessageDef>) -> SchemaResult<Self> {
        let schema = Self { records, messages };
        schema.validate()?;
        Ok(schema)
    }

    /// Creates a schema builder.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Looks up a record layout by name.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&RecordLayout> {
        self.records.iter().find(|layout| layout.name == name)
    }

    /// Iterates the messages travelling in `direction`.
    pub fn messages_for(&self, direction: Direction) -> impl Iterator<Item = &MessageDef> {
        self.messages
            .iter()
            .filter(move |def| def.direction == direction)
    }

    /// Validates schema invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        let mut record_names = HashSet::new();
        for layout in &self.records {
            if !record_names.insert(layout.name.as_str()) {
                return Err(SchemaError::DuplicateRecord {
                    record: layout.name.clone(),
                });
            }
            layout.validate()?;
        }

        let mut opcodes = HashSet::new();
        for message in &self.messages {
            if !opcodes.insert((message.direction, message.opcode)) {
                return Err(SchemaError::DuplicateOpcode {
                    opcode: message.opcode,
                    direction: message.direction,
                });
            }
        }
        Ok(())
    }
}

/// Builder for `Schema`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    records: Vec<RecordLayout>,
    messages: Vec<MessageDef>,
}

impl SchemaBuilder {
    /// Adds a record layout.
    #[must_use]
    pub fn record(mut self, layout: RecordLayout) -> Self {
        self.records.push(layout);
        self
    }

    /// Adds a message to an opcode table.
    #[must_use]
    pub fn message(mut self, opcode: u8, name: impl Into<String>, direction: Direction) -> Self {
        self.messages.push(MessageDef::new(opcode, name, direction));
        self
    }

    /// Builds the schema after validation.
    pub fn build(self) -> SchemaResult<Schema> {
        Schema::new(self.records, self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_layout() -> RecordLayout {
        RecordLayout::new("ActionEvent")
            .field("tick", FieldCodec::uint(64))
            .field("actor_id", FieldCodec::uint(32))
            .field("event_name", FieldCodec::text())
    }

    #[test]
    fn schema_builder_roundtrip() {
        let schema = Schema::builder()
            .record(action_layout())
            .message(1, "AuthenticationRequest", Direction::ClientToServer)
            .message(1, "AuthenticationResponse", Direction::ServerToClient)
            .build()
            .unwrap();
        assert_eq!(schema.records.len(), 1);
        assert_eq!(schema.messages_for(Direction::ServerToClient).count(), 1);
        assert_eq!(schema.record("ActionEvent").unwrap().len(), 3);
    }

    #[test]
    fn layout_index_of() {
        let layout = action_layout();
        assert_eq!(layout.index_of("event_name"), Some(2));
        assert_eq!(layout.index_of("missing"), None);
    }

    #[test]
    fn layout_rejects_empty() {
        let err = RecordLayout::new("Nothing").validate().unwrap_err();
        assert!(matches!(err, SchemaError::EmptyLayout { .. }));
    }

    #[test]
    fn layout_rejects_duplicate_fields() {
        let layout = RecordLayout::new("Twice")
            .field("a", FieldCodec::bool())
            .field("a", FieldCodec::uint(8));
        let err = layout.validate().unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                record: "Twice".to_string(),
                field: "a".to_string(),
            }
        );
    }

    #[test]
    fn layout_rejects_invalid_codec() {
        let layout = RecordLayout::new("Bad").field("x", FieldCodec::linear(1.0, 1.0, 8));
        let err = layout.validate().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidRange { .. }));
    }

    #[test]
    fn schema_rejects_duplicate_records() {
        let err = Schema::new(vec![action_layout(), action_layout()], Vec::new()).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateRecord { .. }));
    }

    #[test]
    fn schema_rejects_duplicate_opcode_in_one_direction() {
        let err = Schema::builder()
            .message(3, "A", Direction::ClientToServer)
            .message(3, "B", Direction::ClientToServer)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateOpcode {
                opcode: 3,
                direction: Direction::ClientToServer,
            }
        );
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::ClientToServer.to_string(), "client-to-server");
        assert_eq!(Direction::ServerToClient.to_string(), "server-to-client");
    }
}
