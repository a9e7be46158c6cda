//! The ssync message catalog.
//!
//! Concrete records and messages exchanged between game clients and the
//! server, plus the opcode tables used to dispatch them. Client and server
//! opcodes are independent: each direction has its own factory.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitBuffer, BitReader, BitWriter};
//! use messages::{client_message_factory, AuthenticationRequest};
//! use wire::Message;
//!
//! let request = AuthenticationRequest {
//!     token: "TesSt".to_string(),
//!     ..AuthenticationRequest::default()
//! };
//! let mut buffer = BitBuffer::new(64);
//! request.serialize(&mut BitWriter::new(&mut buffer)).unwrap();
//!
//! let factory = client_message_factory().unwrap();
//! let received = factory
//!     .extract_as::<AuthenticationRequest>(&mut BitReader::new(&buffer))
//!     .unwrap();
//! assert_eq!(received, request);
//! ```

mod action;
mod catalog;
mod client;
mod records;
mod server;

pub use action::ActionEvent;
pub use catalog::{catalog_hash, catalog_schema, client_message_factory, server_message_factory};
pub use client::{
    AssignCharacterRequest, AuthenticationRequest, CancelAssignmentRequest, RemoveCharacterRequest,
};
pub use records::{FullObjects, GameId, Mod, Mods, Objects, Scripts};
pub use server::{AssignCharacterResponse, AuthenticationResponse};

/// Capacity of the buffer a single outgoing message is encoded into.
pub const MAX_MESSAGE_BYTES: usize = 1000;
