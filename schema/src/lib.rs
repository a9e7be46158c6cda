//! Field codecs, quantization parameters and record layouts for ssync.
//!
//! This crate describes how records are represented on the wire:
//! - Quantization parameters for floats and angles
//! - Field codecs (bool, fixed-width integers, text, quantized scalars, nested records)
//! - Ordered record layouts and per-direction opcode tables
//! - Deterministic schema hashing
//!
//! # Design Principles
//!
//! - **Data, not code** - Layouts are plain values validated at construction.
//! - **Explicit order** - Field order is the wire order.
//! - **Deterministic hashing** - Schema hash is stable given the same definition.

mod error;
mod field;
mod hash;
mod schema;

pub use error::{SchemaError, SchemaResult};
pub use field::{
    AngleQuant, FieldCodec, FieldDef, LinearQuant, ScalarCodec, MAX_INT_BITS, MAX_SCALAR_BITS,
};
pub use hash::{layout_hash, schema_hash};
pub use schema::{Direction, MessageDef, RecordLayout, Schema, SchemaBuilder};
