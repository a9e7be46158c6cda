//! Value codecs for the ssync protocol.
//!
//! This crate sits between the raw [`bitstream`] and message framing and
//! provides everything a message body is built from.
//!
//! # Features
//!
//! - Linear and wrapping-angle scalar quantization
//! - Quantized geometry types: [`Vector3`], [`Vector2`], [`Rotator2`]
//! - Structured records through [`Serializable`], including counted collections
//! - Differential encoding of [`Differential`] records against a baseline
//!
//! # Design Principles
//!
//! - **Layouts are data** - Differential field order lives in a const table.
//! - **Atomic apply** - A failed differential leaves the target untouched.
//! - **Deterministic** - Same inputs produce same bits.

mod delta;
mod error;
mod geometry;
pub mod quant;
mod record;

pub use delta::{
    apply_differential, field_mask, generate_differential, layout_of, Access, DiffField,
    Differential, FieldMask,
};
pub use error::{CodecError, CodecResult, ValueReason};
pub use geometry::{Rotator2, Vector2, Vector3};
pub use record::{read_count, write_count, Serializable, COUNT_BITS, MAX_COUNT};
