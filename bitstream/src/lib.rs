//! Fixed-capacity bit buffer for the ssync wire protocol.
//!
//! This crate provides [`BitBuffer`] plus the [`BitWriter`] and [`BitReader`]
//! views used by every other encoder in the workspace.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Fixed capacity** - Buffers never grow; exceeding capacity is an error.
//! - **No padding** - Fields are packed back to back, LSB-first.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitBuffer, BitReader, BitWriter};
//!
//! let mut buffer = BitBuffer::new(16);
//! let mut writer = BitWriter::new(&mut buffer);
//! writer.write_bool(true).unwrap();
//! writer.write_bits(42, 7).unwrap();
//! writer.write_string("hi").unwrap();
//!
//! let mut reader = BitReader::new(&buffer);
//! assert!(reader.read_bool().unwrap());
//! assert_eq!(reader.read_bits(7).unwrap(), 42);
//! assert_eq!(reader.read_string().unwrap(), "hi");
//! ```

mod buffer;
mod error;
mod reader;
mod writer;

pub use buffer::BitBuffer;
pub use error::{BitError, BitResult};
pub use reader::BitReader;
pub use writer::BitWriter;

/// Width of the byte-length prefix in front of strings and blobs.
pub const STRING_LENGTH_BITS: usize = 16;
