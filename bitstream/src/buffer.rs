//! Fixed-capacity byte storage shared by writers and readers.

/// A fixed-capacity byte buffer with a tracked written extent.
///
/// The capacity is chosen at construction and never grows. A [`BitWriter`]
/// advances the written extent; a [`BitReader`] may only consume bits inside it.
///
/// [`BitWriter`]: crate::BitWriter
/// [`BitReader`]: crate::BitReader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer {
    data: Box<[u8]>,
    /// Written extent in bits.
    bits_written: usize,
}

impl BitBuffer {
    /// Creates an empty buffer able to hold `capacity` bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            bits_written: 0,
        }
    }

    /// Creates a buffer holding received bytes; every bit counts as written.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: bytes.into(),
            bits_written: bytes.len() * 8,
        }
    }

    /// Returns the capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the capacity in bits.
    #[must_use]
    pub fn capacity_bits(&self) -> usize {
        self.data.len() * 8
    }

    /// Returns the written extent in bits.
    #[must_use]
    pub const fn bits_written(&self) -> usize {
        self.bits_written
    }

    /// Returns the number of bytes touched by the written extent.
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.bits_written.div_ceil(8)
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_written == 0
    }

    /// Returns the used bytes, ready to hand to a transport.
    ///
    /// Unused high bits of the last byte are zero.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.byte_len()]
    }

    /// Clears the contents and the written extent.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.bits_written = 0;
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub(crate) fn extend_written(&mut self, bit_pos: usize) {
        self.bits_written = self.bits_written.max(bit_pos);
    }
}
