//! Append-only bit accumulator.

use crate::error::UnalignedBits;

/// An appendable sequence of bits, packed big-endian into bytes.
///
/// Bits are only ever appended; there is no removal. The first appended bit
/// lands in the most significant bit of the first byte.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct BitBuffer {
    data: Vec<u8>,
    length: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            data: Vec::with_capacity(bits.div_ceil(8)),
            length: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the low `len` bits of `val`, most significant first.
    ///
    /// # Panics
    ///
    /// Panics if `len > 31` or if `val` has bits set above `len`.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0, "Value out of range");
        for i in (0..len).rev() {
            let shift = 7 - (self.length & 7);
            if shift == 7 {
                self.data.push(0);
            }
            let bit = ((val >> i) & 1) as u8;
            if let Some(last) = self.data.last_mut() {
                *last |= bit << shift;
            }
            self.length += 1;
        }
    }

    /// Appends every bit of `other` in order.
    pub fn append_buffer(&mut self, other: &BitBuffer) {
        for i in 0..other.len() {
            self.append_bits(u32::from(other.get(i)), 1);
        }
    }

    /// Returns the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.length, "Bit index out of range");
        (self.data[index >> 3] >> (7 - (index & 7))) & 1 != 0
    }

    /// Appends zero bits up to the next byte boundary.
    pub fn pad_to_byte(&mut self) {
        let numzerobits = self.length.wrapping_neg() & 7;
        self.append_bits(0, numzerobits as u8);
    }

    /// Returns the packed bytes, or an error if the length is not byte-aligned.
    pub fn to_bytes(&self) -> Result<Vec<u8>, UnalignedBits> {
        if self.length % 8 != 0 {
            return Err(UnalignedBits(self.length));
        }
        Ok(self.data.clone())
    }

    /// Consumes the buffer into its packed bytes, zero-filling the last
    /// partial byte if any.
    pub fn into_padded_bytes(self) -> Vec<u8> {
        self.data
    }
}
