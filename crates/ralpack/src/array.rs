//! # Fixed-Size Array Codec
//!
//! `n` element encodings back to back, in index order. The length is part of
//! the codec, not the wire: there is no length prefix.

use crate::codec::Codec;
use crate::codec::Width;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayCodec<C> {
    inner: C,
    len: usize,
}

impl<C: Codec> ArrayCodec<C> {
    pub fn new(inner: C, len: usize) -> Self {
        Self { inner, len }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Encodes a borrowed slice of elements.
    ///
    /// # Errors
    /// Returns `Error::LengthMismatch` unless `items` holds exactly `len` elements.
    pub fn encode_slice_into(&self, items: &[C::Value], out: &mut Vec<u8>) -> Result<()> {
        if items.len() != self.len {
            return Err(Error::LengthMismatch {
                pos: out.len(),
                expected: self.len,
                found: items.len(),
            });
        }
        for item in items {
            self.inner.encode_into(item, out)?;
        }
        Ok(())
    }
}

impl<C: Codec> Codec for ArrayCodec<C> {
    type Value = Vec<C::Value>;

    fn width(&self) -> Width {
        self.inner.width().repeat(self.len)
    }

    fn encode_into(&self, value: &Vec<C::Value>, out: &mut Vec<u8>) -> Result<()> {
        self.encode_slice_into(value, out)
    }

    /// Decodes exactly `len` elements.
    ///
    /// # Errors
    /// Running out of input before the last element is complete yields
    /// `Error::LengthMismatch` with the count of elements decoded so far.
    /// Any other element failure is returned as is.
    fn decode_from(&self, cur: &mut Cursor<'_>) -> Result<Vec<C::Value>> {
        // Never trust `len` for the allocation beyond what the input could hold.
        let mut items = Vec::with_capacity(self.len.min(cur.remaining()));
        for decoded in 0..self.len {
            let start = cur.pos();
            match self.inner.decode_from(cur) {
                Ok(item) => items.push(item),
                Err(e) if e.is_underflow() => {
                    return Err(Error::LengthMismatch {
                        pos: start,
                        expected: self.len,
                        found: decoded,
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(items)
    }
}
