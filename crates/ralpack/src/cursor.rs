use crate::error::Error;
use crate::error::Result;

/// A bounds-checked read position within a borrowed buffer.
///
/// Decoders thread one cursor through every nested codec, so the offset
/// reported by an error is always relative to the start of the whole input.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        Self { slice, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.slice.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail of the buffer.
    pub fn as_slice(&self) -> &'a [u8] {
        &self.slice[self.pos..]
    }

    #[inline]
    fn need(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            Err(Error::Underflow {
                pos: self.pos,
                expected: n,
                available: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        self.need(1)?;
        let byte = self.slice[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads a one-byte variant tag. Fails with `EmptyInput` rather than `Underflow`.
    pub fn read_discriminator(&mut self) -> Result<u8> {
        if self.is_empty() {
            return Err(Error::EmptyInput { pos: self.pos });
        }
        self.read_byte()
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.need(len)?;
        let slice = &self.slice[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Consumes everything that is left.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = self.as_slice();
        self.pos = self.slice.len();
        rest
    }
}
