//! # Option Codec
//!
//! Adapts any codec into a codec for optional values by prefixing a
//! one-byte presence discriminator.
//!
//! - `None`    → `[0x00]`
//! - `Some(v)` → `[0x01] ++ inner.encode(v)`
//!
//! Decoding treats `0x00` as `None` and every other byte as `Some`.

use crate::codec::Codec;
use crate::codec::Width;
use crate::cursor::Cursor;
use crate::error::Result;

/// Discriminator emitted for `None`.
pub const NONE: u8 = 0x00;
/// Discriminator emitted for `Some`.
pub const SOME: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptionCodec<C> {
    inner: C,
}

impl<C: Codec> OptionCodec<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Encodes an optional value held by reference.
    pub fn encode_ref_into(&self, value: Option<&C::Value>, out: &mut Vec<u8>) -> Result<()> {
        match value {
            None => out.push(NONE),
            Some(v) => {
                out.push(SOME);
                self.inner.encode_into(v, out)?;
            }
        }
        Ok(())
    }
}

impl<C: Codec> Codec for OptionCodec<C> {
    type Value = Option<C::Value>;

    fn width(&self) -> Width {
        match self.inner.width() {
            Width::Unbounded => Width::Unbounded,
            _ => Width::Delimited,
        }
    }

    fn encode_into(&self, value: &Option<C::Value>, out: &mut Vec<u8>) -> Result<()> {
        self.encode_ref_into(value.as_ref(), out)
    }

    fn decode_from(&self, cur: &mut Cursor<'_>) -> Result<Option<C::Value>> {
        match cur.read_discriminator()? {
            NONE => Ok(None),
            _ => Ok(Some(self.inner.decode_from(cur)?)),
        }
    }
}
