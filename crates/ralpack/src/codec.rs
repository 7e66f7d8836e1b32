//! # Codec
//!
//! The capability every encoder/decoder unit implements, plus the impls that
//! let codecs be owned, borrowed, shared, or composed into tuples.
//!
//! ## Invariants
//! - **Concatenation**: composites encode as the raw concatenation of their parts.
//!   There are no separators and no length prefixes.
//! - **Exactness**: `decode` consumes exactly the bytes `encode` produced.

use std::sync::Arc;

use crate::cursor::Cursor;
use crate::error::Error;
use crate::error::Result;

/// How many bytes a codec's encoding occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Always exactly this many bytes.
    Fixed(usize),
    /// Variable, but the encoding carries enough to find its own end.
    Delimited,
    /// Consumes all remaining input. Only valid as the last item of a composite.
    Unbounded,
}

impl Width {
    pub fn is_unbounded(self) -> bool {
        self == Width::Unbounded
    }

    /// Width of `self` followed by `next`.
    pub fn then(self, next: Width) -> Width {
        match (self, next) {
            (Width::Unbounded, _) | (_, Width::Unbounded) => Width::Unbounded,
            (Width::Fixed(a), Width::Fixed(b)) => a.checked_add(b).map_or(Width::Delimited, Width::Fixed),
            _ => Width::Delimited,
        }
    }

    /// Width of `n` back-to-back copies of `self`.
    pub fn repeat(self, n: usize) -> Width {
        match self {
            _ if n == 0 => Width::Fixed(0),
            Width::Fixed(w) => w.checked_mul(n).map_or(Width::Delimited, Width::Fixed),
            other => other,
        }
    }
}

/// A paired encode/decode capability for one shape of value.
///
/// Implementors only provide `width`, `encode_into`, and `decode_from`.
/// Codecs hold no mutable state; one instance may serve any number of
/// concurrent callers.
pub trait Codec {
    type Value;

    fn width(&self) -> Width;

    /// Appends the encoding of `value` to `out`.
    fn encode_into(&self, value: &Self::Value, out: &mut Vec<u8>) -> Result<()>;

    /// Reads one value, advancing the cursor past it.
    fn decode_from(&self, cur: &mut Cursor<'_>) -> Result<Self::Value>;

    fn encode(&self, value: &Self::Value) -> Result<Vec<u8>> {
        let mut out = match self.width() {
            Width::Fixed(n) => Vec::with_capacity(n),
            _ => Vec::new(),
        };
        self.encode_into(value, &mut out)?;
        Ok(out)
    }

    /// Decodes one value and returns it with the bytes that follow it.
    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<(Self::Value, &'a [u8])> {
        let mut cur = Cursor::new(bytes);
        let value = self.decode_from(&mut cur)?;
        Ok((value, cur.as_slice()))
    }

    /// Decodes one value that must span the whole input.
    fn decode_exact(&self, bytes: &[u8]) -> Result<Self::Value> {
        let mut cur = Cursor::new(bytes);
        let value = self.decode_from(&mut cur)?;
        if !cur.is_empty() {
            return Err(Error::TrailingBytes {
                pos: cur.pos(),
                remaining: cur.remaining(),
            });
        }
        Ok(value)
    }
}

macro_rules! impl_codec_delegate {
    ($($ptr:ty),+) => {
        $(
            impl<C: Codec + ?Sized> Codec for $ptr {
                type Value = C::Value;

                #[inline]
                fn width(&self) -> Width {
                    (**self).width()
                }

                #[inline]
                fn encode_into(&self, value: &Self::Value, out: &mut Vec<u8>) -> Result<()> {
                    (**self).encode_into(value, out)
                }

                #[inline]
                fn decode_from(&self, cur: &mut Cursor<'_>) -> Result<Self::Value> {
                    (**self).decode_from(cur)
                }
            }
        )+
    };
}

impl_codec_delegate!(&C, Box<C>, Arc<C>);

/// Tuples of codecs are ordered-field struct codecs over tuples of values.
///
/// A failing field is reported as `Error::Field` carrying its position.
/// Only the last element may be `Width::Unbounded`; this is not checked for
/// tuples, use a `StructCodec` when fields come from metadata.
macro_rules! impl_tuple_codec {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Codec),+> Codec for ($($name,)+) {
            type Value = ($($name::Value,)+);

            fn width(&self) -> Width {
                Width::Fixed(0)$(.then(self.$idx.width()))+
            }

            fn encode_into(&self, value: &Self::Value, out: &mut Vec<u8>) -> Result<()> {
                $(
                    self.$idx
                        .encode_into(&value.$idx, out)
                        .map_err(|e| Error::field($idx, None, e))?;
                )+
                Ok(())
            }

            fn decode_from(&self, cur: &mut Cursor<'_>) -> Result<Self::Value> {
                Ok(($(
                    self.$idx
                        .decode_from(cur)
                        .map_err(|e| Error::field($idx, None, e))?,
                )+))
            }
        }
    };
}

impl_tuple_codec!(A 0);
impl_tuple_codec!(A 0, B 1);
impl_tuple_codec!(A 0, B 1, C 2);
impl_tuple_codec!(A 0, B 1, C 2, D 3);
impl_tuple_codec!(A 0, B 1, C 2, D 3, E 4);
impl_tuple_codec!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_tuple_codec!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_tuple_codec!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
