//! # Primitive Codecs
//!
//! Leaf codecs with no inner codec: fixed-width integers, booleans, and raw bytes.
//!
//! Integers are big-endian, two's complement when signed.

use crate::codec::Codec;
use crate::codec::Width;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::error::Result;

/// Widest integer `IntCodec` supports, in bytes.
pub const MAX_INT_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signedness {
    Signed,
    Unsigned,
}

/// A fixed-width big-endian integer.
///
/// Values are carried as `i128`, which holds every signed and unsigned range
/// up to `MAX_INT_WIDTH` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntCodec {
    width: usize,
    signedness: Signedness,
}

impl IntCodec {
    pub fn new(width: usize, signedness: Signedness) -> Result<Self> {
        if width == 0 || width > MAX_INT_WIDTH {
            return Err(Error::UnsupportedWidth(width));
        }
        Ok(Self { width, signedness })
    }

    /// The VM's signed 4-byte integer.
    pub const fn int4() -> Self {
        Self::i32()
    }

    pub const fn u8() -> Self { Self { width: 1, signedness: Signedness::Unsigned } }
    pub const fn i8() -> Self { Self { width: 1, signedness: Signedness::Signed } }
    pub const fn u16() -> Self { Self { width: 2, signedness: Signedness::Unsigned } }
    pub const fn i16() -> Self { Self { width: 2, signedness: Signedness::Signed } }
    pub const fn u32() -> Self { Self { width: 4, signedness: Signedness::Unsigned } }
    pub const fn i32() -> Self { Self { width: 4, signedness: Signedness::Signed } }
    pub const fn u64() -> Self { Self { width: 8, signedness: Signedness::Unsigned } }
    pub const fn i64() -> Self { Self { width: 8, signedness: Signedness::Signed } }

    pub fn byte_width(&self) -> usize {
        self.width
    }

    pub fn signedness(&self) -> Signedness {
        self.signedness
    }

    /// Smallest representable value.
    pub fn min(&self) -> i128 {
        match self.signedness {
            Signedness::Unsigned => 0,
            Signedness::Signed => -(1i128 << (8 * self.width - 1)),
        }
    }

    /// Largest representable value.
    pub fn max(&self) -> i128 {
        match self.signedness {
            Signedness::Unsigned => (1i128 << (8 * self.width)) - 1,
            Signedness::Signed => (1i128 << (8 * self.width - 1)) - 1,
        }
    }
}

impl Codec for IntCodec {
    type Value = i128;

    fn width(&self) -> Width {
        Width::Fixed(self.width)
    }

    fn encode_into(&self, value: &i128, out: &mut Vec<u8>) -> Result<()> {
        if *value < self.min() || *value > self.max() {
            return Err(Error::Range {
                value: *value,
                width: self.width,
                signedness: self.signedness,
            });
        }
        // In range, so the low `width` bytes are the whole two's complement encoding.
        let be = value.to_be_bytes();
        out.extend_from_slice(&be[be.len() - self.width..]);
        Ok(())
    }

    fn decode_from(&self, cur: &mut Cursor<'_>) -> Result<i128> {
        let bytes = cur.read_bytes(self.width)?;
        let negative = self.signedness == Signedness::Signed && bytes[0] & 0x80 != 0;
        let mut buf = if negative { [0xFF; 16] } else { [0x00; 16] };
        buf[16 - self.width..].copy_from_slice(bytes);
        Ok(i128::from_be_bytes(buf))
    }
}

/// A single-byte boolean.
///
/// Encodes `0x00`/`0x01`. Decodes `0x00` as false and any other byte as true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    type Value = bool;

    fn width(&self) -> Width {
        Width::Fixed(1)
    }

    fn encode_into(&self, value: &bool, out: &mut Vec<u8>) -> Result<()> {
        out.push(*value as u8);
        Ok(())
    }

    fn decode_from(&self, cur: &mut Cursor<'_>) -> Result<bool> {
        match cur.read_byte()? {
            0 => Ok(false),
            _ => Ok(true),
        }
    }
}

/// Raw bytes, passed through unchanged.
///
/// The codec does not delimit itself: either the length is fixed at
/// construction, or it swallows the rest of the input and must come last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BytesCodec {
    len: Option<usize>,
}

impl BytesCodec {
    /// Exactly `len` bytes.
    pub const fn fixed(len: usize) -> Self {
        Self { len: Some(len) }
    }

    /// Everything up to the end of the input.
    pub const fn rest() -> Self {
        Self { len: None }
    }

    pub fn len(&self) -> Option<usize> {
        self.len
    }
}

impl Codec for BytesCodec {
    type Value = Vec<u8>;

    fn width(&self) -> Width {
        match self.len {
            Some(n) => Width::Fixed(n),
            None => Width::Unbounded,
        }
    }

    fn encode_into(&self, value: &Vec<u8>, out: &mut Vec<u8>) -> Result<()> {
        if let Some(n) = self.len {
            if value.len() != n {
                return Err(Error::LengthMismatch {
                    pos: out.len(),
                    expected: n,
                    found: value.len(),
                });
            }
        }
        out.extend_from_slice(value);
        Ok(())
    }

    fn decode_from(&self, cur: &mut Cursor<'_>) -> Result<Vec<u8>> {
        let bytes = match self.len {
            Some(n) => cur.read_bytes(n)?,
            None => cur.read_rest(),
        };
        Ok(bytes.to_vec())
    }
}
