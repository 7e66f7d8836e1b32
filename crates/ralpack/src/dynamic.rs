//! # Dynamic Codecs
//!
//! The closed set of codec shapes a `Registry` can build, operating on `Value`.
//! Each variant delegates to the typed codec of the same shape; composites
//! hold their children behind `Arc` so leaf instances can be shared.

use std::sync::Arc;

use crate::array::ArrayCodec;
use crate::codec::Codec;
use crate::codec::Width;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::error::Result;
use crate::option::OptionCodec;
use crate::prim::BoolCodec;
use crate::prim::BytesCodec;
use crate::prim::IntCodec;
use crate::value::Value;

#[derive(Debug)]
pub enum DynCodec {
    Int(IntCodec),
    Bool(BoolCodec),
    Bytes(BytesCodec),
    Option(OptionCodec<Arc<DynCodec>>),
    Array(ArrayCodec<Arc<DynCodec>>),
    Struct(StructCodec),
}

impl DynCodec {
    fn expected(&self) -> &'static str {
        match self {
            DynCodec::Int(_) => "int",
            DynCodec::Bool(_) => "bool",
            DynCodec::Bytes(_) => "bytes",
            DynCodec::Option(_) => "option",
            DynCodec::Array(_) => "array",
            DynCodec::Struct(_) => "struct",
        }
    }

    fn mismatch(&self, found: &Value) -> Error {
        Error::TypeMismatch {
            expected: self.expected(),
            found: found.kind(),
        }
    }
}

impl Codec for DynCodec {
    type Value = Value;

    fn width(&self) -> Width {
        match self {
            DynCodec::Int(c) => c.width(),
            DynCodec::Bool(c) => c.width(),
            DynCodec::Bytes(c) => c.width(),
            DynCodec::Option(c) => c.width(),
            DynCodec::Array(c) => c.width(),
            DynCodec::Struct(c) => c.width(),
        }
    }

    fn encode_into(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        match (self, value) {
            (DynCodec::Int(c), Value::Int(v)) => c.encode_into(v, out),
            (DynCodec::Bool(c), Value::Bool(v)) => c.encode_into(v, out),
            (DynCodec::Bytes(c), Value::Bytes(v)) => c.encode_into(v, out),
            (DynCodec::Option(c), Value::Option(v)) => c.encode_ref_into(v.as_deref(), out),
            (DynCodec::Array(c), Value::Array(items)) => c.encode_slice_into(items, out),
            (DynCodec::Struct(c), Value::Struct(fields)) => c.encode_fields_into(fields, out),
            (codec, value) => Err(codec.mismatch(value)),
        }
    }

    fn decode_from(&self, cur: &mut Cursor<'_>) -> Result<Value> {
        Ok(match self {
            DynCodec::Int(c) => Value::Int(c.decode_from(cur)?),
            DynCodec::Bool(c) => Value::Bool(c.decode_from(cur)?),
            DynCodec::Bytes(c) => Value::Bytes(c.decode_from(cur)?),
            DynCodec::Option(c) => Value::Option(c.decode_from(cur)?.map(Box::new)),
            DynCodec::Array(c) => Value::Array(c.decode_from(cur)?),
            DynCodec::Struct(c) => Value::Struct(c.decode_fields_from(cur)?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct StructField {
    pub name: String,
    pub codec: Arc<DynCodec>,
}

/// Ordered, named fields encoded back to back in declaration order.
#[derive(Debug, Clone)]
pub struct StructCodec {
    fields: Vec<StructField>,
    width: Width,
}

impl StructCodec {
    /// # Errors
    /// Returns `Error::UnframedField` if any field but the last consumes the rest of the input.
    pub fn new(fields: Vec<StructField>) -> Result<Self> {
        let last = fields.len().saturating_sub(1);
        let mut width = Width::Fixed(0);
        for (index, field) in fields.iter().enumerate() {
            let w = field.codec.width();
            if w.is_unbounded() && index != last {
                return Err(Error::UnframedField { index });
            }
            width = width.then(w);
        }
        Ok(Self { fields, width })
    }

    pub fn fields(&self) -> &[StructField] {
        &self.fields
    }

    /// Encodes one value per field, in order.
    pub fn encode_fields_into(&self, values: &[Value], out: &mut Vec<u8>) -> Result<()> {
        if values.len() != self.fields.len() {
            return Err(Error::LengthMismatch {
                pos: out.len(),
                expected: self.fields.len(),
                found: values.len(),
            });
        }
        for (index, (field, value)) in self.fields.iter().zip(values).enumerate() {
            field
                .codec
                .encode_into(value, out)
                .map_err(|e| Error::field(index, Some(field.name.as_str()), e))?;
        }
        Ok(())
    }

    /// Decodes every field in order, stopping at the first failure.
    pub fn decode_fields_from(&self, cur: &mut Cursor<'_>) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(self.fields.len());
        for (index, field) in self.fields.iter().enumerate() {
            let value = field.codec.decode_from(cur).map_err(|e| {
                tracing::trace!(index, field = %field.name, error = %e, "struct field decode failed");
                Error::field(index, Some(field.name.as_str()), e)
            })?;
            values.push(value);
        }
        Ok(values)
    }
}

impl Codec for StructCodec {
    type Value = Vec<Value>;

    fn width(&self) -> Width {
        self.width
    }

    fn encode_into(&self, value: &Vec<Value>, out: &mut Vec<u8>) -> Result<()> {
        self.encode_fields_into(value, out)
    }

    fn decode_from(&self, cur: &mut Cursor<'_>) -> Result<Vec<Value>> {
        self.decode_fields_from(cur)
    }
}
