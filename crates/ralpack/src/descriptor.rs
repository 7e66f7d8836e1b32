//! # Type Descriptors
//!
//! Out-of-band metadata naming the shape of a value. Producer and consumer
//! must build their codecs from the same descriptor tree: the wire itself
//! carries no schema.
//!
//! ## Textual Form
//!
//! ```text
//! ty   := '[' ty ';' size ']'      fixed array, e.g. [[U32;2];3]
//!       | 'Option<' ty '>'
//!       | 'Bool' | 'ByteVec' | 'Int4'
//!       | ('I' | 'U') bits          bits in 8, 16, .., 64
//!       | 'Bytes' size              fixed-length bytes, e.g. Bytes32
//!       | name                      a struct known to the caller
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::error::Result;
use crate::prim::MAX_INT_WIDTH;
use crate::prim::Signedness;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Int { width: usize, signedness: Signedness },
    Bool,
    /// Unframed bytes running to the end of the input.
    ByteVector,
    FixedBytes(usize),
    Option(Box<TypeDescriptor>),
    FixedArray(Box<TypeDescriptor>, usize),
    Struct(Vec<Field>),
}

/// A named struct field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self { name: name.into(), ty }
    }
}

impl TypeDescriptor {
    pub fn int4() -> Self {
        TypeDescriptor::Int { width: 4, signedness: Signedness::Signed }
    }

    pub fn option(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Option(Box::new(inner))
    }

    pub fn array(inner: TypeDescriptor, len: usize) -> Self {
        TypeDescriptor::FixedArray(Box::new(inner), len)
    }

    /// Parses the textual form, resolving unknown names through `lookup`.
    ///
    /// # Errors
    /// - `Error::UnknownType` for a name that is neither builtin nor found by `lookup`.
    /// - `Error::InvalidDescriptor` for malformed syntax.
    /// - `Error::RecursionLimitExceeded` if nesting exceeds `max_depth`.
    pub fn parse_with<F>(src: &str, max_depth: usize, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<TypeDescriptor>,
    {
        let mut parser = Parser { src, pos: 0, max_depth, lookup };
        let ty = parser.ty(0)?;
        parser.skip_ws();
        if parser.pos != src.len() {
            return Err(parser.invalid("end of descriptor"));
        }
        Ok(ty)
    }
}

/// Builtin type names. Returns `None` for anything else.
pub(crate) fn builtin(name: &str) -> Option<TypeDescriptor> {
    match name {
        "Bool" => return Some(TypeDescriptor::Bool),
        "ByteVec" => return Some(TypeDescriptor::ByteVector),
        "Int4" => return Some(TypeDescriptor::int4()),
        _ => {}
    }
    if let Some(size) = name.strip_prefix("Bytes") {
        return size.parse().ok().map(TypeDescriptor::FixedBytes);
    }
    let signedness = match name.as_bytes().first()? {
        b'I' => Signedness::Signed,
        b'U' => Signedness::Unsigned,
        _ => return None,
    };
    let bits: usize = name[1..].parse().ok()?;
    // U256 and friends are not fixed-width integers on the wire.
    if bits == 0 || bits % 8 != 0 || bits / 8 > MAX_INT_WIDTH {
        return None;
    }
    Some(TypeDescriptor::Int { width: bits / 8, signedness })
}

struct Parser<'s, F> {
    src: &'s str,
    pos: usize,
    max_depth: usize,
    lookup: F,
}

impl<'s, F> Parser<'s, F>
where
    F: Fn(&str) -> Option<TypeDescriptor>,
{
    fn invalid(&self, expected: &str) -> Error {
        Error::InvalidDescriptor(format!("expected {} at {} in `{}`", expected, self.pos, self.src))
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) { Ok(()) } else { Err(self.invalid(&format!("`{}`", token))) }
    }

    fn word(&mut self) -> &'s str {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn ty(&mut self, depth: usize) -> Result<TypeDescriptor> {
        if depth > self.max_depth {
            return Err(Error::RecursionLimitExceeded);
        }

        if self.eat("[") {
            let inner = self.ty(depth + 1)?;
            self.expect(";")?;
            let size = self.word();
            let len = size.parse().map_err(|_| self.invalid("array size"))?;
            self.expect("]")?;
            return Ok(TypeDescriptor::array(inner, len));
        }

        let start = self.pos;
        let name = self.word();
        if name.is_empty() {
            return Err(self.invalid("type name"));
        }
        if name == "Option" {
            self.expect("<")?;
            let inner = self.ty(depth + 1)?;
            self.expect(">")?;
            return Ok(TypeDescriptor::option(inner));
        }

        builtin(name)
            .or_else(|| (self.lookup)(name))
            .ok_or_else(|| {
                tracing::trace!(name, pos = start, "unresolved type name");
                Error::UnknownType(name.to_owned())
            })
    }
}

impl FromStr for TypeDescriptor {
    type Err = Error;

    /// Parses builtin types only; struct names fail with `UnknownType`.
    fn from_str(s: &str) -> Result<Self> {
        TypeDescriptor::parse_with(s, crate::registry::DEFAULT_MAX_DEPTH, |_| None)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Int { width, signedness: Signedness::Signed } => write!(f, "I{}", width * 8),
            TypeDescriptor::Int { width, signedness: Signedness::Unsigned } => write!(f, "U{}", width * 8),
            TypeDescriptor::Bool => f.write_str("Bool"),
            TypeDescriptor::ByteVector => f.write_str("ByteVec"),
            TypeDescriptor::FixedBytes(n) => write!(f, "Bytes{}", n),
            TypeDescriptor::Option(inner) => write!(f, "Option<{}>", inner),
            TypeDescriptor::FixedArray(inner, n) => write!(f, "[{};{}]", inner, n),
            TypeDescriptor::Struct(fields) => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.ty)?;
                }
                f.write_str("}")
            }
        }
    }
}
