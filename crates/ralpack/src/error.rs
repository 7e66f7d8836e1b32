//! # Error Definitions
//!
//! Every failure a codec can report, either while it is being built from a
//! type descriptor or while it is moving bytes on and off the wire.

use crate::prim::Signedness;

/// Ralpack construction, encoding and decoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Value does not fit the declared integer width.
    Range { value: i128, width: usize, signedness: Signedness },
    /// Fewer bytes remain than a fixed-width read requires.
    Underflow { pos: usize, expected: usize, available: usize },
    /// No byte left to read a discriminator from.
    EmptyInput { pos: usize },
    /// A composite could not produce, or was not handed, the number of items its shape requires.
    LengthMismatch { pos: usize, expected: usize, found: usize },
    /// Bytes were left over after a decode that must consume the whole input.
    TrailingBytes { pos: usize, remaining: usize },
    /// A dynamic value's shape does not match the codec it was handed to.
    TypeMismatch { expected: &'static str, found: &'static str },
    /// A struct field failed. `source` is the inner error exactly as it was raised.
    Field { index: usize, name: Option<String>, source: Box<Error> },
    /// The registry has no codec for this type name.
    UnknownType(String),
    /// A textual type descriptor could not be parsed.
    InvalidDescriptor(String),
    /// Integer widths are limited to 1..=8 bytes.
    UnsupportedWidth(usize),
    /// A greedy codec sits somewhere other than the tail of a composite.
    UnframedField { index: usize },
    /// The descriptor tree nests deeper than the configured limit.
    RecursionLimitExceeded,
    /// A fixed array is longer than the configured limit.
    ArrayTooLarge { len: usize, max: usize },
}

impl Error {
    pub(crate) fn field(index: usize, name: Option<&str>, source: Error) -> Self {
        Error::Field {
            index,
            name: name.map(str::to_owned),
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through any `Field` context.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Error::Field { source, .. } = err {
            err = source;
        }
        err
    }

    /// True when the failure means the input ran out before the value did.
    pub fn is_underflow(&self) -> bool {
        matches!(
            self.root(),
            Error::Underflow { .. } | Error::EmptyInput { .. } | Error::LengthMismatch { .. }
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Range { value, width, signedness } => {
                write!(f, "value {} out of range for {:?} {}-byte integer", value, signedness, width)
            }
            Error::Underflow { pos, expected, available } => {
                write!(f, "underflow at byte {}: need {} bytes, have {}", pos, expected, available)
            }
            Error::EmptyInput { pos } => write!(f, "no discriminator byte at {}", pos),
            Error::LengthMismatch { pos, expected, found } => {
                write!(f, "length mismatch at byte {}: expected {} items, found {}", pos, expected, found)
            }
            Error::TrailingBytes { pos, remaining } => {
                write!(f, "{} trailing bytes after byte {}", remaining, pos)
            }
            Error::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Error::Field { index, name: Some(name), source } => {
                write!(f, "field {} (`{}`): {}", index, name, source)
            }
            Error::Field { index, name: None, source } => write!(f, "field {}: {}", index, source),
            Error::UnknownType(name) => write!(f, "unknown type `{}`", name),
            Error::InvalidDescriptor(msg) => write!(f, "invalid type descriptor: {}", msg),
            Error::UnsupportedWidth(w) => write!(f, "unsupported integer width: {} bytes", w),
            Error::UnframedField { index } => {
                write!(f, "unbounded codec at position {} is not the last item", index)
            }
            Error::ArrayTooLarge { len, max } => write!(f, "array of {} exceeds limit {}", len, max),
            Error::RecursionLimitExceeded => write!(f, "{:?}", self),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Field { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Specialized `Result` for Ralpack operations.
pub type Result<T> = std::result::Result<T, Error>;
