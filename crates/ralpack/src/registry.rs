//! # Registry
//!
//! Maps type descriptors to codec instances. This is the only place codecs are
//! built from metadata; callers ask for "the codec for X" and never assemble
//! composites by hand.
//!
//! ## Invariants
//! - **Construction-time failure**: every descriptor problem (unknown name,
//!   bad width, unframed field, excessive nesting) is reported by `resolve`,
//!   never by `encode`/`decode` of the resulting codec.
//! - **Shared leaves**: each primitive codec exists once per registry and is
//!   handed out as a cloned `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use tracing::trace;

use crate::array::ArrayCodec;
use crate::codec::Codec;
use crate::descriptor::Field;
use crate::descriptor::TypeDescriptor;
use crate::descriptor::builtin;
use crate::dynamic::DynCodec;
use crate::dynamic::StructCodec;
use crate::dynamic::StructField;
use crate::error::Error;
use crate::error::Result;
use crate::option::OptionCodec;
use crate::prim::BoolCodec;
use crate::prim::BytesCodec;
use crate::prim::IntCodec;
use crate::prim::MAX_INT_WIDTH;
use crate::prim::Signedness;

/// The maximum descriptor nesting depth before resolution fails.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// The maximum number of array elements, across all nesting levels, before
/// resolution fails.
pub const DEFAULT_MAX_ARRAY_LEN: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Deepest allowed nesting of Option/array/struct descriptors.
    pub max_depth: usize,
    /// Most array elements one decode may visit, counting nested arrays and
    /// struct fields; also the longest allowed fixed byte string.
    pub max_array_len: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
        }
    }
}

#[derive(Debug)]
pub struct Registry {
    config: RegistryConfig,
    leaves: HashMap<TypeDescriptor, Arc<DynCodec>>,
    structs: HashMap<String, TypeDescriptor>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let mut leaves = HashMap::new();
        leaves.insert(TypeDescriptor::Bool, Arc::new(DynCodec::Bool(BoolCodec)));
        leaves.insert(TypeDescriptor::ByteVector, Arc::new(DynCodec::Bytes(BytesCodec::rest())));
        for width in 1..=MAX_INT_WIDTH {
            for signedness in [Signedness::Signed, Signedness::Unsigned] {
                if let Ok(codec) = IntCodec::new(width, signedness) {
                    leaves.insert(TypeDescriptor::Int { width, signedness }, Arc::new(DynCodec::Int(codec)));
                }
            }
        }
        Self {
            config,
            leaves,
            structs: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers a named struct so textual descriptors can refer to it.
    ///
    /// # Errors
    /// Fails if the name shadows a builtin, or if the fields do not resolve.
    pub fn register_struct(&mut self, name: impl Into<String>, fields: Vec<Field>) -> Result<()> {
        let name = name.into();
        if builtin(&name).is_some() || name == "Option" {
            return Err(Error::InvalidDescriptor(format!("`{}` is a builtin type name", name)));
        }
        let ty = TypeDescriptor::Struct(fields);
        self.build(&ty, 0)?;
        debug!(%name, descriptor = %ty, "registered struct");
        self.structs.insert(name, ty);
        Ok(())
    }

    /// Looks up a registered struct by name.
    pub fn struct_descriptor(&self, name: &str) -> Option<&TypeDescriptor> {
        self.structs.get(name)
    }

    /// Parses a textual descriptor against the builtins and registered structs.
    pub fn parse(&self, src: &str) -> Result<TypeDescriptor> {
        TypeDescriptor::parse_with(src, self.config.max_depth, |name| self.structs.get(name).cloned())
    }

    /// Returns the codec for `ty`, building composites recursively.
    pub fn resolve(&self, ty: &TypeDescriptor) -> Result<Arc<DynCodec>> {
        let codec = self.build(ty, 0)?;
        debug!(descriptor = %ty, width = ?codec.width(), "resolved codec");
        Ok(codec)
    }

    /// Parses `src` and resolves it.
    pub fn resolve_str(&self, src: &str) -> Result<Arc<DynCodec>> {
        let ty = self.parse(src)?;
        self.resolve(&ty)
    }

    /// Builds a struct codec for a parameter list given as parallel name and
    /// type lists.
    ///
    /// Only fixed-width parameter types resolve: `U256`, `I256` and
    /// `Address` fail with `Error::UnknownType`.
    pub fn resolve_signature(&self, names: &[&str], types: &[&str]) -> Result<StructCodec> {
        if names.len() != types.len() {
            return Err(Error::InvalidDescriptor(format!(
                "{} names for {} types",
                names.len(),
                types.len()
            )));
        }
        let fields = names
            .iter()
            .zip(types)
            .map(|(name, ty)| -> Result<Field> { Ok(Field::new(*name, self.parse(ty)?)) })
            .collect::<Result<Vec<_>>>()?;
        debug!(params = names.len(), "resolved signature");
        self.build_struct(&fields, 0)
    }

    fn build(&self, ty: &TypeDescriptor, depth: usize) -> Result<Arc<DynCodec>> {
        if depth > self.config.max_depth {
            return Err(Error::RecursionLimitExceeded);
        }

        if let Some(leaf) = self.leaves.get(ty) {
            trace!(descriptor = %ty, "leaf cache hit");
            return Ok(leaf.clone());
        }

        let codec = match ty {
            TypeDescriptor::Int { width, signedness } => DynCodec::Int(IntCodec::new(*width, *signedness)?),
            TypeDescriptor::Bool => DynCodec::Bool(BoolCodec),
            TypeDescriptor::ByteVector => DynCodec::Bytes(BytesCodec::rest()),
            TypeDescriptor::FixedBytes(len) => {
                self.check_len(*len)?;
                DynCodec::Bytes(BytesCodec::fixed(*len))
            }
            TypeDescriptor::Option(inner) => {
                DynCodec::Option(OptionCodec::new(self.build(inner, depth + 1)?))
            }
            TypeDescriptor::FixedArray(inner, len) => {
                self.check_len(elements(ty))?;
                let elem = self.build(inner, depth + 1)?;
                if elem.width().is_unbounded() && *len > 1 {
                    return Err(Error::UnframedField { index: 0 });
                }
                DynCodec::Array(ArrayCodec::new(elem, *len))
            }
            TypeDescriptor::Struct(fields) => DynCodec::Struct(self.build_struct(fields, depth)?),
        };
        Ok(Arc::new(codec))
    }

    fn build_struct(&self, fields: &[Field], depth: usize) -> Result<StructCodec> {
        let fields = fields
            .iter()
            .enumerate()
            .map(|(index, f)| -> Result<StructField> {
                let codec = self
                    .build(&f.ty, depth + 1)
                    .map_err(|e| Error::field(index, Some(f.name.as_str()), e))?;
                Ok(StructField { name: f.name.clone(), codec })
            })
            .collect::<Result<Vec<_>>>()?;
        StructCodec::new(fields)
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len > self.config.max_array_len {
            return Err(Error::ArrayTooLarge {
                len,
                max: self.config.max_array_len,
            });
        }
        Ok(())
    }
}

/// Array elements a decode of `ty` visits, counting every nesting level.
///
/// An empty inner array still costs one visit per outer element.
fn elements(ty: &TypeDescriptor) -> usize {
    match ty {
        TypeDescriptor::FixedArray(inner, len) => len.saturating_mul(elements(inner).max(1)),
        TypeDescriptor::Option(inner) => elements(inner),
        TypeDescriptor::Struct(fields) => fields
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(elements(&f.ty))),
        _ => 1,
    }
}
