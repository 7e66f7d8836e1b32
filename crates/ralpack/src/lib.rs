//! # Ralpack
//!
//! Composable binary codecs for the Alephium VM wire format.
//!
//! ## Philosophy
//!
//! - **Composition**: a handful of small codecs, each owning one shape of value,
//!   combined by construction rather than by inheritance.
//! - **No embedded schema**: the wire carries no type tags, lengths, or magic
//!   bytes. Both sides build the same codec tree from the same `TypeDescriptor`.
//! - **Immutable**: codecs are built once and only ever read. Share them freely.
//!
//! ## Format
//!
//! - **Integers**: `[Data: width]`, big-endian, two's complement when signed.
//! - **Bool**: `[0x00 | 0x01]`; any non-zero byte decodes as `true`.
//! - **Bytes**: `[Data]`, fixed length or running to the end of the input.
//! - **Option**: `[0x00]` or `[0x01][Inner]`; any non-zero tag decodes as `Some`.
//! - **Array / Struct**: `[Item 0][Item 1]..`, no prefix, no separators.
//!
//! ## Example
//!
//! ```
//! use ralpack::Codec;
//! use ralpack::IntCodec;
//! use ralpack::OptionCodec;
//!
//! let codec = OptionCodec::new(IntCodec::int4());
//! let bytes = codec.encode(&Some(1000)).unwrap();
//! assert_eq!(bytes, [0x01, 0x00, 0x00, 0x03, 0xE8]);
//! assert_eq!(codec.decode_exact(&bytes).unwrap(), Some(1000));
//! ```

pub mod array;
pub mod codec;
pub mod cursor;
pub mod descriptor;
pub mod dynamic;
pub mod error;
pub mod option;
pub mod prim;
pub mod registry;
pub mod value;

pub use error::Error;
pub use error::Result;

pub use codec::Codec;
pub use codec::Width;
pub use cursor::Cursor;

pub use prim::BoolCodec;
pub use prim::BytesCodec;
pub use prim::IntCodec;
pub use prim::Signedness;
pub use option::OptionCodec;
pub use array::ArrayCodec;

pub use value::Value;
pub use descriptor::Field;
pub use descriptor::TypeDescriptor;
pub use dynamic::DynCodec;
pub use dynamic::StructCodec;
pub use dynamic::StructField;
pub use registry::Registry;
pub use registry::RegistryConfig;
