//! Built-in descriptors and their factories.
//!
//! Each factory is a method on [`TypeCache`]; the free functions here call the
//! [global](TypeCache::global) cache, so `types::str()` always returns the same
//! descriptor. Import the module as `t` for short:
//!
//! ```
//! use datapack::prelude::*;
//!
//! let point = t::tuple(vec![t::float(64).unwrap(), t::float(64).unwrap()]);
//! let path = t::array(point.clone());
//!
//! assert!(path.ptr_eq(&t::array(point)));
//! ```

pub mod array;
pub mod boolean;
pub mod json;
pub mod leb128;
pub mod literal;
pub mod map;
pub mod numeric;
pub mod object;
pub mod string;
pub mod tuple;
pub mod union;
pub mod varint;

pub use numeric::NumKind;

use crate::{cache::TypeCache, descriptor::Type, errors::PackError, Value};
use failure::Error;

/// A fixed-width numeric descriptor of kind `kind`.
pub fn num(kind: NumKind) -> Type { TypeCache::global().num(kind) }

/// Unsigned integer of 8, 16 or 32 bits.
///
/// # Errors
///
/// [`PackError::UnsupportedWidth`] for any other width.
pub fn uint(bits: u8) -> Result<Type, Error> { TypeCache::global().uint(bits) }

/// Signed integer of 8, 16 or 32 bits.
pub fn int(bits: u8) -> Result<Type, Error> { TypeCache::global().int(bits) }

/// Float of 16, 32 or 64 bits.
pub fn float(bits: u8) -> Result<Type, Error> { TypeCache::global().float(bits) }

/// Unsigned integers below 2^53 as varints.
pub fn varint() -> Type { TypeCache::global().varint() }

/// Non-negative big integers as LEB128.
pub fn leb128() -> Type { TypeCache::global().leb128() }

/// Booleans, eight to a byte.
pub fn bool() -> Type { TypeCache::global().bool() }

/// Strings in a deduplicated blob.
pub fn str() -> Type { TypeCache::global().str() }

/// Exactly `value`, stored nowhere.
pub fn lit<V: Into<Value>>(value: V) -> Type { TypeCache::global().lit(value.into()) }

/// Lists of `element`.
pub fn array(element: Type) -> Type { TypeCache::global().array(&element) }

/// Fixed-length lists, one descriptor per position.
pub fn tuple(slots: Vec<Type>) -> Type { TypeCache::global().tuple(&slots) }

/// Records with a fixed set of fields.
pub fn obj<K: Into<String>>(fields: Vec<(K, Type)>) -> Type {
    TypeCache::global().obj(fields.into_iter().map(|(k, ty)| (k.into(), ty)).collect())
}

/// Records whose values are any of `variants`.
pub fn map(variants: Vec<Type>) -> Type { TypeCache::global().map(&variants) }

/// Records of JSON-like primitives, see [`TypeCache::map_default`].
pub fn map_default() -> Type { TypeCache::global().map_default() }

/// Values matching any of `variants`, first match wins.
pub fn or(variants: Vec<Type>) -> Type { TypeCache::global().or(&variants) }

/// JSON-compatible values as JSON text.
pub fn json() -> Type { TypeCache::global().json() }

pub(crate) fn invalid(ty: &dyn crate::Descriptor, value: &Value) -> Error {
    PackError::InvalidValue {
        name: ty.name(),
        found: value.kind(),
    }
    .into()
}

pub(crate) fn exhausted(ty: &dyn crate::Descriptor) -> Error {
    PackError::OutOfRange { name: ty.name() }.into()
}

/// Interprets a value read through `source` as a length or an offset.
pub(crate) fn index(source: &Type, value: Value) -> Result<usize, Error> {
    match value {
        Value::Number(n) if crate::util::is_safe_uint(n) => Ok(n as usize),
        other => Err(invalid(&**source, &other)),
    }
}
