//! # datapack
//!
//! A schema-driven, column-oriented binary codec. A schema is a graph of type
//! descriptors; packing a value walks the schema, spreads the value across one
//! column per descriptor, and serializes the columns back to back.
//!
//! # Usage
//!
//! Build a schema from the factories in [`types`], hand its root to [`DataPack`],
//! and write [`Value`]s (or anything implementing [`PackRep`](rep::PackRep)).
//!
//! ```
//! use datapack::prelude::*;
//!
//! let schema = t::obj(vec![
//!     ("id", t::uint(32).unwrap()),
//!     ("name", t::str()),
//!     ("tags", t::array(t::str())),
//! ]);
//!
//! let mut pack = DataPack::new(schema);
//!
//! let mut value = Record::new();
//! value.insert("id", 7);
//! value.insert("name", "hi");
//! value.insert("tags", vec!["a", "hi"]);
//! let value = Value::from(value);
//!
//! assert!(pack.equal(&value));
//!
//! let encoded = pack.write(&value).unwrap();
//! let decoded = pack.read(&encoded).unwrap();
//!
//! assert_eq!(decoded, value);
//! ```
//!
//! # Descriptors
//!
//! Every descriptor knows how to write and read one kind of value, how to check
//! whether a value belongs to it (`equal`), which other descriptors it delegates to
//! (`depends`), and, optionally, how to serialize its own column (`store`).
//!
//! | Factory | Values | Column |
//! | ---     | ---    | ---    |
//! | `uint(8\|16\|32)`, `int(8\|16\|32)`, `float(16\|32\|64)` | numbers | fixed-width little-endian elements |
//! | `varint()` | integers in `[0, 2^53)` | 7-bit groups with a continuation bit |
//! | `leb128()` | non-negative big integers | unsigned LEB128 |
//! | `bool()` | booleans | bits packed MSB-first |
//! | `str()` | strings | one deduplicated UTF-8 blob, offsets in a `varint` column |
//! | `lit(v)` | exactly `v` | none |
//! | `array(T)` | lists of `T` | none, length in a `varint` column |
//! | `tuple(Ts)` | fixed-length lists | none |
//! | `obj(fields)` | records | none |
//! | `map(variants)` | records of variant values | none |
//! | `or(Ts)` | any of `Ts` | none, branch index in a `uint(8)` column |
//! | `json()` | JSON-compatible values | none, text in a `str` column |
//!
//! Factories are cached: calling one twice with the same arguments returns the same
//! descriptor. Identity matters, because the composer gives each distinct
//! descriptor its own column.
//!
//! # Specification
//!
//! This section describes the binary format.
//!
//! ## Segments
//!
//! The schema closure is the root descriptor followed by everything reachable
//! through `depends`, depth-first, each descriptor kept at its first occurrence.
//! The buffer holds one segment per closure descriptor that has a column, in closure
//! order:
//!
//! ```text
//! segment := varint(byte_length) payload
//! ```
//!
//! There is no header, magic number, version, or tag. A buffer only means something
//! relative to the exact schema that produced it.
//!
//! ## Varints
//!
//! Unsigned, 7 bits per byte, least significant group first. The high bit of each
//! byte is set when more groups follow.
//!
//! | Value   | Bytes            |
//! | ---     | ---              |
//! | `0`     | `00`             |
//! | `127`   | `7f`             |
//! | `128`   | `80 01`          |
//! | `16384` | `80 80 01`       |
//!
//! ## Booleans
//!
//! `n` booleans take `ceil(n / 8)` bytes. Boolean `8i + j` is bit `7 - j` of byte
//! `i`; trailing bits of the last byte are zero.
//!
//! ## Strings
//!
//! Every string written in one pass goes into a single blob. A string already present
//! as a substring is not appended again. Each string value writes its start and end
//! byte offsets into the blob to the `varint` column `str()` depends on.

#![warn(
    missing_docs,
    deprecated_in_future,
    unused_labels,
    keyword_idents,
    missing_debug_implementations,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]

pub mod util;

pub mod buffer;
pub mod cache;
pub mod column;
pub mod descriptor;
pub mod errors;
pub mod pack;
pub mod prelude;
pub mod record;
pub mod rep;
pub mod types;

pub use descriptor::{Context, Descriptor, Type};
pub use errors::PackError;
pub use pack::{DataPack, PackConfig};
pub use record::Record;

use failure::{bail, Error};
use rep::PackRep;

#[derive(PartialEq, Clone, Debug)]
/// [`Value`] and its variants.
///
/// Equality follows strict comparison for primitives: `NaN` is not equal to itself.
///
/// # Example
///
/// ```
/// use datapack::prelude::*;
///
/// let b = Value::Bool(true);
///
/// let val = match b {
///     Value::Bool(b) => b,
///     _ => panic!(),
/// };
///
/// assert!(val);
/// ```
pub enum Value {
    /// Null. Corresponds to [`None`] and JSON `null`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number. All fixed-width descriptors read and write numbers.
    Number(f64),
    /// Arbitrary precision integer, written by `leb128()`.
    BigInt(num_bigint::BigInt),
    /// String.
    Str(String),
    /// Array.
    Array(Vec<Value>),
    /// Object, with keys in insertion order.
    Object(Record),
}

use Value::*;

impl Value {
    /// Name of the variant, for error messages.
    ///
    /// # Example
    ///
    /// ```
    /// use datapack::Value;
    ///
    /// assert_eq!(Value::from(1).kind(), "number");
    /// assert_eq!(Value::from("a").kind(), "string");
    /// ```
    pub fn kind(&self) -> &'static str {
        match self {
            Null => "null",
            Bool(_) => "boolean",
            Number(_) => "number",
            BigInt(_) => "bigint",
            Str(_) => "string",
            Array(_) => "array",
            Object(_) => "object",
        }
    }

    /// Indicates whether a value is [`Null`].
    pub fn is_null(&self) -> bool {
        match self {
            Null => true,
            _ => false,
        }
    }

    /// Returns the boolean, if this is a [`Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number, if this is a [`Number`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the integer, if this is a [`BigInt`].
    pub fn as_bigint(&self) -> Option<&num_bigint::BigInt> {
        match self {
            BigInt(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the string, if this is a [`Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements, if this is an [`Array`].
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the record, if this is an [`Object`].
    pub fn as_object(&self) -> Option<&Record> {
        match self {
            Object(o) => Some(o),
            _ => None,
        }
    }

    /// Consumes a [`Value`], converting it into a vector of values.
    /// This will return an [`Error`] if the value is not an [`Array`].
    ///
    /// # Example
    ///
    /// ```
    /// use datapack::prelude::*;
    ///
    /// let v = Value::from(vec![1, 2, 3]);
    ///
    /// let items = v.into_vec().unwrap();
    /// assert_eq!(items.len(), 3);
    /// ```
    pub fn into_vec(self) -> Result<Vec<Value>, Error> {
        match self {
            Array(a) => Ok(a),
            other => bail!("This value is not an `Array`, found {}", other.kind()),
        }
    }

    /// Consumes a [`Value`], converting it into a [`Record`].
    /// This will return an [`Error`] if the value is not an [`Object`].
    pub fn into_record(self) -> Result<Record, Error> {
        match self {
            Object(o) => Ok(o),
            other => bail!("This value is not an `Object`, found {}", other.kind()),
        }
    }

    /// Consumes a [`Value`], converting it to a value of type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use datapack::prelude::*;
    ///
    /// let n: u8 = Value::from(1).into_rep().unwrap();
    /// assert_eq!(n, 1);
    /// ```
    pub fn into_rep<T: PackRep>(self) -> Result<T, Error> { T::from_value(self) }

    /// Converts to a [`serde_json::Value`].
    ///
    /// Whole numbers become JSON integers, non-finite numbers become `null`.
    ///
    /// # Errors
    ///
    /// [`BigInt`] values have no JSON form.
    pub fn to_json(&self) -> Result<serde_json::Value, Error> {
        use serde_json::Value as Json;

        Ok(match self {
            Null => Json::Null,
            Bool(b) => Json::Bool(*b),
            Number(n) => number_to_json(*n),
            BigInt(i) => bail!("BigInt {} cannot be represented as JSON", i),
            Str(s) => Json::String(s.clone()),
            Array(a) => Json::Array(a.iter().map(Value::to_json).collect::<Result<_, _>>()?),
            Object(o) => {
                let mut map = serde_json::Map::with_capacity(o.len());
                for (k, v) in o {
                    map.insert(k.clone(), v.to_json()?);
                }
                Json::Object(map)
            }
        })
    }

    /// Indicates whether [`Value::to_json`] would succeed.
    pub fn is_json(&self) -> bool {
        match self {
            BigInt(_) => false,
            Array(a) => a.iter().all(Value::is_json),
            Object(o) => o.values().all(Value::is_json),
            _ => true,
        }
    }
}

/// Largest magnitude below which every whole `f64` converts to `i64` exactly.
const I64_EXACT: f64 = 9_223_372_036_854_775_808.0;

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < I64_EXACT {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Value {
        use serde_json::Value as Json;

        match json {
            Json::Null => Null,
            Json::Bool(b) => Bool(b),
            Json::Number(n) => n.as_f64().map_or(Null, Number),
            Json::String(s) => Str(s),
            Json::Array(a) => Array(a.into_iter().map(Value::from).collect()),
            Json::Object(o) => Object(o.into_iter().collect()),
        }
    }
}

fn fmt_str(s: &str) -> String { format!("{:?}", s) }

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        fn fmt_record(m: &Record, indent: usize) -> String {
            let mut record_string: String = "{".to_owned();
            for (i, (k, v)) in m.iter().enumerate() {
                if i == 0 {
                    record_string.push_str(&format!("\n{:indent$}", "", indent = indent + 2));
                } else {
                    record_string.push_str(&format!(",\n{:indent$}", "", indent = indent + 2));
                }

                let value = fmt_helper(v, indent + 2);
                record_string.push_str(&format!(
                    "{key}: {value}",
                    key = fmt_str(k),
                    value = value,
                ));

                // check if we're at last element
                if i == m.len() - 1 {
                    record_string.push_str(&format!("\n{:indent$}", "", indent = indent));
                }
            }
            record_string.push('}');

            record_string
        }

        fn fmt_helper(v: &Value, indent: usize) -> String {
            match v {
                Null => "null".to_owned(),
                Bool(b) => if *b { "true" } else { "false" }.to_owned(),
                Number(n) => format!("{}", n),
                BigInt(i) => format!("{}n", i),
                Str(s) => fmt_str(s),
                Array(a) => {
                    let mut arr_string: String = "[".to_owned();
                    for (i, v) in a.iter().enumerate() {
                        if i != 0 {
                            arr_string.push_str(", ");
                        }
                        arr_string.push_str(&fmt_helper(v, indent));
                    }
                    arr_string.push(']');

                    arr_string
                }
                Object(m) => fmt_record(m, indent),
            }
        }

        write!(f, "{}", fmt_helper(self, 0))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value { Str(s.to_owned()) }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Value { Array(v.into_iter().map(T::into).collect()) }
}

impl From<()> for Value {
    fn from(_: ()) -> Value { Null }
}

from_fn!(Value, bool, Bool);
from_fn!(Value, f64, Number);
from_fn!(Value, String, Str);
from_fn!(Value, Record, Object);
from_fn!(Value, num_bigint::BigInt, BigInt);

impl From<num_bigint::BigUint> for Value {
    fn from(u: num_bigint::BigUint) -> Value { BigInt(u.into()) }
}

from_as!(Value, f32, f64);
from_as!(Value, u8, f64);
from_as!(Value, u16, f64);
from_as!(Value, u32, f64);
from_as!(Value, i8, f64);
from_as!(Value, i16, f64);
from_as!(Value, i32, f64);
