//! Conversions between Rust types and [`Value`].
//!
//! [`PackRep`] is how typed data reaches a [`DataPack`](crate::DataPack):
//! `write_rep` and `read_rep` go through `to_value` and `from_value`.

use crate::{
    util::MAX_SAFE_INTEGER,
    Record, Value,
    Value::{Array, Bool, Null, Number, Object, Str},
};
use failure::{bail, format_err, Error};
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;
use std::{
    collections::HashMap,
    hash::BuildHasher,
    vec::IntoIter,
};

/// A type representable as a [`Value`].
pub trait PackRep: Clone + Sized {
    /// Converts a value into a [`Value`].
    ///
    /// # Example
    ///
    /// ```
    /// use datapack::prelude::*;
    ///
    /// let v = 1u8.to_value();
    /// assert_eq!(v, Value::Number(1.0));
    /// ```
    fn to_value(&self) -> Value { self.clone().into_value() }

    /// Consumes a value, converting it into a [`Value`].
    fn into_value(self) -> Value { self.to_value() }

    /// Converts from a [`Value`].
    ///
    /// # Example
    ///
    /// ```
    /// use datapack::prelude::*;
    ///
    /// let v = "foo".to_string().into_value();
    /// assert_eq!(String::from_value(v).unwrap(), "foo");
    /// ```
    fn from_value(v: Value) -> Result<Self, Error>;
}

impl PackRep for Value {
    fn into_value(self) -> Value { self }

    fn from_value(v: Value) -> Result<Self, Error> { Ok(v) }
}

impl PackRep for bool {
    fn into_value(self) -> Value { Bool(self) }

    fn from_value(v: Value) -> Result<Self, Error> {
        match v {
            Bool(b) => Ok(b),
            other => bail!("expected a boolean, found {}", other.kind()),
        }
    }
}

macro_rules! exact_number_rep {
    ($t:ty) => {
        impl PackRep for $t {
            fn into_value(self) -> Value { Number(self as f64) }

            fn from_value(v: Value) -> Result<Self, Error> {
                match v {
                    Number(n) if n as $t as f64 == n => Ok(n as $t),
                    Number(n) => bail!("{} is not a valid `{}`", n, stringify!($t)),
                    other => bail!("expected a number, found {}", other.kind()),
                }
            }
        }
    };
}

exact_number_rep!(u8);
exact_number_rep!(u16);
exact_number_rep!(u32);
exact_number_rep!(i8);
exact_number_rep!(i16);
exact_number_rep!(i32);

impl PackRep for f32 {
    fn into_value(self) -> Value { Number(self as f64) }

    fn from_value(v: Value) -> Result<Self, Error> { f64::from_value(v).map(|n| n as f32) }
}

impl PackRep for f64 {
    fn into_value(self) -> Value { Number(self) }

    fn from_value(v: Value) -> Result<Self, Error> {
        match v {
            Number(n) => Ok(n),
            other => bail!("expected a number, found {}", other.kind()),
        }
    }
}

macro_rules! wide_int_rep {
    ($t:ty, $to:ident) => {
        /// Numbers beyond `2^53 - 1` in magnitude are represented as [`Value::BigInt`].
        impl PackRep for $t {
            fn into_value(self) -> Value {
                let n = self as f64;
                if n.abs() <= MAX_SAFE_INTEGER {
                    Number(n)
                } else {
                    Value::BigInt(self.into())
                }
            }

            fn from_value(v: Value) -> Result<Self, Error> {
                match v {
                    Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                        (n as i64)
                            .$to()
                            .ok_or_else(|| format_err!("{} is not a valid `{}`", n, stringify!($t)))
                    }
                    Number(n) => bail!("{} is not a safe integer", n),
                    Value::BigInt(i) => i
                        .$to()
                        .ok_or_else(|| format_err!("{} is not a valid `{}`", i, stringify!($t))),
                    other => bail!("expected an integer, found {}", other.kind()),
                }
            }
        }
    };
}

wide_int_rep!(u64, to_u64);
wide_int_rep!(i64, to_i64);

impl PackRep for String {
    fn into_value(self) -> Value { Str(self) }

    fn to_value(&self) -> Value { Str(self.clone()) }

    fn from_value(v: Value) -> Result<Self, Error> {
        match v {
            Str(s) => Ok(s),
            other => bail!("expected a string, found {}", other.kind()),
        }
    }
}

impl PackRep for BigInt {
    fn into_value(self) -> Value { Value::BigInt(self) }

    fn from_value(v: Value) -> Result<Self, Error> {
        match v {
            Value::BigInt(i) => Ok(i),
            other => bail!("expected a bigint, found {}", other.kind()),
        }
    }
}

impl PackRep for BigUint {
    fn into_value(self) -> Value { Value::from(self) }

    fn from_value(v: Value) -> Result<Self, Error> {
        let i = BigInt::from_value(v)?;
        i.to_biguint()
            .ok_or_else(|| format_err!("{} is negative", i))
    }
}

impl<T: PackRep> PackRep for Vec<T> {
    fn into_value(self) -> Value { Array(self.into_iter().map(T::into_value).collect()) }

    fn to_value(&self) -> Value { Array(self.iter().map(T::to_value).collect()) }

    fn from_value(v: Value) -> Result<Self, Error> {
        v.into_vec()?.into_iter().map(T::from_value).collect()
    }
}

impl PackRep for Record {
    fn into_value(self) -> Value { Object(self) }

    fn from_value(v: Value) -> Result<Self, Error> { v.into_record() }
}

/// Entries are written in key order.
impl<T: PackRep, S: BuildHasher + Default + Clone> PackRep for HashMap<String, T, S> {
    fn into_value(self) -> Value {
        let mut entries: Vec<(String, T)> = self.into_iter().collect();
        entries.sort_unstable_by(|(k1, _), (k2, _)| k1.cmp(k2));
        Object(entries.into_iter().map(|(k, v)| (k, v.into_value())).collect())
    }

    fn from_value(v: Value) -> Result<Self, Error> {
        v.into_record()?
            .into_iter()
            .map(|(k, v)| T::from_value(v).map(|t| (k, t)))
            .collect()
    }
}

impl PackRep for () {
    fn into_value(self) -> Value { Null }

    fn from_value(v: Value) -> Result<(), Error> {
        match v {
            Null => Ok(()),
            other => bail!("expected null, found {}", other.kind()),
        }
    }
}

/// `None` is [`Value::Null`], so `Option<Option<T>>` cannot tell `Some(None)` from
/// `None`.
impl<T: PackRep> PackRep for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(x) => x.into_value(),
            None => Null,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Some(x) => x.to_value(),
            None => Null,
        }
    }

    fn from_value(v: Value) -> Result<Self, Error> {
        match v {
            Null => Ok(None),
            v => T::from_value(v).map(Some),
        }
    }
}

impl PackRep for serde_json::Value {
    fn into_value(self) -> Value { Value::from(self) }

    fn from_value(v: Value) -> Result<Self, Error> { v.to_json() }
}

macro_rules! tuple_rep {
    ($len:expr; $($t:ident . $i:tt),+) => {
        impl<$($t: PackRep),+> PackRep for ($($t,)+) {
            fn into_value(self) -> Value { Array(vec![$(self.$i.into_value()),+]) }

            fn from_value(v: Value) -> Result<Self, Error> {
                let items = v.into_vec()?;
                if items.len() != $len {
                    bail!("expected {} elements, found {}", $len, items.len());
                }
                let mut iter = items.into_iter();
                Ok(($(pop_value::<$t>(&mut iter)?,)+))
            }
        }
    };
}

tuple_rep!(2; A.0, B.1);
tuple_rep!(3; A.0, B.1, C.2);
tuple_rep!(4; A.0, B.1, C.2, D.3);

/// Builds the [`Value`] of a struct from its fields, in declaration order.
///
/// Together with [`struct_from_value_helper`], this is how a struct gets a
/// [`PackRep`] to go with an `obj` descriptor.
///
/// # Example
///
/// ```
/// use datapack::prelude::*;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// impl PackRep for User {
///     fn to_value(&self) -> Value {
///         struct_to_value_helper(vec![
///             ("id", self.id.to_value()),
///             ("name", self.name.to_value()),
///         ])
///     }
///
///     fn from_value(v: Value) -> Result<User, failure::Error> {
///         let mut fields = struct_from_value_helper(v, &["id", "name"])?.into_iter();
///         Ok(User {
///             id: pop_value(&mut fields)?,
///             name: pop_value(&mut fields)?,
///         })
///     }
/// }
///
/// let schema = t::obj(vec![("id", t::uint(32).unwrap()), ("name", t::str())]);
/// let mut pack = DataPack::new(schema);
///
/// let user = User { id: 7, name: "hi".to_string() };
/// let bytes = pack.write_rep(&user).unwrap();
/// assert_eq!(pack.read_rep::<User>(&bytes).unwrap(), user);
/// ```
pub fn struct_to_value_helper(entries: Vec<(&str, Value)>) -> Value {
    Object(entries.into_iter().collect())
}

/// Extracts the fields `names` of a struct, in order. Fields missing from the
/// record come out as [`Value::Null`]; fields not named are ignored.
pub fn struct_from_value_helper(v: Value, names: &[&str]) -> Result<Vec<Value>, Error> {
    let mut record = v.into_record()?;
    Ok(names
        .iter()
        .map(|name| record.remove(name).unwrap_or(Null))
        .collect())
}

/// Gets the next element from an iterator of values as `T`.
///
/// # Example
///
/// ```
/// use datapack::prelude::*;
///
/// let values = vec![1, 2, 3].into_value().into_vec().unwrap();
///
/// let first: u8 = pop_value(&mut values.into_iter()).unwrap();
/// assert_eq!(first, 1);
/// ```
pub fn pop_value<T: PackRep>(iter: &mut IntoIter<Value>) -> Result<T, Error> {
    match iter.next() {
        Some(v) => T::from_value(v),
        None => bail!("ran out of values"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_numbers() {
        assert_eq!(u8::from_value(Value::from(255)).unwrap(), 255);
        assert!(u8::from_value(Value::from(256)).is_err());
        assert!(i16::from_value(Value::from(1.5)).is_err());
        assert!(u32::from_value(Value::from("1")).is_err());
        assert_eq!(f32::from_value(Value::from(0.1)).unwrap(), 0.1f32);
    }

    #[test]
    fn wide_integers() {
        assert_eq!(u64::max_value().to_value(), Value::from(BigUint::from(u64::max_value())));
        assert_eq!(42u64.to_value(), Value::from(42));
        assert_eq!(u64::from_value(u64::max_value().into_value()).unwrap(), u64::max_value());
        assert_eq!(i64::from_value(Value::from(-3)).unwrap(), -3);
        assert!(u64::from_value(Value::from(-3)).is_err());
        assert!(u64::from_value(Value::from(1e300)).is_err());
    }

    #[test]
    fn options_and_units() {
        assert_eq!(None::<u8>.to_value(), Null);
        assert_eq!(Option::<u8>::from_value(Null).unwrap(), None);
        assert_eq!(Option::<u8>::from_value(Value::from(3)).unwrap(), Some(3));
        assert!(<()>::from_value(Value::from(0)).is_err());
    }

    #[test]
    fn tuples() {
        let v = (1u8, "a".to_string(), true).into_value();
        assert_eq!(v, Value::from(vec![Value::from(1), Value::from("a"), Value::from(true)]));

        let back: (u8, String, bool) = PackRep::from_value(v).unwrap();
        assert_eq!(back, (1, "a".to_string(), true));

        assert!(<(u8, u8)>::from_value(Value::from(vec![1])).is_err());
    }

    #[test]
    fn hashmaps_are_sorted() {
        let mut hm = HashMap::new();
        hm.insert("b".to_string(), 2u8);
        hm.insert("a".to_string(), 1u8);

        let v = hm.to_value();
        let keys: Vec<&str> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["a", "b"]);

        let back: HashMap<String, u8> = PackRep::from_value(v).unwrap();
        assert_eq!(back, hm);
    }

    #[test]
    fn struct_helpers() {
        let v = struct_to_value_helper(vec![("x", Value::from(1)), ("y", Value::from(2))]);
        let fields = struct_from_value_helper(v, &["y", "z"]).unwrap();
        assert_eq!(fields, [Value::from(2), Null]);
    }
}
