//! Records with arbitrary keys.

use crate::{
    cache::{Arg, TypeCache},
    descriptor::{Context, Descriptor, Type},
    types::{invalid, NumKind},
    Record, Value,
};
use failure::Error;
use smallvec::smallvec;

#[derive(Debug)]
/// String-keyed records whose values go through a union.
///
/// The keys are written first, as one `array(str())` value in insertion order,
/// then every value in the same order.
pub struct MapType {
    keys: Type,
    values: Type,
}

impl Descriptor for MapType {
    fn name(&self) -> String { format!("Map<{}>", self.values.name()) }

    fn depends(&self) -> Vec<Type> { vec![self.keys.clone(), self.values.clone()] }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        let record = match value {
            Value::Object(record) => record,
            other => return Err(invalid(self, other)),
        };

        let keys = record.keys().map(Value::from).collect::<Vec<_>>();
        cx.write(&self.keys, &Value::Array(keys))?;
        for v in record.values() {
            cx.write(&self.values, v)?;
        }
        Ok(())
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        let keys = cx.read(&self.keys)?.into_vec()?;
        let mut record = Record::with_capacity(keys.len());
        for key in keys {
            match key {
                Value::Str(key) => {
                    let v = cx.read(&self.values)?;
                    record.insert(key, v);
                }
                other => return Err(invalid(&*self.keys, &other)),
            }
        }
        Ok(Value::Object(record))
    }

    fn equal(&self, value: &Value) -> bool {
        match value {
            Value::Object(record) => record.values().all(|v| self.values.equal(v)),
            _ => false,
        }
    }
}

impl TypeCache {
    /// Records whose values are any of `variants`.
    pub fn map(&self, variants: &[Type]) -> Type {
        let keys = self.array(&self.str());
        let values = self.or(variants);
        self.get_or_insert_with(
            "map",
            smallvec![Arg::Type(keys.clone()), Arg::Type(values.clone())],
            || Type::new(MapType { keys, values }),
        )
    }

    /// Records of booleans, numbers, strings, and, failing those, JSON.
    ///
    /// Numbers take the narrowest of `int(8)`, `uint(8)`, `int(16)`, `uint(16)`,
    /// `int(32)`, `uint(32)`, `float(32)` and `float(64)` that holds them exactly.
    pub fn map_default(&self) -> Type {
        let variants = [
            self.bool(),
            self.num(NumKind::Int8),
            self.num(NumKind::Uint8),
            self.num(NumKind::Int16),
            self.num(NumKind::Uint16),
            self.num(NumKind::Int32),
            self.num(NumKind::Uint32),
            self.num(NumKind::Float32),
            self.num(NumKind::Float64),
            self.str(),
            self.json(),
        ];
        self.map(&variants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_variants() {
        let cache = TypeCache::new();
        let map = cache.map_default();
        assert!(map.ptr_eq(&cache.map_default()));

        let mut record = Record::new();
        record.insert("n", 1);
        record.insert("s", "x");
        record.insert("nested", vec![Value::Null, Value::from(true)]);
        assert!(map.equal(&Value::from(record.clone())));

        record.insert("big", num_bigint::BigInt::from(1));
        assert!(!map.equal(&Value::from(record)));
    }

    #[test]
    fn keys_are_a_string_array() {
        let cache = TypeCache::new();
        let map = cache.map(&[cache.str()]);
        let deps = map.depends();
        assert!(deps[0].ptr_eq(&cache.array(&cache.str())));
        assert!(deps[1].ptr_eq(&cache.or(&[cache.str()])));
    }
}
