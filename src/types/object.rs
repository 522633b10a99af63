//! Records with a fixed set of fields.

use crate::{
    cache::{Arg, Args, TypeCache},
    descriptor::{Context, Descriptor, Type},
    types::invalid,
    Record, Value,
};
use failure::Error;

#[derive(Debug)]
/// Named fields, each with its own descriptor.
///
/// Fields are written in declaration order; a missing field is written as `null`
/// and keys outside the declaration are ignored.
pub struct ObjType {
    fields: Vec<(String, Type)>,
}

impl ObjType {
    /// The declared fields, in order.
    pub fn fields(&self) -> &[(String, Type)] { &self.fields }
}

impl Descriptor for ObjType {
    fn name(&self) -> String {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|(k, ty)| format!("{}: {}", k, ty.name()))
            .collect();
        format!("Object<{{{}}}>", fields.join(", "))
    }

    fn depends(&self) -> Vec<Type> { self.fields.iter().map(|(_, ty)| ty.clone()).collect() }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        let record = match value {
            Value::Object(record) => record,
            other => return Err(invalid(self, other)),
        };

        for (key, ty) in &self.fields {
            cx.write(ty, record.get(key).unwrap_or(&Value::Null))?;
        }
        Ok(())
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        let mut record = Record::with_capacity(self.fields.len());
        for (key, ty) in &self.fields {
            record.insert(key.as_str(), cx.read(ty)?);
        }
        Ok(Value::Object(record))
    }

    fn equal(&self, value: &Value) -> bool {
        match value {
            Value::Object(record) => {
                record.len() >= self.fields.len()
                    && self
                        .fields
                        .iter()
                        .all(|(key, ty)| ty.equal(record.get(key).unwrap_or(&Value::Null)))
            }
            _ => false,
        }
    }
}

impl TypeCache {
    /// Records with `fields`. A repeated name keeps its first position and its
    /// last descriptor.
    pub fn obj(&self, fields: Vec<(String, Type)>) -> Type {
        let mut unique: Vec<(String, Type)> = Vec::with_capacity(fields.len());
        for (key, ty) in fields {
            match unique.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = ty,
                None => unique.push((key, ty)),
            }
        }

        let args: Args = unique
            .iter()
            .flat_map(|(k, ty)| vec![Arg::Key(k.clone()), Arg::Type(ty.clone())])
            .collect();
        self.get_or_insert_with("obj", args, || Type::new(ObjType { fields: unique }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(cache: &TypeCache) -> Type {
        let coord = cache.int(32).unwrap();
        cache.obj(vec![("x".to_owned(), coord.clone()), ("y".to_owned(), coord)])
    }

    #[test]
    fn membership() {
        let cache = TypeCache::new();
        let point = point(&cache);
        assert_eq!(point.name(), "Object<{x: Int32, y: Int32}>");

        let full: Record = vec![("y", 2), ("x", 1)].into_iter().collect();
        assert!(point.equal(&Value::from(full.clone())));

        let mut extra = full.clone();
        extra.insert("z", "anything");
        assert!(point.equal(&Value::from(extra)));

        let mut missing = full;
        missing.remove("y");
        assert!(!point.equal(&Value::from(missing)));

        assert!(!point.equal(&Value::from(vec![1, 2])));
    }

    #[test]
    fn identity_follows_fields() {
        let cache = TypeCache::new();
        assert!(point(&cache).ptr_eq(&point(&cache)));

        let swapped = cache.obj(vec![
            ("y".to_owned(), cache.int(32).unwrap()),
            ("x".to_owned(), cache.int(32).unwrap()),
        ]);
        assert!(!swapped.ptr_eq(&point(&cache)));
    }

    #[test]
    fn repeated_names_collapse() {
        let cache = TypeCache::new();
        let ty = cache.obj(vec![
            ("a".to_owned(), cache.str()),
            ("b".to_owned(), cache.str()),
            ("a".to_owned(), cache.bool()),
        ]);
        assert_eq!(ty.name(), "Object<{a: Boolean, b: String}>");
    }
}
