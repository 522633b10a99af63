//! Anything JSON can express, as JSON text.

use crate::{
    cache::{Arg, TypeCache},
    descriptor::{Context, Descriptor, Type},
    types::invalid,
    Value,
};
use failure::Error;
use smallvec::smallvec;

#[derive(Debug)]
/// Values rendered with `serde_json` and written through `str()`.
///
/// Whole numbers are rendered as integers and non-finite numbers as `null`, so
/// `NaN` reads back as [`Value::Null`].
pub struct JsonType {
    text: Type,
}

impl Descriptor for JsonType {
    fn name(&self) -> String { "Json".to_owned() }

    fn depends(&self) -> Vec<Type> { vec![self.text.clone()] }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        let json = value.to_json()?;
        let text = serde_json::to_string(&json)?;
        cx.write(&self.text, &Value::Str(text))
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        match cx.read(&self.text)? {
            Value::Str(text) => {
                let json: serde_json::Value = serde_json::from_str(&text)?;
                Ok(Value::from(json))
            }
            other => Err(invalid(self, &other)),
        }
    }

    fn equal(&self, value: &Value) -> bool { value.is_json() }
}

impl TypeCache {
    /// The JSON descriptor.
    pub fn json(&self) -> Type {
        let text = self.str();
        self.get_or_insert_with("json", smallvec![Arg::Type(text.clone())], || {
            Type::new(JsonType { text })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Columns;

    #[test]
    fn written_as_compact_text() {
        let cache = TypeCache::new();
        let json = cache.json();
        let text = cache.str();
        let cursors = cache.varint();

        let mut columns = Columns::new();
        for ty in &[&json, &text, &cursors] {
            columns.insert(ty.id(), ty.initial());
        }

        let value = Value::from(serde_json::json!({"b": [1, 2.5], "a": null}));
        let mut cx = Context::new(&mut columns, &json);
        cx.write(&json, &value).unwrap();
        assert_eq!(
            columns[&text.id()],
            crate::column::Column::Text(r#"{"b":[1,2.5],"a":null}"#.to_owned())
        );

        let mut cx = Context::new(&mut columns, &json);
        assert_eq!(cx.read(&json).unwrap(), value);
    }

    #[test]
    fn rejects_bigints() {
        let json = TypeCache::new().json();
        assert!(json.equal(&Value::from(vec![1, 2])));
        assert!(!json.equal(&Value::from(num_bigint::BigInt::from(1))));
    }
}
