//! Strings in one deduplicated blob.
//!
//! A string that already occurs in the blob, even inside a longer string, is not
//! appended again. Each string value records its start and end byte offsets
//! through a `varint` descriptor.

use crate::{
    buffer::ByteCursor,
    cache::{Arg, TypeCache},
    column::Column,
    descriptor::{Context, Descriptor, Store, Type},
    errors::PackError,
    types::{index, invalid},
    Value,
};
use failure::Error;
use smallvec::smallvec;

#[derive(Debug)]
/// UTF-8 strings, deduplicated by substring search.
pub struct StrType {
    cursors: Type,
}

impl Descriptor for StrType {
    fn name(&self) -> String { "String".to_owned() }

    fn depends(&self) -> Vec<Type> { vec![self.cursors.clone()] }

    fn initial(&self) -> Column { Column::Text(String::new()) }

    fn store(&self) -> Option<&dyn Store> { Some(self) }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        let s = match value {
            Value::Str(s) => s,
            other => return Err(invalid(self, other)),
        };

        let blob = cx.column()?.text("String")?;
        let start = match blob.find(s.as_str()) {
            Some(start) => start,
            None => {
                let start = blob.len();
                blob.push_str(s);
                start
            }
        };

        cx.write(&self.cursors, &Value::from(start as f64))?;
        cx.write(&self.cursors, &Value::from((start + s.len()) as f64))
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        let start = index(&self.cursors, cx.read(&self.cursors)?)?;
        let end = index(&self.cursors, cx.read(&self.cursors)?)?;

        let blob = cx.column()?.text("String")?;
        match blob.get(start..end) {
            Some(s) => Ok(Value::Str(s.to_owned())),
            None => Err(PackError::InvalidString(format!(
                "offsets {}..{} do not delimit a string in a blob of {} bytes",
                start,
                end,
                blob.len()
            ))
            .into()),
        }
    }

    fn equal(&self, value: &Value) -> bool { value.as_str().is_some() }
}

impl Store for StrType {
    fn encode(&self, column: &Column, out: &mut ByteCursor) -> Result<(), Error> {
        out.write(column.text_ref("String")?.as_bytes());
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Column, Error> {
        match std::str::from_utf8(bytes) {
            Ok(blob) => Ok(Column::Text(blob.to_owned())),
            Err(e) => Err(PackError::InvalidString(e.to_string()).into()),
        }
    }
}

impl TypeCache {
    /// The string descriptor.
    pub fn str(&self) -> Type {
        let cursors = self.varint();
        self.get_or_insert_with("str", smallvec![Arg::Type(cursors.clone())], || {
            Type::new(StrType { cursors })
        })
    }
}
