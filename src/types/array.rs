//! Variable-length lists.

use crate::{
    cache::{Arg, TypeCache},
    descriptor::{Context, Descriptor, Type},
    errors::PackError,
    types::{index, invalid},
    Value,
};
use failure::Error;
use smallvec::smallvec;

#[derive(Debug)]
/// Lists of one element descriptor. The length goes to a `varint` column.
pub struct ArrayType {
    sizes: Type,
    element: Type,
}

impl Descriptor for ArrayType {
    fn name(&self) -> String { format!("Array<{}>", self.element.name()) }

    fn depends(&self) -> Vec<Type> { vec![self.sizes.clone(), self.element.clone()] }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(invalid(self, other)),
        };

        cx.write(&self.sizes, &Value::from(items.len() as f64))?;
        for item in items {
            cx.write(&self.element, item)?;
        }
        Ok(())
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        let len = index(&self.sizes, cx.read(&self.sizes)?)?;
        if len > cx.max_len() {
            return Err(PackError::LengthLimit {
                name: self.name(),
                len,
                max: cx.max_len(),
            }
            .into());
        }

        let mut items = Vec::new();
        for _ in 0..len {
            items.push(cx.read(&self.element)?);
        }
        Ok(Value::Array(items))
    }

    fn equal(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().all(|item| self.element.equal(item)),
            _ => false,
        }
    }
}

impl TypeCache {
    /// Lists of `element`.
    pub fn array(&self, element: &Type) -> Type {
        let sizes = self.varint();
        self.get_or_insert_with(
            "array",
            smallvec![Arg::Type(sizes.clone()), Arg::Type(element.clone())],
            || {
                Type::new(ArrayType {
                    sizes,
                    element: element.clone(),
                })
            },
        )
    }
}
