//! Tagged unions.

use crate::{
    cache::{Arg, Args, TypeCache},
    descriptor::{Context, Descriptor, Type},
    errors::PackError,
    types::index,
    Value,
};
use failure::Error;
use std::iter;

/// Most variants a union can tell apart with its `u8` tag.
pub const MAX_VARIANTS: usize = 256;

#[derive(Debug)]
/// Any of several descriptors. Writing picks the first variant whose `equal`
/// accepts the value and records its position in a `uint(8)` column.
pub struct OrType {
    indexes: Type,
    variants: Vec<Type>,
}

impl OrType {
    fn unsupported(&self) -> Error { PackError::UnsupportedType { name: self.name() }.into() }
}

impl Descriptor for OrType {
    fn name(&self) -> String {
        let names: Vec<String> = self.variants.iter().map(|ty| ty.name()).collect();
        format!("Or<{}>", names.join("|"))
    }

    fn depends(&self) -> Vec<Type> {
        iter::once(self.indexes.clone())
            .chain(self.variants.iter().cloned())
            .collect()
    }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        let pos = self
            .variants
            .iter()
            .take(MAX_VARIANTS)
            .position(|ty| ty.equal(value))
            .ok_or_else(|| self.unsupported())?;

        cx.write(&self.indexes, &Value::from(pos as f64))?;
        cx.write(&self.variants[pos], value)
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        let pos = index(&self.indexes, cx.read(&self.indexes)?)?;
        match self.variants.get(pos) {
            Some(ty) => cx.read(ty),
            None => Err(self.unsupported()),
        }
    }

    fn equal(&self, value: &Value) -> bool { self.variants.iter().any(|ty| ty.equal(value)) }
}

impl TypeCache {
    /// A union of `variants`. Only the first [`MAX_VARIANTS`] can be written.
    pub fn or(&self, variants: &[Type]) -> Type {
        let indexes = self.num(crate::types::NumKind::Uint8);
        let args: Args = iter::once(&indexes)
            .chain(variants)
            .cloned()
            .map(Arg::Type)
            .collect();
        self.get_or_insert_with("or", args, || {
            Type::new(OrType {
                indexes,
                variants: variants.to_vec(),
            })
        })
    }
}
