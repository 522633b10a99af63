//! Fixed-length lists.

use crate::{
    cache::{Arg, TypeCache},
    descriptor::{Context, Descriptor, Type},
    types::invalid,
    Value,
};
use failure::Error;

#[derive(Debug)]
/// One descriptor per position. Missing positions are written as `null`, extra
/// positions are ignored.
pub struct TupleType {
    slots: Vec<Type>,
}

impl Descriptor for TupleType {
    fn name(&self) -> String {
        let names: Vec<String> = self.slots.iter().map(|ty| ty.name()).collect();
        format!("Tuple[{}]", names.join(","))
    }

    fn depends(&self) -> Vec<Type> { self.slots.clone() }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(invalid(self, other)),
        };

        for (i, slot) in self.slots.iter().enumerate() {
            cx.write(slot, items.get(i).unwrap_or(&Value::Null))?;
        }
        Ok(())
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        let items = self
            .slots
            .iter()
            .map(|slot| cx.read(slot))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(items))
    }

    fn equal(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => self
                .slots
                .iter()
                .enumerate()
                .all(|(i, slot)| slot.equal(items.get(i).unwrap_or(&Value::Null))),
            _ => false,
        }
    }
}

impl TypeCache {
    /// A tuple of `slots`.
    pub fn tuple(&self, slots: &[Type]) -> Type {
        let args = slots.iter().cloned().map(Arg::Type).collect();
        self.get_or_insert_with("tuple", args, || {
            Type::new(TupleType {
                slots: slots.to_vec(),
            })
        })
    }
}
