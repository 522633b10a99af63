//! Constants that take no space.

use crate::{
    cache::{Arg, TypeCache},
    descriptor::{Context, Descriptor, Type},
    Value,
};
use failure::Error;
use smallvec::smallvec;

#[derive(Debug)]
/// Exactly one value. Writing records nothing; reading yields the constant.
pub struct LitType {
    value: Value,
}

impl Descriptor for LitType {
    fn name(&self) -> String { "Literal".to_owned() }

    fn write(&self, _: &mut Context, _: &Value) -> Result<(), Error> { Ok(()) }

    fn read(&self, _: &mut Context) -> Result<Value, Error> { Ok(self.value.clone()) }

    fn equal(&self, value: &Value) -> bool { *value == self.value }
}

impl TypeCache {
    /// A literal descriptor for `value`.
    pub fn lit(&self, value: Value) -> Type {
        self.get_or_insert_with("lit", smallvec![Arg::Lit(value.clone())], || {
            Type::new(LitType { value })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_membership() {
        let cache = TypeCache::new();
        let null = cache.lit(Value::Null);
        assert!(null.equal(&Value::Null));
        assert!(!null.equal(&Value::from(0)));

        let nan = cache.lit(Value::from(std::f64::NAN));
        assert!(!nan.equal(&Value::from(std::f64::NAN)));
        assert!(nan.store().is_none());
    }
}
