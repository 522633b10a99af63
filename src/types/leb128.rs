//! Non-negative big integers as unsigned LEB128.

use crate::{
    buffer::ByteCursor,
    cache::TypeCache,
    column::{Column, Queue},
    descriptor::{Context, Descriptor, Store, Type},
    types::{exhausted, invalid},
    Value,
};
use failure::Error;
use num_bigint::Sign;
use smallvec::SmallVec;

#[derive(Debug)]
/// Arbitrary precision, non-negative [`Value::BigInt`]s.
pub struct LebType;

impl Descriptor for LebType {
    fn name(&self) -> String { "Leb128".to_owned() }

    fn initial(&self) -> Column { Column::BigInts(Queue::new()) }

    fn store(&self) -> Option<&dyn Store> { Some(self) }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        match value.as_bigint().and_then(|i| i.to_biguint()) {
            Some(u) => {
                cx.column()?.bigints("Leb128")?.push(u);
                Ok(())
            }
            None => Err(invalid(self, value)),
        }
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        match cx.column()?.bigints("Leb128")?.next() {
            Some(u) => Ok(Value::from(u.clone())),
            None => Err(exhausted(self)),
        }
    }

    fn equal(&self, value: &Value) -> bool {
        match value {
            Value::BigInt(i) => i.sign() != Sign::Minus,
            _ => false,
        }
    }
}

impl Store for LebType {
    fn encode(&self, column: &Column, out: &mut ByteCursor) -> Result<(), Error> {
        for u in column.bigints_ref("Leb128")?.as_slice() {
            out.put_leb128(u);
        }
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Column, Error> {
        let mut buf = ByteCursor::from_slice(bytes);
        let mut data = Vec::new();
        while buf.remaining() > 0 {
            data.push(buf.get_leb128()?);
        }
        Ok(Column::BigInts(data.into()))
    }
}

impl TypeCache {
    /// The LEB128 descriptor.
    pub fn leb128(&self) -> Type {
        self.get_or_insert_with("leb128", SmallVec::new(), || Type::new(LebType))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::{BigInt, BigUint};

    #[test]
    fn encoding() {
        let huge = BigUint::from(1u8) << 100;
        let column = Column::BigInts(vec![BigUint::from(0u8), BigUint::from(624_485u32), huge].into());

        let mut out = ByteCursor::new();
        LebType.encode(&column, &mut out).unwrap();
        assert_eq!(&out.as_slice()[..4], [0x00, 0xe5, 0x8e, 0x26]);
        // 101 bits take 15 groups
        assert_eq!(out.len(), 4 + 15);

        assert_eq!(LebType.decode(out.as_slice()).unwrap(), column);
    }

    #[test]
    fn membership() {
        assert!(LebType.equal(&Value::from(BigInt::from(0))));
        assert!(LebType.equal(&Value::from(BigInt::from(1) << 80)));
        assert!(!LebType.equal(&Value::from(BigInt::from(-1))));
        assert!(!LebType.equal(&Value::from(1)));
    }
}
