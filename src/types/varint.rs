//! Unsigned integers as varints.

use crate::{
    buffer::ByteCursor,
    cache::TypeCache,
    column::{Column, Queue},
    descriptor::{Context, Descriptor, Store, Type},
    types::{exhausted, invalid},
    util::is_safe_uint,
    Value,
};
use failure::Error;
use smallvec::SmallVec;

#[derive(Debug)]
/// Whole numbers in `[0, 2^53 - 1]`, 7 bits per byte.
///
/// Lengths and offsets of other descriptors are written through this one.
pub struct VarintType;

impl Descriptor for VarintType {
    fn name(&self) -> String { "Varint".to_owned() }

    fn initial(&self) -> Column { Column::Varints(Queue::new()) }

    fn store(&self) -> Option<&dyn Store> { Some(self) }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        match value {
            Value::Number(n) if is_safe_uint(*n) => {
                cx.column()?.varints("Varint")?.push(*n as u64);
                Ok(())
            }
            other => Err(invalid(self, other)),
        }
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        match cx.column()?.varints("Varint")?.next() {
            Some(n) => Ok(Value::Number(*n as f64)),
            None => Err(exhausted(self)),
        }
    }

    fn equal(&self, value: &Value) -> bool {
        match value {
            Value::Number(n) => is_safe_uint(*n),
            _ => false,
        }
    }
}

impl Store for VarintType {
    fn encode(&self, column: &Column, out: &mut ByteCursor) -> Result<(), Error> {
        for n in column.varints_ref("Varint")?.as_slice() {
            out.put_varint(*n);
        }
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Column, Error> {
        let mut buf = ByteCursor::from_slice(bytes);
        let mut data = Vec::new();
        while buf.remaining() > 0 {
            data.push(buf.get_varint()?);
        }
        Ok(Column::Varints(data.into()))
    }
}

impl TypeCache {
    /// The varint descriptor.
    pub fn varint(&self) -> Type {
        self.get_or_insert_with("varint", SmallVec::new(), || Type::new(VarintType))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::PackError, util::MAX_SAFE_INTEGER};

    #[test]
    fn encoding() {
        let mut out = ByteCursor::new();
        let column = Column::Varints(vec![0, 127, 128, 16384].into());
        VarintType.encode(&column, &mut out).unwrap();
        assert_eq!(out.as_slice(), [0x00, 0x7f, 0x80, 0x01, 0x80, 0x80, 0x01]);

        assert_eq!(VarintType.decode(out.as_slice()).unwrap(), column);
    }

    #[test]
    fn cut_off_varint() {
        let err = VarintType.decode(&[0x05, 0x80]).unwrap_err();
        assert!(err.downcast_ref::<PackError>().is_some());
    }

    #[test]
    fn membership() {
        assert!(VarintType.equal(&Value::from(0)));
        assert!(VarintType.equal(&Value::from(MAX_SAFE_INTEGER)));
        assert!(!VarintType.equal(&Value::from(MAX_SAFE_INTEGER + 1.0)));
        assert!(!VarintType.equal(&Value::from(-1)));
        assert!(!VarintType.equal(&Value::from(0.5)));
        assert!(!VarintType.equal(&Value::from(std::f64::NAN)));
    }
}
