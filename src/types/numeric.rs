//! Fixed-width numeric descriptors.
//!
//! Every kind stores its column as a packed little-endian array of its element
//! type. Writing a number that does not survive the element type unchanged, as
//! [`Descriptor::equal`] reports it, fails with [`PackError::InvalidValue`].

use crate::{
    buffer::ByteCursor,
    cache::{Arg, TypeCache},
    column::{Column, Queue},
    descriptor::{Context, Descriptor, Store, Type},
    errors::PackError,
    types::{exhausted, invalid},
    Value,
};
use byteorder::LittleEndian;
use failure::Error;
use half::f16;
use smallvec::smallvec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Element type of a numeric descriptor.
pub enum NumKind {
    /// `u8`
    Uint8,
    /// `u16`
    Uint16,
    /// `u32`
    Uint32,
    /// `i8`
    Int8,
    /// `i16`
    Int16,
    /// `i32`
    Int32,
    /// IEEE 754 half precision.
    Float16,
    /// `f32`
    Float32,
    /// `f64`
    Float64,
}

use NumKind::*;

impl NumKind {
    /// Descriptor name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Uint8 => "Uint8",
            Uint16 => "Uint16",
            Uint32 => "Uint32",
            Int8 => "Int8",
            Int16 => "Int16",
            Int32 => "Int32",
            Float16 => "Float16",
            Float32 => "Float32",
            Float64 => "Float64",
        }
    }

    /// Bytes per element.
    pub fn width(self) -> usize {
        match self {
            Uint8 | Int8 => 1,
            Uint16 | Int16 | Float16 => 2,
            Uint32 | Int32 | Float32 => 4,
            Float64 => 8,
        }
    }

    /// Indicates whether `n` survives a round trip through the element type.
    ///
    /// `NaN` only fits [`Float64`], the one kind that stores numbers unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use datapack::types::NumKind;
    ///
    /// assert!(NumKind::Uint8.fits(255.0));
    /// assert!(!NumKind::Uint8.fits(256.0));
    /// assert!(!NumKind::Int16.fits(1.5));
    /// assert!(NumKind::Float32.fits(0.5));
    /// assert!(!NumKind::Float32.fits(0.1));
    /// ```
    pub fn fits(self, n: f64) -> bool {
        match self {
            Uint8 => n as u8 as f64 == n,
            Uint16 => n as u16 as f64 == n,
            Uint32 => n as u32 as f64 == n,
            Int8 => n as i8 as f64 == n,
            Int16 => n as i16 as f64 == n,
            Int32 => n as i32 as f64 == n,
            Float16 => f16::from_f64(n).to_f64() == n,
            Float32 => n as f32 as f64 == n,
            Float64 => true,
        }
    }

    fn put(self, buf: &mut ByteCursor, n: f64) {
        match self {
            Uint8 => buf.put_u8(n as u8),
            Uint16 => buf.put_u16::<LittleEndian>(n as u16),
            Uint32 => buf.put_u32::<LittleEndian>(n as u32),
            Int8 => buf.put_i8(n as i8),
            Int16 => buf.put_i16::<LittleEndian>(n as i16),
            Int32 => buf.put_i32::<LittleEndian>(n as i32),
            Float16 => buf.put_u16::<LittleEndian>(f16::from_f64(n).to_bits()),
            Float32 => buf.put_f32::<LittleEndian>(n as f32),
            Float64 => buf.put_f64::<LittleEndian>(n),
        }
    }

    fn get(self, buf: &mut ByteCursor) -> Result<f64, Error> {
        Ok(match self {
            Uint8 => buf.get_u8()? as f64,
            Uint16 => buf.get_u16::<LittleEndian>()? as f64,
            Uint32 => buf.get_u32::<LittleEndian>()? as f64,
            Int8 => buf.get_i8()? as f64,
            Int16 => buf.get_i16::<LittleEndian>()? as f64,
            Int32 => buf.get_i32::<LittleEndian>()? as f64,
            Float16 => f16::from_bits(buf.get_u16::<LittleEndian>()?).to_f64(),
            Float32 => buf.get_f32::<LittleEndian>()? as f64,
            Float64 => buf.get_f64::<LittleEndian>()?,
        })
    }
}

#[derive(Debug)]
/// Descriptor for one [`NumKind`].
pub struct NumType {
    kind: NumKind,
}

impl NumType {
    /// The element type.
    pub fn kind(&self) -> NumKind { self.kind }
}

impl Descriptor for NumType {
    fn name(&self) -> String { self.kind.name().to_owned() }

    fn initial(&self) -> Column { Column::Numbers(Queue::new()) }

    fn store(&self) -> Option<&dyn Store> { Some(self) }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        match value {
            // values that would not read back unchanged are refused, never clamped
            Value::Number(n) if self.kind.fits(*n) => {
                cx.column()?.numbers(self.kind.name())?.push(*n);
                Ok(())
            }
            other => Err(invalid(self, other)),
        }
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        match cx.column()?.numbers(self.kind.name())?.next() {
            Some(n) => Ok(Value::Number(*n)),
            None => Err(exhausted(self)),
        }
    }

    fn equal(&self, value: &Value) -> bool {
        match value {
            Value::Number(n) => self.kind.fits(*n),
            _ => false,
        }
    }
}

impl Store for NumType {
    fn encode(&self, column: &Column, out: &mut ByteCursor) -> Result<(), Error> {
        for n in column.numbers_ref(self.kind.name())?.as_slice() {
            self.kind.put(out, *n);
        }
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Column, Error> {
        let mut buf = ByteCursor::from_slice(bytes);
        let mut data = Vec::with_capacity(bytes.len() / self.kind.width());
        while buf.remaining() > 0 {
            data.push(self.kind.get(&mut buf)?);
        }
        Ok(Column::Numbers(data.into()))
    }
}

impl TypeCache {
    /// A numeric descriptor of kind `kind`.
    pub fn num(&self, kind: NumKind) -> Type {
        self.get_or_insert_with("num", smallvec![Arg::Kind(kind)], || {
            Type::new(NumType { kind })
        })
    }

    /// Unsigned integer of 8, 16 or 32 bits.
    pub fn uint(&self, bits: u8) -> Result<Type, Error> {
        let kind = match bits {
            8 => Uint8,
            16 => Uint16,
            32 => Uint32,
            _ => return Err(width("uint", bits)),
        };
        Ok(self.num(kind))
    }

    /// Signed integer of 8, 16 or 32 bits.
    pub fn int(&self, bits: u8) -> Result<Type, Error> {
        let kind = match bits {
            8 => Int8,
            16 => Int16,
            32 => Int32,
            _ => return Err(width("int", bits)),
        };
        Ok(self.num(kind))
    }

    /// Float of 16, 32 or 64 bits.
    pub fn float(&self, bits: u8) -> Result<Type, Error> {
        let kind = match bits {
            16 => Float16,
            32 => Float32,
            64 => Float64,
            _ => return Err(width("float", bits)),
        };
        Ok(self.num(kind))
    }
}

fn width(family: &'static str, bits: u8) -> Error { PackError::UnsupportedWidth { family, bits }.into() }

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(kind: NumKind, ns: &[f64]) -> Vec<u8> {
        let ty = NumType { kind };
        let mut out = ByteCursor::new();
        ty.encode(&Column::Numbers(ns.to_vec().into()), &mut out).unwrap();
        out.as_slice().to_vec()
    }

    #[test]
    fn widths() {
        let cache = TypeCache::new();
        assert!(cache.uint(8).unwrap().ptr_eq(&cache.num(Uint8)));
        assert!(cache.float(64).unwrap().ptr_eq(&cache.num(Float64)));

        let err = cache.uint(64).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PackError>(),
            Some(&PackError::UnsupportedWidth {
                family: "uint",
                bits: 64
            })
        );
        assert!(cache.int(24).is_err());
        assert!(cache.float(8).is_err());
    }

    #[test]
    fn little_endian_elements() {
        assert_eq!(encode(Uint16, &[1.0, 258.0]), [1, 0, 2, 1]);
        assert_eq!(encode(Int8, &[-1.0]), [0xff]);
        assert_eq!(encode(Int32, &[-2.0]), [0xfe, 0xff, 0xff, 0xff]);
        assert_eq!(encode(Float32, &[1.0]), [0, 0, 0x80, 0x3f]);
        assert_eq!(encode(Float16, &[1.0]), [0x00, 0x3c]);
    }

    #[test]
    fn decode_whole_segment() {
        let ty = NumType { kind: Int16 };
        let column = ty.decode(&[0xff, 0xff, 0x02, 0x00]).unwrap();
        assert_eq!(column, Column::Numbers(vec![-1.0, 2.0].into()));

        let err = ty.decode(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PackError>(),
            Some(&PackError::Truncated {
                needed: 2,
                remaining: 1
            })
        );
    }

    #[test]
    fn membership() {
        let uint8 = NumType { kind: Uint8 };
        assert!(uint8.equal(&Value::from(0)));
        assert!(!uint8.equal(&Value::from(-1)));
        assert!(!uint8.equal(&Value::from("1")));

        let int32 = NumType { kind: Int32 };
        assert!(int32.equal(&Value::from(-2_147_483_648.0)));
        assert!(!int32.equal(&Value::from(2_147_483_648.0)));

        let double = NumType { kind: Float64 };
        assert!(double.equal(&Value::from(std::f64::NAN)));
        assert!(double.equal(&Value::from(std::f64::INFINITY)));

        assert!(!Float16.fits(std::f64::NAN));
        assert!(Float16.fits(65504.0));
        assert!(!Float16.fits(0.1));
    }

    #[test]
    fn out_of_range_writes_are_refused() {
        let cache = TypeCache::new();
        let byte = cache.uint(8).unwrap();

        let mut columns = crate::descriptor::Columns::new();
        columns.insert(byte.id(), byte.initial());
        let mut cx = Context::new(&mut columns, &byte);

        let err = cx.write(&byte, &Value::from(300)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PackError>(),
            Some(&PackError::InvalidValue {
                name: "Uint8".to_owned(),
                found: "number"
            })
        );
        assert!(cx.write(&byte, &Value::from(1.5)).is_err());
        assert!(cx.write(&byte, &Value::from(255)).is_ok());

        // nothing but the accepted value was recorded
        assert_eq!(
            columns[&byte.id()],
            Column::Numbers(vec![255.0].into())
        );
    }

    #[test]
    fn encode_rejects_foreign_columns() {
        let ty = NumType { kind: Uint8 };
        let mut out = ByteCursor::new();

        let err = ty.encode(&Column::Text("x".to_owned()), &mut out).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PackError>(),
            Some(&PackError::ColumnMismatch {
                name: "Uint8".to_owned(),
                expected: "numeric"
            })
        );
        assert!(out.is_empty());
    }
}
