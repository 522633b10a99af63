//! Booleans packed eight to a byte.

use crate::{
    buffer::ByteCursor,
    cache::TypeCache,
    column::{Column, Queue},
    descriptor::{Context, Descriptor, Store, Type},
    types::invalid,
    Value,
};
use failure::Error;
use smallvec::SmallVec;

/// Packs `bits` MSB-first: bit `8i + j` goes to bit `7 - j` of byte `i`.
///
/// # Example
///
/// ```
/// use datapack::types::boolean::pack_bits;
///
/// let bits = [true, false, true, true, false, false, false, false, true];
/// assert_eq!(pack_bits(&bits), [0b1011_0000, 0b1000_0000]);
/// ```
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut out = vec![0u8; (bits.len() + 7) / 8];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            out[i / 8] |= 0x80 >> (i % 8);
        }
    }
    out
}

/// Unpacks every bit of `bytes`, trailing padding included.
pub fn unpack_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|byte| (0..8u32).map(move |j| (byte << j) & 0x80 != 0))
        .collect()
}

#[derive(Debug)]
/// Booleans in a bitset. Reading past the recorded bits yields `false`.
pub struct BoolType;

impl Descriptor for BoolType {
    fn name(&self) -> String { "Boolean".to_owned() }

    fn initial(&self) -> Column { Column::Bools(Queue::new()) }

    fn store(&self) -> Option<&dyn Store> { Some(self) }

    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error> {
        match value {
            Value::Bool(b) => {
                cx.column()?.bools("Boolean")?.push(*b);
                Ok(())
            }
            other => Err(invalid(self, other)),
        }
    }

    fn read(&self, cx: &mut Context) -> Result<Value, Error> {
        let bit = cx.column()?.bools("Boolean")?.next().copied();
        Ok(Value::Bool(bit.unwrap_or(false)))
    }

    fn equal(&self, value: &Value) -> bool { value.as_bool().is_some() }
}

impl Store for BoolType {
    fn encode(&self, column: &Column, out: &mut ByteCursor) -> Result<(), Error> {
        out.write(&pack_bits(column.bools_ref("Boolean")?.as_slice()));
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Column, Error> {
        Ok(Column::Bools(unpack_bits(bytes).into()))
    }
}

impl TypeCache {
    /// The boolean descriptor.
    pub fn bool(&self) -> Type {
        self.get_or_insert_with("bool", SmallVec::new(), || Type::new(BoolType))
    }
}
