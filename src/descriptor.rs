//! The descriptor contract and the context descriptors run in.

use crate::{buffer::ByteCursor, column::Column, errors::PackError, Value};
use failure::Error;
use hashbrown::HashMap;
use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    sync::Arc,
};

/// A type descriptor: a node of the schema graph.
///
/// Descriptors are immutable once built and are shared through [`Type`] handles.
/// Everything they accumulate during a pass lives in the [`Column`] the composer
/// keeps for them, reached through the [`Context`].
pub trait Descriptor: Send + Sync {
    /// Human-readable name, used in error messages.
    fn name(&self) -> String;

    /// Descriptors this one delegates to.
    fn depends(&self) -> Vec<Type> { Vec::new() }

    /// A fresh accumulator for one pass.
    fn initial(&self) -> Column { Column::Empty }

    /// How the accumulator is serialized, if it is at all.
    fn store(&self) -> Option<&dyn Store> { None }

    /// Records `value`.
    fn write(&self, cx: &mut Context, value: &Value) -> Result<(), Error>;

    /// Reproduces the next recorded value.
    fn read(&self, cx: &mut Context) -> Result<Value, Error>;

    /// Indicates whether `value` belongs to this descriptor's domain.
    fn equal(&self, value: &Value) -> bool;
}

/// Serializes a column to a segment payload and back.
pub trait Store {
    /// Encodes a finished column.
    fn encode(&self, column: &Column, out: &mut ByteCursor) -> Result<(), Error>;

    /// Rebuilds a column from a segment payload.
    fn decode(&self, bytes: &[u8]) -> Result<Column, Error>;
}

/// Identity of a descriptor: the address of the shared allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(usize);

#[derive(Clone)]
/// A shared handle to a descriptor.
///
/// Two handles are equal only when they point to the same descriptor; two
/// descriptors built separately from the same arguments are distinct and get
/// distinct columns.
pub struct Type(Arc<dyn Descriptor>);

impl Type {
    /// Wraps a descriptor.
    pub fn new<D: Descriptor + 'static>(descriptor: D) -> Type { Type(Arc::new(descriptor)) }

    /// The descriptor's identity.
    pub fn id(&self) -> DescriptorId { DescriptorId(Arc::as_ptr(&self.0) as *const () as usize) }

    /// Indicates whether both handles point to the same descriptor.
    pub fn ptr_eq(&self, other: &Type) -> bool { self.id() == other.id() }
}

impl Deref for Type {
    type Target = dyn Descriptor;

    fn deref(&self) -> &(dyn Descriptor + 'static) { &*self.0 }
}

impl PartialEq for Type {
    fn eq(&self, other: &Type) -> bool { self.ptr_eq(other) }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) { self.id().hash(state) }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "Type({})", self.name()) }
}

pub(crate) type Columns = HashMap<DescriptorId, Column>;

/// What a descriptor sees while writing or reading: its own column, and a way to
/// hand values to the descriptors it depends on.
pub struct Context<'a> {
    columns: &'a mut Columns,
    current: &'a Type,
    max_len: usize,
}

/// Longest list a [`Context`] reads unless configured otherwise.
pub const DEFAULT_MAX_LEN: usize = u32::MAX as usize;

impl<'a> Context<'a> {
    pub(crate) fn new(columns: &'a mut Columns, current: &'a Type) -> Self {
        Context {
            columns,
            current,
            max_len: DEFAULT_MAX_LEN,
        }
    }

    pub(crate) fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// The descriptor currently running.
    pub fn current(&self) -> &Type { self.current }

    /// Longest list a descriptor may read; decoded lengths above it are corrupt.
    pub fn max_len(&self) -> usize { self.max_len }

    /// The current descriptor's column.
    pub fn column(&mut self) -> Result<&mut Column, Error> {
        let current = self.current;
        self.columns
            .get_mut(&current.id())
            .ok_or_else(|| unregistered(current))
    }

    /// Writes `value` through `ty`.
    pub fn write(&mut self, ty: &Type, value: &Value) -> Result<(), Error> {
        self.enter(ty)?;
        let max_len = self.max_len;
        ty.write(&mut Context::new(self.columns, ty).with_max_len(max_len), value)
    }

    /// Reads the next value of `ty`.
    pub fn read(&mut self, ty: &Type) -> Result<Value, Error> {
        self.enter(ty)?;
        let max_len = self.max_len;
        ty.read(&mut Context::new(self.columns, ty).with_max_len(max_len))
    }

    fn enter(&self, ty: &Type) -> Result<(), Error> {
        if self.columns.contains_key(&ty.id()) {
            Ok(())
        } else {
            Err(unregistered(ty))
        }
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("current", self.current)
            .field("columns", &self.columns.len())
            .field("max_len", &self.max_len)
            .finish()
    }
}

fn unregistered(ty: &Type) -> Error { PackError::Unregistered { name: ty.name() }.into() }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types as t;

    #[test]
    fn identity_is_the_allocation() {
        let a = t::varint();
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());

        let other = Type::new(crate::types::varint::VarintType);
        assert_ne!(a, other);
    }

    #[test]
    fn unknown_descriptor_is_rejected() {
        let known = t::varint();
        let unknown = t::bool();

        let mut columns = Columns::new();
        columns.insert(known.id(), known.initial());

        let mut cx = Context::new(&mut columns, &known);
        assert!(cx.write(&known, &Value::from(1)).is_ok());

        let err = cx.write(&unknown, &Value::from(true)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PackError>(),
            Some(&PackError::Unregistered {
                name: "Boolean".to_owned()
            })
        );
    }
}
