//! The schema composer.
//!
//! A [`DataPack`] is built from a root descriptor. It computes the schema closure
//! once, then for every value gives each descriptor in the closure a fresh column,
//! runs the root descriptor over the value, and lays the columns out as
//! length-prefixed segments in closure order. Reading replays the same steps in
//! reverse.

use crate::{
    buffer::{ByteCursor, BUFFER_SIZE},
    descriptor::{Columns, Context, Type, DEFAULT_MAX_LEN},
    errors::PackError,
    rep::PackRep,
    Value,
};
use bytes::Bytes;
use failure::Error;
use hashbrown::HashSet;
use std::fmt;
use tracing::{debug, trace};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Knobs of a [`DataPack`].
pub struct PackConfig {
    /// Initial capacity of the scratch buffers.
    pub scratch_capacity: usize,
    /// Fail reads that leave bytes after the last segment.
    pub strict_trailing: bool,
    /// Longest array a read accepts.
    pub max_len: usize,
}

impl Default for PackConfig {
    fn default() -> Self {
        PackConfig {
            scratch_capacity: BUFFER_SIZE,
            strict_trailing: true,
            max_len: DEFAULT_MAX_LEN,
        }
    }
}

/// Packs values of one schema into bytes and back.
///
/// A buffer carries no description of its schema, so it can only be read by a
/// `DataPack` built from the same descriptors.
///
/// # Example
///
/// ```
/// use datapack::prelude::*;
///
/// let mut pack = DataPack::new(t::array(t::varint()));
///
/// let value = Value::from(vec![0, 127, 128]);
/// let bytes = pack.write(&value).unwrap();
///
/// // one segment: length 5, then 3, 0, 127, 128
/// assert_eq!(bytes.as_ref(), [5, 3, 0, 127, 0x80, 0x01]);
/// assert_eq!(pack.read(&bytes).unwrap(), value);
/// ```
pub struct DataPack {
    root: Type,
    schema: Vec<Type>,
    scratch: ByteCursor,
    segment: ByteCursor,
    config: PackConfig,
}

impl DataPack {
    /// Creates a composer for `root` with the default [`PackConfig`].
    pub fn new(root: Type) -> Self { DataPack::with_config(root, PackConfig::default()) }

    /// Creates a composer for `root`.
    pub fn with_config(root: Type, config: PackConfig) -> Self {
        let schema = closure(&root);
        debug!(
            root = %root.name(),
            descriptors = schema.len(),
            segments = schema.iter().filter(|ty| ty.store().is_some()).count(),
            "composed schema"
        );

        DataPack {
            scratch: ByteCursor::with_capacity(config.scratch_capacity),
            segment: ByteCursor::new(),
            root,
            schema,
            config,
        }
    }

    /// The root descriptor.
    pub fn root(&self) -> &Type { &self.root }

    /// The root and every descriptor it reaches, in segment order.
    pub fn schema(&self) -> &[Type] { &self.schema }

    /// The configuration this composer was built with.
    pub fn config(&self) -> &PackConfig { &self.config }

    /// Indicates whether the root descriptor accepts `value`.
    pub fn equal(&self, value: &Value) -> bool { self.root.equal(value) }

    /// Encodes `value`.
    pub fn write(&mut self, value: &Value) -> Result<Bytes, Error> {
        let mut columns = Columns::with_capacity(self.schema.len());
        for ty in &self.schema {
            columns.insert(ty.id(), ty.initial());
        }

        self.root.write(&mut Context::new(&mut columns, &self.root), value)?;

        self.scratch.reset();
        for ty in &self.schema {
            let store = match ty.store() {
                Some(store) => store,
                None => continue,
            };
            let column = columns
                .get(&ty.id())
                .ok_or_else(|| PackError::Unregistered { name: ty.name() })?;

            self.segment.reset();
            store.encode(column, &mut self.segment)?;

            let payload = self.segment.as_slice();
            trace!(descriptor = %ty.name(), len = payload.len(), "wrote segment");
            self.scratch.put_varint(payload.len() as u64);
            self.scratch.write(payload);
        }

        Ok(self.scratch.to_bytes())
    }

    /// Decodes a buffer produced by [`DataPack::write`] with the same schema.
    ///
    /// # Errors
    ///
    /// Truncated or corrupt input fails, typically with [`PackError::Truncated`] or
    /// [`PackError::OutOfRange`]. Input written with another schema may fail or may
    /// decode to a wrong value; it is never detected as such.
    pub fn read(&mut self, data: &[u8]) -> Result<Value, Error> {
        self.scratch.reset();
        self.scratch.write(data);
        self.scratch.start();

        let mut columns = Columns::with_capacity(self.schema.len());
        for ty in &self.schema {
            let column = match ty.store() {
                None => ty.initial(),
                Some(store) => {
                    let len = self.scratch.get_varint()? as usize;
                    trace!(descriptor = %ty.name(), len, "read segment");
                    if len == 0 {
                        ty.initial()
                    } else {
                        store.decode(self.scratch.read(len)?)?
                    }
                }
            };
            columns.insert(ty.id(), column);
        }

        let trailing = self.scratch.remaining();
        if self.config.strict_trailing && trailing > 0 {
            return Err(PackError::TrailingBytes(trailing).into());
        }

        let mut cx = Context::new(&mut columns, &self.root).with_max_len(self.config.max_len);
        self.root.read(&mut cx)
    }

    /// Encodes anything with a [`PackRep`].
    pub fn write_rep<T: PackRep>(&mut self, t: &T) -> Result<Bytes, Error> { self.write(&t.to_value()) }

    /// Decodes into anything with a [`PackRep`].
    pub fn read_rep<T: PackRep>(&mut self, data: &[u8]) -> Result<T, Error> {
        T::from_value(self.read(data)?)
    }
}

impl fmt::Debug for DataPack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DataPack")
            .field("root", &self.root)
            .field("schema", &self.schema)
            .field("config", &self.config)
            .finish()
    }
}

/// `root` followed by everything reachable through `depends`, depth-first, each
/// descriptor at its first occurrence.
fn closure(root: &Type) -> Vec<Type> {
    fn visit(ty: &Type, seen: &mut HashSet<Type>, out: &mut Vec<Type>) {
        if !seen.insert(ty.clone()) {
            return;
        }
        out.push(ty.clone());
        for dep in ty.depends() {
            visit(&dep, seen, out);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    visit(root, &mut seen, &mut out);
    out
}
