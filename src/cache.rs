//! Memoization of descriptor factories.
//!
//! Column allocation is keyed by descriptor identity, so `array(str())` built twice
//! must yield the same descriptor. Every factory goes through a [`TypeCache`]: the
//! first call with a given argument list builds a descriptor, later calls return it.

use crate::{descriptor::Type, types::NumKind, Value};
use smallvec::SmallVec;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

#[derive(Clone, Debug)]
/// One factory argument, as the cache compares it.
pub enum Arg {
    /// A numeric element kind.
    Kind(NumKind),
    /// A descriptor, compared by identity.
    Type(Type),
    /// A literal, compared with `==`.
    Lit(Value),
    /// A field name.
    Key(String),
}

impl Arg {
    fn same(&self, other: &Arg) -> bool {
        match (self, other) {
            (Arg::Kind(a), Arg::Kind(b)) => a == b,
            (Arg::Type(a), Arg::Type(b)) => a.ptr_eq(b),
            (Arg::Lit(a), Arg::Lit(b)) => a == b,
            (Arg::Key(a), Arg::Key(b)) => a == b,
            _ => false,
        }
    }
}

/// Argument list of one factory call.
pub type Args = SmallVec<[Arg; 4]>;

#[derive(Debug)]
struct Entry {
    factory: &'static str,
    args: Args,
    ty: Type,
}

impl Entry {
    fn matches(&self, factory: &str, args: &[Arg]) -> bool {
        self.factory == factory
            && self.args.len() == args.len()
            && self.args.iter().zip(args).all(|(a, b)| a.same(b))
    }
}

#[derive(Debug, Default)]
/// A store of built descriptors, searched linearly by factory and arguments.
///
/// The descriptor factories are methods on this type. The free functions in
/// [`types`](crate::types) use the process-wide [`TypeCache::global`] instance.
pub struct TypeCache {
    entries: Mutex<Vec<Entry>>,
}

impl TypeCache {
    /// Creates an empty cache.
    pub fn new() -> Self { TypeCache::default() }

    /// The process-wide cache.
    pub fn global() -> &'static TypeCache {
        static GLOBAL: OnceLock<TypeCache> = OnceLock::new();
        GLOBAL.get_or_init(TypeCache::new)
    }

    /// Returns the descriptor `factory` built for `args`, building it with `build`
    /// on a miss.
    ///
    /// `build` runs without the lock held, so it may call other factories on the
    /// same cache. If another thread stored an equal entry meanwhile, that entry wins.
    pub fn get_or_insert_with<F: FnOnce() -> Type>(
        &self,
        factory: &'static str,
        args: Args,
        build: F,
    ) -> Type {
        if let Some(ty) = self.lookup(factory, &args) {
            return ty;
        }

        let ty = build();

        let mut entries = self.lock();
        if let Some(entry) = entries.iter().find(|e| e.matches(factory, &args)) {
            return entry.ty.clone();
        }
        entries.push(Entry {
            factory,
            args,
            ty: ty.clone(),
        });
        ty
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize { self.lock().len() }

    /// Indicates whether the cache is empty.
    pub fn is_empty(&self) -> bool { self.lock().is_empty() }

    fn lookup(&self, factory: &str, args: &[Arg]) -> Option<Type> {
        self.lock()
            .iter()
            .find(|e| e.matches(factory, args))
            .map(|e| e.ty.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        // entries are only ever appended, so a poisoned list is still consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
