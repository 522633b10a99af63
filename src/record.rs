//! An insertion-ordered map from string keys to values.
//!
//! [`Value::Object`](crate::Value::Object) is backed by a [`Record`]. Key order is
//! observable: `map` descriptors write keys in the order they were inserted, and
//! `obj` descriptors read fields back in declaration order.
//!
//! # Example
//!
//! ```
//! use datapack::prelude::*;
//!
//! let mut record = Record::new();
//! record.insert("b", 1);
//! record.insert("a", 2);
//!
//! // keys keep insertion order
//! let keys: Vec<&str> = record.keys().collect();
//! assert_eq!(keys, ["b", "a"]);
//!
//! // inserting an existing key replaces the value in place
//! record.insert("b", 3);
//! assert_eq!(record.get("b"), Some(&Value::from(3)));
//! assert_eq!(record.len(), 2);
//! ```

use crate::Value;
use std::{collections::HashMap, hash::BuildHasher, iter::FromIterator, slice::Iter, vec::IntoIter};

#[derive(PartialEq, Clone, Debug, Default)]
/// A map implemented as a [`Vec`] of pairs in insertion order.
///
/// Lookups are linear, which is the right trade for the small records schemas
/// usually describe.
///
/// See also: [module level documentation](`crate::record`).
pub struct Record(Vec<(String, Value)>);

impl Record {
    /// Creates an empty [`Record`].
    pub fn new() -> Self { Record(Vec::new()) }

    /// Creates an empty [`Record`] with room for `cap` entries.
    pub fn with_capacity(cap: usize) -> Self { Record(Vec::with_capacity(cap)) }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    /// A replaced key keeps its original position.
    ///
    /// # Arguments
    ///
    /// * `key` - The key.
    /// * `value` - Anything convertible into a [`Value`].
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    /// Indicates whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool { self.get(key).is_some() }

    /// Returns length.
    ///
    /// # Example
    ///
    /// ```
    /// use datapack::prelude::*;
    ///
    /// let record: Record = vec![("foo".to_string(), Value::from("bar"))].into();
    ///
    /// // should have one element
    /// assert_eq!(record.len(), 1);
    /// ```
    pub fn len(&self) -> usize { self.0.len() }

    /// Indicates whether the [`Record`] is empty.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns an [`Iter`] of the key-value pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, (String, Value)> { self.0.iter() }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> { self.0.iter().map(|(k, _)| k.as_str()) }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> { self.0.iter().map(|(_, v)| v) }

    /// Consumes a [`Record`], producing a [`HashMap`] from the entries.
    pub fn into_hashmap<S: BuildHasher + Default>(self) -> HashMap<String, Value, S> {
        self.into_iter().collect()
    }
}

impl From<Vec<(String, Value)>> for Record {
    fn from(v: Vec<(String, Value)>) -> Self { v.into_iter().collect() }
}

impl<S: BuildHasher> From<HashMap<String, Value, S>> for Record {
    fn from(hm: HashMap<String, Value, S>) -> Self {
        let mut v: Vec<(String, Value)> = hm.into_iter().collect();
        // hash order is arbitrary, so pin it down
        v.sort_unstable_by(|(k1, _), (k2, _)| k1.cmp(k2));
        Record(v)
    }
}

impl IntoIterator for Record {
    type IntoIter = IntoIter<(String, Value)>;
    type Item = (String, Value);

    fn into_iter(self) -> IntoIter<(String, Value)> { self.0.into_iter() }
}

impl<'a> IntoIterator for &'a Record {
    type IntoIter = Iter<'a, (String, Value)>;
    type Item = &'a (String, Value);

    fn into_iter(self) -> Iter<'a, (String, Value)> { self.0.iter() }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Record {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
