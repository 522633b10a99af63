//! Per-descriptor accumulators.
//!
//! During a write pass every descriptor with a store appends to its own [`Column`];
//! during a read pass the column is rebuilt from its segment and drained front to
//! back through a [`Queue`] cursor.

use crate::errors::PackError;
use failure::Error;
use num_bigint::BigUint;

#[derive(Clone, Debug, PartialEq)]
/// A list of values with a read cursor.
pub struct Queue<T> {
    data: Vec<T>,
    cursor: usize,
}

impl<T> Queue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Queue {
            data: Vec::new(),
            cursor: 0,
        }
    }

    /// Creates a queue over `data`, positioned at the first element.
    pub fn from_vec(data: Vec<T>) -> Self { Queue { data, cursor: 0 } }

    /// Appends a value.
    pub fn push(&mut self, t: T) { self.data.push(t) }

    /// Returns the value at the cursor and advances past it.
    pub fn next(&mut self) -> Option<&T> {
        let item = self.data.get(self.cursor)?;
        self.cursor += 1;
        Some(item)
    }

    /// Every value, read or not.
    pub fn as_slice(&self) -> &[T] { &self.data }

    /// Number of values.
    pub fn len(&self) -> usize { self.data.len() }

    /// Indicates whether the queue holds no values.
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Position of the read cursor.
    pub fn cursor(&self) -> usize { self.cursor }
}

impl<T> Default for Queue<T> {
    fn default() -> Self { Queue::new() }
}

impl<T> From<Vec<T>> for Queue<T> {
    fn from(data: Vec<T>) -> Self { Queue::from_vec(data) }
}

#[derive(Clone, Debug, PartialEq)]
/// The accumulator of one descriptor for one pass.
pub enum Column {
    /// Descriptors without a store.
    Empty,
    /// Fixed-width numbers.
    Numbers(Queue<f64>),
    /// Varint-encoded integers.
    Varints(Queue<u64>),
    /// LEB128-encoded integers.
    BigInts(Queue<BigUint>),
    /// Booleans before packing.
    Bools(Queue<bool>),
    /// The deduplicated string blob.
    Text(String),
}

macro_rules! column_accessor {
    ($fn:ident, $fn_ref:ident, $variant:ident, $t:ty, $shape:expr) => {
        #[doc = concat!("Returns the `", stringify!($variant), "` payload, or a")]
        /// [`PackError::ColumnMismatch`] naming the descriptor `name`.
        pub fn $fn(&mut self, name: &str) -> Result<&mut $t, Error> {
            match self {
                Column::$variant(inner) => Ok(inner),
                _ => Err(mismatch(name, $shape)),
            }
        }

        #[doc = concat!("Shared access to the `", stringify!($variant), "` payload.")]
        pub fn $fn_ref(&self, name: &str) -> Result<&$t, Error> {
            match self {
                Column::$variant(inner) => Ok(inner),
                _ => Err(mismatch(name, $shape)),
            }
        }
    };
}

fn mismatch(name: &str, expected: &'static str) -> Error {
    PackError::ColumnMismatch {
        name: name.to_owned(),
        expected,
    }
    .into()
}

impl Column {
    column_accessor!(numbers, numbers_ref, Numbers, Queue<f64>, "numeric");
    column_accessor!(varints, varints_ref, Varints, Queue<u64>, "varint");
    column_accessor!(bigints, bigints_ref, BigInts, Queue<BigUint>, "LEB128");
    column_accessor!(bools, bools_ref, Bools, Queue<bool>, "boolean");
    column_accessor!(text, text_ref, Text, String, "text");
}

impl Default for Column {
    fn default() -> Self { Column::Empty }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drains_in_order() {
        let mut q = Queue::from_vec(vec![1, 2]);
        assert_eq!(q.next(), Some(&1));
        assert_eq!(q.next(), Some(&2));
        assert_eq!(q.next(), None);
        assert_eq!(q.cursor(), 2);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn accessor_mismatch() {
        let mut column = Column::Text(String::new());
        assert!(column.text("String").is_ok());

        let err = column.numbers("Uint8").unwrap_err();
        assert_eq!(
            err.downcast_ref::<PackError>(),
            Some(&PackError::ColumnMismatch {
                name: "Uint8".to_owned(),
                expected: "numeric"
            })
        );

        assert!(column.text_ref("String").is_ok());
        assert!(column.bools_ref("Boolean").is_err());
    }
}
