//! Error types.

use failure::Fail;

#[derive(Debug, Clone, PartialEq, Fail)]
/// Errors raised by the codec itself.
///
/// Operations return [`failure::Error`]; a `PackError` can be recovered with
/// `error.downcast_ref::<PackError>()`.
pub enum PackError {
    /// A column was read past the values recorded for it.
    #[fail(display = "read past the recorded values of `{}`", name)]
    OutOfRange {
        /// Name of the descriptor whose column ran dry.
        name: String,
    },
    /// A union could not place a value, or decoded a branch it does not have.
    #[fail(display = "unsupported type for `{}`", name)]
    UnsupportedType {
        /// Name of the union descriptor.
        name: String,
    },
    /// A numeric descriptor was requested with a width that does not exist.
    #[fail(display = "no {} type is {} bits wide", family, bits)]
    UnsupportedWidth {
        /// `uint`, `int` or `float`.
        family: &'static str,
        /// The requested width.
        bits: u8,
    },
    /// A descriptor was handed a value of the wrong shape.
    #[fail(display = "`{}` cannot hold a {} value", name, found)]
    InvalidValue {
        /// Name of the descriptor.
        name: String,
        /// Kind of the rejected value.
        found: &'static str,
    },
    /// A buffer ended before the requested bytes.
    #[fail(display = "tried to read {} bytes, {} remain", needed, remaining)]
    Truncated {
        /// Bytes requested.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },
    /// A varint did not terminate within 64 bits.
    #[fail(display = "varint does not fit in 64 bits")]
    VarintOverflow,
    /// String offsets or bytes were invalid.
    #[fail(display = "invalid string data: {}", _0)]
    InvalidString(String),
    /// A descriptor was used that is not part of the schema closure.
    #[fail(display = "`{}` is not part of the schema", name)]
    Unregistered {
        /// Name of the unknown descriptor.
        name: String,
    },
    /// A descriptor found an accumulator of another shape.
    #[fail(display = "`{}` expected a {} column", name, expected)]
    ColumnMismatch {
        /// Name of the descriptor.
        name: String,
        /// Column shape the descriptor works with.
        expected: &'static str,
    },
    /// A decoded length exceeds the configured limit.
    #[fail(display = "`{}` length {} exceeds the limit of {}", name, len, max)]
    LengthLimit {
        /// Name of the descriptor that read the length.
        name: String,
        /// The decoded length.
        len: usize,
        /// The limit in effect.
        max: usize,
    },
    /// Bytes were left over after every segment was read.
    #[fail(display = "{} bytes left after the last segment", _0)]
    TrailingBytes(usize),
}
