//! Numeric limits and the `From` helper macros.

/// Largest integer a [`Value::Number`](crate::Value::Number) can hold without losing
/// precision, `2^53 - 1`.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Indicates whether `n` is a whole number within `[0, 2^53 - 1]`.
///
/// # Example
///
/// ```
/// use datapack::util::is_safe_uint;
///
/// assert!(is_safe_uint(16384.0));
/// assert!(!is_safe_uint(-1.0));
/// assert!(!is_safe_uint(0.5));
/// ```
pub fn is_safe_uint(n: f64) -> bool { n >= 0.0 && n <= MAX_SAFE_INTEGER && n.fract() == 0.0 }

/// Number of bytes a varint needs for `num`, at least one.
///
/// # Example
///
/// ```
/// use datapack::util::varint_len;
///
/// assert_eq!(varint_len(0), 1);
/// assert_eq!(varint_len(127), 1);
/// assert_eq!(varint_len(128), 2);
/// assert_eq!(varint_len(16384), 3);
/// ```
pub fn varint_len(num: u64) -> usize {
    let bits = 64 - num.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        (bits + 6) / 7
    }
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_as {
    ($to:tt, $from:ty, $as:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $to::from(f as $as) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_len_matches_group_count() {
        for shift in 0..64 {
            let n = 1u64 << shift;
            assert_eq!(varint_len(n), shift / 7 + 1);
        }
        assert_eq!(varint_len(u64::max_value()), 10);
    }

    #[test]
    fn safe_uint_bounds() {
        assert!(is_safe_uint(MAX_SAFE_INTEGER));
        assert!(!is_safe_uint(MAX_SAFE_INTEGER + 2.0));
        assert!(!is_safe_uint(std::f64::NAN));
        assert!(!is_safe_uint(std::f64::INFINITY));
    }
}
