//! Everything needed to build schemas and pack values.

pub use crate::{
    buffer::ByteCursor,
    cache::TypeCache,
    column::{Column, Queue},
    descriptor::{Context, Descriptor, Store, Type},
    errors::PackError,
    pack::{DataPack, PackConfig},
    record::Record,
    rep::*,
    types::{self as t, NumKind},
    Value,
};
pub use bytes::Bytes;
pub use half::f16;
pub use num_bigint::{BigInt, BigUint};
