use datapack::prelude::*;
use num_traits::Num;
use proptest::{collection::vec, prelude::*, strategy::Union};

/// arbitrary non-negative integer for use with proptest
pub fn arb_biguint() -> impl Strategy<Value = BigUint> {
    "0|1[0-1]{0,200}".prop_map(|n| -> BigUint { BigUint::from_str_radix(&n, 2).unwrap() })
}

/// arbitrary whole number in `[0, 2^53 - 1]`
pub fn arb_safe_uint() -> impl Strategy<Value = f64> {
    prop_oneof![
        0u64..300,
        0u64..=(datapack::util::MAX_SAFE_INTEGER as u64),
    ]
    .prop_map(|n| n as f64)
}

/// arbitrary number that survives a round trip through `kind`
///
/// `NaN` is left out since it never compares equal, and so are infinities since
/// JSON cannot hold them.
pub fn arb_number(kind: NumKind) -> BoxedStrategy<f64> {
    match kind {
        NumKind::Uint8 => any::<u8>().prop_map(f64::from).boxed(),
        NumKind::Uint16 => any::<u16>().prop_map(f64::from).boxed(),
        NumKind::Uint32 => any::<u32>().prop_map(f64::from).boxed(),
        NumKind::Int8 => any::<i8>().prop_map(f64::from).boxed(),
        NumKind::Int16 => any::<i16>().prop_map(f64::from).boxed(),
        NumKind::Int32 => any::<i32>().prop_map(f64::from).boxed(),
        NumKind::Float16 => any::<u16>()
            .prop_map(|bits| f16::from_bits(bits).to_f64())
            .prop_filter("finite", |n| n.is_finite())
            .boxed(),
        NumKind::Float32 => any::<f32>()
            .prop_filter("finite", |n| n.is_finite())
            .prop_map(f64::from)
            .boxed(),
        NumKind::Float64 => any::<f64>().prop_filter("finite", |n| n.is_finite()).boxed(),
    }
}

/// arbitrary numeric element type
pub fn arb_num_kind() -> impl Strategy<Value = NumKind> {
    prop_oneof![
        Just(NumKind::Uint8),
        Just(NumKind::Uint16),
        Just(NumKind::Uint32),
        Just(NumKind::Int8),
        Just(NumKind::Int16),
        Just(NumKind::Int32),
        Just(NumKind::Float16),
        Just(NumKind::Float32),
        Just(NumKind::Float64),
    ]
}

/// arbitrary JSON-compatible value for use with proptest
pub fn arb_json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("finite", |n| n.is_finite())
            .prop_map(Value::from),
        any::<String>().prop_map(Value::from),
    ];
    leaf.prop_recursive(
        4,  // max depth
        32, // max nodes
        8,  // max items per collection
        |inner| {
            prop_oneof![
                vec(inner.clone(), 0..8).prop_map(Value::from),
                vec((any::<String>(), inner), 0..8)
                    .prop_map(|entries| Value::from(entries.into_iter().collect::<Record>())),
            ]
        },
    )
}

fn arb_lit() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-3i32..3).prop_map(Value::from),
        "[a-c]{0,2}".prop_map(Value::from),
    ]
}

#[derive(Clone, Debug)]
/// The shape of a schema, from which both a descriptor and its values are drawn.
pub enum Shape {
    /// `num(kind)`
    Num(NumKind),
    /// `varint()`
    Varint,
    /// `leb128()`
    Leb128,
    /// `bool()`
    Bool,
    /// `str()`
    Str,
    /// `json()`
    Json,
    /// `lit(value)`
    Lit(Value),
    /// `array(shape)`
    Array(Box<Shape>),
    /// `tuple(shapes)`
    Tuple(Vec<Shape>),
    /// `obj(fields)`
    Obj(Vec<(String, Shape)>),
    /// `or(shapes)`
    Or(Vec<Shape>),
    /// `map(shapes)`
    Map(Vec<Shape>),
    /// `map_default()`
    MapDefault,
}

impl Shape {
    /// The descriptor for this shape, from the global cache.
    pub fn to_type(&self) -> Type {
        match self {
            Shape::Num(kind) => t::num(*kind),
            Shape::Varint => t::varint(),
            Shape::Leb128 => t::leb128(),
            Shape::Bool => t::bool(),
            Shape::Str => t::str(),
            Shape::Json => t::json(),
            Shape::Lit(v) => t::lit(v.clone()),
            Shape::Array(s) => t::array(s.to_type()),
            Shape::Tuple(ss) => t::tuple(ss.iter().map(Shape::to_type).collect()),
            Shape::Obj(fields) => t::obj(
                fields
                    .iter()
                    .map(|(k, s)| (k.as_str(), s.to_type()))
                    .collect(),
            ),
            Shape::Or(ss) => t::or(ss.iter().map(Shape::to_type).collect()),
            Shape::Map(ss) => t::map(ss.iter().map(Shape::to_type).collect()),
            Shape::MapDefault => t::map_default(),
        }
    }

    /// Values of this shape that survive a round trip unchanged.
    pub fn arb_value(&self) -> BoxedStrategy<Value> {
        match self {
            Shape::Num(kind) => arb_number(*kind).prop_map(Value::from).boxed(),
            Shape::Varint => arb_safe_uint().prop_map(Value::from).boxed(),
            Shape::Leb128 => arb_biguint().prop_map(Value::from).boxed(),
            Shape::Bool => any::<bool>().prop_map(Value::from).boxed(),
            Shape::Str => any::<String>().prop_map(Value::from).boxed(),
            Shape::Json => arb_json_value().boxed(),
            Shape::Lit(v) => Just(v.clone()).boxed(),
            Shape::Array(s) => vec(s.arb_value(), 0..6).prop_map(Value::from).boxed(),
            Shape::Tuple(ss) => ss
                .iter()
                .map(Shape::arb_value)
                .collect::<Vec<_>>()
                .prop_map(Value::from)
                .boxed(),
            Shape::Obj(fields) => {
                let keys: Vec<String> = fields.iter().map(|(k, _)| k.clone()).collect();
                fields
                    .iter()
                    .map(|(_, s)| s.arb_value())
                    .collect::<Vec<_>>()
                    .prop_map(move |values| {
                        Value::from(keys.iter().cloned().zip(values).collect::<Record>())
                    })
                    .boxed()
            }
            Shape::Or(ss) => Union::new(ss.iter().map(Shape::arb_value)).boxed(),
            Shape::Map(ss) => {
                let values = Union::new(ss.iter().map(Shape::arb_value));
                vec((any::<String>(), values), 0..6)
                    .prop_map(|entries| Value::from(entries.into_iter().collect::<Record>()))
                    .boxed()
            }
            Shape::MapDefault => vec((any::<String>(), arb_json_value()), 0..6)
                .prop_map(|entries| Value::from(entries.into_iter().collect::<Record>()))
                .boxed(),
        }
    }
}

fn arb_leaf_shape() -> BoxedStrategy<Shape> {
    prop_oneof![
        arb_num_kind().prop_map(Shape::Num),
        Just(Shape::Varint),
        Just(Shape::Leb128),
        Just(Shape::Bool),
        Just(Shape::Str),
        Just(Shape::Json),
        arb_lit().prop_map(Shape::Lit),
    ]
    .boxed()
}

/// shapes that read back exactly the values they accept, so they are safe as
/// union variants
fn arb_variant_shape() -> BoxedStrategy<Shape> {
    prop_oneof![
        arb_leaf_shape(),
        arb_leaf_shape().prop_map(|s| Shape::Array(Box::new(s))),
    ]
    .boxed()
}

fn unique_fields(fields: Vec<(String, Shape)>) -> Vec<(String, Shape)> {
    let mut out: Vec<(String, Shape)> = Vec::with_capacity(fields.len());
    for (k, s) in fields {
        if out.iter().all(|(seen, _)| *seen != k) {
            out.push((k, s));
        }
    }
    out
}

/// arbitrary schema shape for use with proptest
pub fn arb_shape() -> impl Strategy<Value = Shape> {
    arb_leaf_shape().prop_recursive(
        4,  // max depth
        24, // max nodes
        4,  // max items per collection
        |inner| {
            prop_oneof![
                inner.clone().prop_map(|s| Shape::Array(Box::new(s))),
                vec(inner.clone(), 0..4).prop_map(Shape::Tuple),
                vec(("[a-z]{1,3}", inner), 0..4).prop_map(|fs| Shape::Obj(unique_fields(fs))),
                vec(arb_variant_shape(), 1..4).prop_map(Shape::Or),
                vec(arb_variant_shape(), 1..4).prop_map(Shape::Map),
                Just(Shape::MapDefault),
            ]
        },
    )
}

/// arbitrary schema together with a value it accepts
pub fn arb_schema_value() -> impl Strategy<Value = (Shape, Value)> {
    arb_shape().prop_flat_map(|shape| {
        let values = shape.arb_value();
        (Just(shape), values)
    })
}
