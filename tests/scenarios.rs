use datapack::prelude::*;

fn record(entries: Vec<(&str, Value)>) -> Value { Value::from(entries.into_iter().collect::<Record>()) }

#[test]
fn object_of_id_and_name() {
    let schema = t::obj(vec![("id", t::uint(32).unwrap()), ("name", t::str())]);
    let mut pack = DataPack::new(schema);

    let value = record(vec![("id", Value::from(7)), ("name", Value::from("hi"))]);
    assert!(pack.equal(&value));

    let enc = pack.write(&value).unwrap();
    // uint32 segment, string segment, then the varint segment with the offsets
    assert_eq!(enc.as_ref(), [4, 7, 0, 0, 0, 2, b'h', b'i', 2, 0, 2]);
    assert_eq!(pack.read(&enc).unwrap(), value);
}

#[test]
fn varint_array() {
    let mut pack = DataPack::new(t::array(t::varint()));
    let value = Value::from(vec![0, 127, 128, 16383, 16384]);

    let enc = pack.write(&value).unwrap();
    // length and elements share the one varint column: 1 + 1 + 1 + 2 + 2 + 3 bytes
    assert_eq!(enc[0], 10);
    assert_eq!(
        &enc[1..],
        [5, 0x00, 0x7f, 0x80, 0x01, 0xff, 0x7f, 0x80, 0x80, 0x01]
    );
    assert_eq!(pack.read(&enc).unwrap(), value);
}

#[test]
fn literal_or_byte() {
    let mut pack = DataPack::new(t::or(vec![t::lit("a"), t::uint(8).unwrap()]));

    // the tag and the value share the one uint8 column
    let five = pack.write(&Value::from(5)).unwrap();
    assert_eq!(five.as_ref(), [2, 1, 5]);
    assert_eq!(pack.read(&five).unwrap(), Value::from(5));

    let a = pack.write(&Value::from("a")).unwrap();
    assert_eq!(a.as_ref(), [1, 0]);
    assert_eq!(pack.read(&a).unwrap(), Value::from("a"));

    let err = pack.write(&Value::from("b")).unwrap_err();
    match err.downcast_ref::<PackError>() {
        Some(PackError::UnsupportedType { .. }) => {}
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn nine_booleans() {
    let mut pack = DataPack::new(t::array(t::bool()));
    let bits = vec![true, false, true, true, false, false, false, false, true];

    let enc = pack.write_rep(&bits).unwrap();
    // varint segment with the length, then two bytes of bits
    assert_eq!(enc.as_ref(), [1, 9, 2, 0b1011_0000, 0b1000_0000]);
    assert_eq!(pack.read_rep::<Vec<bool>>(&enc).unwrap(), bits);
}

#[test]
fn default_map() {
    let mut pack = DataPack::new(t::map_default());
    let value = record(vec![
        ("a", Value::from(1)),
        ("b", Value::from("x")),
        ("c", Value::from(true)),
    ]);
    assert!(pack.equal(&value));

    let enc = pack.write(&value).unwrap();
    let dec = pack.read(&enc).unwrap();
    assert_eq!(dec, value);

    let keys: Vec<&str> = dec.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["a", "b", "c"]);
}

#[test]
fn union_picks_lowest_matching_variant() {
    let narrow = t::uint(8).unwrap();
    let wide = t::uint(16).unwrap();
    let mut pack = DataPack::new(t::array(t::or(vec![narrow, wide])));

    let enc = pack.write(&Value::from(vec![1, 300])).unwrap();
    let schema: Vec<String> = pack.schema().iter().map(|ty| ty.name()).collect();
    assert_eq!(
        schema,
        ["Array<Or<Uint8|Uint16>>", "Varint", "Or<Uint8|Uint16>", "Uint8", "Uint16"]
    );

    // varint [2]; uint8 [tag 0, 1, tag 1]; uint16 [300]
    assert_eq!(enc.as_ref(), [1, 2, 3, 0, 1, 1, 2, 0x2c, 0x01]);
}

#[test]
fn repeated_strings_are_stored_once() {
    let mut pack = DataPack::new(t::array(t::str()));
    let value = Value::from(vec!["same", "same", "am"]);

    let enc = pack.write(&value).unwrap();
    // varint [3, 0, 4, 0, 4, 1, 3], then the blob holds one copy
    assert_eq!(enc.as_ref(), [7, 3, 0, 4, 0, 4, 1, 3, 4, b's', b'a', b'm', b'e']);
    assert_eq!(pack.read(&enc).unwrap(), value);
}

#[test]
fn read_past_recorded_values() {
    let mut pack = DataPack::new(t::tuple(vec![t::uint(8).unwrap(), t::uint(8).unwrap()]));

    // one element where the schema expects two
    let err = pack.read(&[1, 5]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<PackError>(),
        Some(&PackError::OutOfRange {
            name: "Uint8".to_owned()
        })
    );
}

#[test]
fn union_index_without_a_variant() {
    let mut pack = DataPack::new(t::or(vec![t::lit("a"), t::uint(8).unwrap()]));

    // one uint8 segment holding only the tag 7
    let err = pack.read(&[1, 7]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<PackError>(),
        Some(&PackError::UnsupportedType {
            name: "Or<Literal|Uint8>".to_owned()
        })
    );
}

#[test]
fn read_past_recorded_integers() {
    for (ty, name) in vec![(t::leb128(), "Leb128"), (t::varint(), "Varint")] {
        let mut pack = DataPack::new(t::tuple(vec![ty.clone(), ty]));

        let err = pack.read(&[1, 5]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PackError>(),
            Some(&PackError::OutOfRange {
                name: name.to_owned()
            })
        );
    }
}

#[test]
fn empty_segments_read_as_initial() {
    let mut pack = DataPack::new(t::tuple(vec![t::bool(), t::bool()]));

    // no bits recorded at all; reads fall back to false
    let value = pack.read(&[0]).unwrap();
    assert_eq!(value, Value::from(vec![false, false]));
}

#[test]
fn typed_structs() {
    #[derive(Clone, Debug, PartialEq)]
    struct Reading {
        sensor: String,
        celsius: f32,
        tags: Vec<String>,
    }

    impl PackRep for Reading {
        fn to_value(&self) -> Value {
            struct_to_value_helper(vec![
                ("sensor", self.sensor.to_value()),
                ("celsius", self.celsius.to_value()),
                ("tags", self.tags.to_value()),
            ])
        }

        fn from_value(v: Value) -> Result<Self, failure::Error> {
            let mut fields =
                struct_from_value_helper(v, &["sensor", "celsius", "tags"])?.into_iter();
            Ok(Reading {
                sensor: pop_value(&mut fields)?,
                celsius: pop_value(&mut fields)?,
                tags: pop_value(&mut fields)?,
            })
        }
    }

    let schema = t::array(t::obj(vec![
        ("sensor", t::str()),
        ("celsius", t::float(32).unwrap()),
        ("tags", t::array(t::str())),
    ]));
    let mut pack = DataPack::new(schema);

    let readings = vec![
        Reading {
            sensor: "attic".to_string(),
            celsius: 21.5,
            tags: vec!["roof".to_string()],
        },
        Reading {
            sensor: "cellar".to_string(),
            celsius: -3.25,
            tags: vec![],
        },
    ];

    let enc = pack.write_rep(&readings).unwrap();
    assert_eq!(pack.read_rep::<Vec<Reading>>(&enc).unwrap(), readings);
}

#[test]
fn factories_are_shared_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| t::array(t::tuple(vec![t::str(), t::leb128()]))))
        .collect();
    let types: Vec<Type> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for ty in &types[1..] {
        assert!(ty.ptr_eq(&types[0]));
    }
    assert!(!types[0].ptr_eq(&t::array(t::tuple(vec![t::leb128(), t::str()]))));
}
