#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use datapack::prelude::*;

fn rows(n: usize) -> Value {
    let rows: Vec<Value> = (0..n)
        .map(|i| {
            let mut row = Record::new();
            row.insert("id", i as u32);
            row.insert("name", format!("user-{}", i % 100));
            row.insert("score", (i as f64) * 0.5);
            row.insert("active", i % 3 == 0);
            Value::from(row)
        })
        .collect();
    Value::from(rows)
}

fn schema() -> Type {
    t::array(t::obj(vec![
        ("id", t::uint(32).unwrap()),
        ("name", t::str()),
        ("score", t::float(64).unwrap()),
        ("active", t::bool()),
    ]))
}

fn pack_rows_write(c: &mut Criterion) {
    c.bench_function("datapack 1k rows write", |b| {
        let value = rows(1_000);
        let mut pack = DataPack::new(schema());
        b.iter(|| pack.write(black_box(&value)).unwrap())
    });
}

fn pack_rows_read(c: &mut Criterion) {
    c.bench_function("datapack 1k rows read", |b| {
        let value = rows(1_000);
        let mut pack = DataPack::new(schema());
        let bytes = pack.write(&value).unwrap();
        b.iter(|| pack.read(black_box(&bytes)).unwrap())
    });
}

fn json_rows_write(c: &mut Criterion) {
    c.bench_function("JSON 1k rows write", |b| {
        let json = rows(1_000).to_json().unwrap();
        b.iter(|| serde_json::to_vec(black_box(&json)).unwrap())
    });
}

fn json_rows_read(c: &mut Criterion) {
    c.bench_function("JSON 1k rows read", |b| {
        let text = serde_json::to_vec(&rows(1_000).to_json().unwrap()).unwrap();
        b.iter(|| serde_json::from_slice::<serde_json::Value>(black_box(&text)).unwrap())
    });
}

fn varint_column(c: &mut Criterion) {
    c.bench_function("varint 10k write", |b| {
        let value = Value::from((0..10_000u32).collect::<Vec<_>>());
        let mut pack = DataPack::new(t::array(t::varint()));
        b.iter(|| pack.write(black_box(&value)).unwrap())
    });
}

fn default_map_write(c: &mut Criterion) {
    c.bench_function("default map write", |b| {
        let mut record = Record::new();
        for i in 0..100 {
            record.insert(format!("k{}", i), i);
        }
        let value = Value::from(record);
        let mut pack = DataPack::new(t::map_default());
        b.iter(|| pack.write(black_box(&value)).unwrap())
    });
}

criterion_group!(
    benches,
    pack_rows_write,
    pack_rows_read,
    json_rows_write,
    json_rows_read,
    varint_column,
    default_map_write,
);

criterion_main!(benches);
