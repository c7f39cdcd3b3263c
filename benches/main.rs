//! Benchmarks comparing `SkipMap` against the standard library's `BTreeMap`.

use criterion::{criterion_group, criterion_main};

mod btreemap;
mod skipmap;

criterion_group!(
    benches,
    crate::skipmap::insert,
    crate::skipmap::rand_access,
    crate::skipmap::floor,
    crate::skipmap::range,
    crate::skipmap::iter,
    crate::btreemap::insert,
    crate::btreemap::rand_access,
    crate::btreemap::floor,
    crate::btreemap::range,
    crate::btreemap::iter,
);
criterion_main!(benches);
