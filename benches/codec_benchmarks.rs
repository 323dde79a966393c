//! Binary wire codec benchmarks: primitive round trips and the embedded-
//! serializer registry's encode/decode path.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;

// Layer 2: Third-party crate imports
use bytes::{Bytes, BytesMut};
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use universe_rt::codec::registry::{read_embedded, write_embedded};
use universe_rt::codec::{CodecError, SerializerRegistry, WireDecode, WireEncode};

struct BenchPayload {
    a: i64,
    b: String,
}

impl WireEncode for BenchPayload {
    fn encode(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        universe_rt::codec::primitives::write_i64(out, self.a);
        universe_rt::codec::primitives::write_string(out, &self.b)
    }
}

impl WireDecode for BenchPayload {
    fn decode(buf: &mut Bytes) -> Result<Self, CodecError> {
        Ok(Self {
            a: universe_rt::codec::primitives::read_i64(buf)?,
            b: universe_rt::codec::primitives::read_string(buf)?,
        })
    }
}

fn bench_primitive_round_trip(c: &mut Criterion) {
    c.bench_function("codec_primitive_round_trip", |b| {
        b.iter(|| {
            let mut out = BytesMut::with_capacity(32);
            universe_rt::codec::primitives::write_i64(&mut out, black_box(42));
            universe_rt::codec::primitives::write_string(&mut out, "race/channel/1").unwrap();
            let mut frozen = out.freeze();
            let n = universe_rt::codec::primitives::read_i64(&mut frozen).unwrap();
            let s = universe_rt::codec::primitives::read_string(&mut frozen).unwrap();
            black_box((n, s));
        });
    });
}

fn bench_embedded_round_trip(c: &mut Criterion) {
    let registry = SerializerRegistry::new();
    let id = registry.register("bench_payload").unwrap();

    c.bench_function("codec_embedded_round_trip", |b| {
        b.iter(|| {
            let payload = BenchPayload {
                a: 7,
                b: "hello".to_string(),
            };
            let mut out = BytesMut::with_capacity(64);
            write_embedded(&mut out, id, &payload).unwrap();
            let mut frozen = out.freeze();
            let decoded: BenchPayload = read_embedded(&mut frozen, id).unwrap();
            black_box(decoded.a);
        });
    });
}

criterion_group!(benches, bench_primitive_round_trip, bench_embedded_round_trip);
criterion_main!(benches);
