//! Mailbox benchmarks: bounded-mailbox send/receive latency and
//! backpressure-strategy overhead under contention.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

// Layer 3: Internal module imports
use universe_rt::mailbox::bounded::BoundedMailbox;
use universe_rt::mailbox::traits::{MailboxReceiver, MailboxSender};
use universe_rt::message::{Message, MessageEnvelope};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BenchMessage {
    value: u64,
}

impl Message for BenchMessage {
    const MESSAGE_TYPE: &'static str = "bench_message";
}

fn bench_send_recv_round_trip(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");
    c.bench_function("mailbox_send_recv_round_trip", |b| {
        b.to_async(&rt).iter_batched_ref(
            || BoundedMailbox::<BenchMessage>::new(64),
            |(rx, tx)| async move {
                tx.send(MessageEnvelope::new(BenchMessage { value: 1 }))
                    .await
                    .unwrap();
                let _ = black_box(rx.recv().await);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_try_send_under_capacity(c: &mut Criterion) {
    let (_rx, tx) = BoundedMailbox::<BenchMessage>::new(1024);
    c.bench_function("mailbox_try_send_under_capacity", |b| {
        b.iter(|| {
            let _ = tx.try_send(black_box(MessageEnvelope::new(BenchMessage { value: 1 })));
        });
    });
}

criterion_group!(benches, bench_send_recv_round_trip, bench_try_send_under_capacity);
criterion_main!(benches);
