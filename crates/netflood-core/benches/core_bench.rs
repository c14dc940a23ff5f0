use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use netflood_core::constants::HEADER_SIZE;
use netflood_core::packet::buf::PacketBuf;
use netflood_core::packet::header::FloodHeader;
use netflood_core::packet::queuebuf::QueueBufPool;
use netflood_core::seqno::{EncodedSeqno, is_fresh};
use netflood_core::types::LinkAddress;

fn bench_freshness(c: &mut Criterion) {
    let mut group = c.benchmark_group("seqno");

    group.bench_function("encode_all", |b| {
        b.iter(|| {
            for v in 0..=255u8 {
                black_box(EncodedSeqno::encode(black_box(v)));
            }
        });
    });

    let last = EncodedSeqno::from_byte(255);
    let candidate = EncodedSeqno::from_byte(0);
    group.bench_function("is_fresh_wrap", |b| {
        b.iter(|| is_fresh(black_box(candidate), black_box(Some(last))));
    });

    group.finish();
}

fn bench_header(c: &mut Criterion) {
    let mut group = c.benchmark_group("header");

    let hdr = FloodHeader::origin(LinkAddress::new([1, 0]), EncodedSeqno::encode(42));
    let mut raw = hdr.to_bytes().to_vec();
    raw.extend_from_slice(&[0xAB; 60]);

    group.bench_function("parse", |b| {
        b.iter(|| FloodHeader::parse(black_box(&raw)));
    });

    group.bench_function("write_next_hop", |b| {
        let mut out = raw.clone();
        b.iter(|| hdr.next_hop().write_to(black_box(&mut out[..HEADER_SIZE])));
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("queuebuf");

    let pool = QueueBufPool::default();
    let mut buf = PacketBuf::new();
    buf.copy_from(&[0x5A; 100]).unwrap();

    group.bench_function("snapshot_restore", |b| {
        b.iter(|| {
            let snap = pool.snapshot(&buf).unwrap();
            let mut target = PacketBuf::new();
            snap.restore(&mut target).unwrap();
            black_box(target.len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_freshness, bench_header, bench_snapshot);
criterion_main!(benches);
