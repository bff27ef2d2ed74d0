use criterion::{criterion_group, criterion_main, Criterion};
use resequence::Sequence;
use core::hint::black_box;

const LEN: u64 = 4_096;

fn benchmark(c: &mut Criterion) {
    let items: Vec<u64> = (0..LEN).collect();
    let sequence = Sequence::from_iterable(&items);
    let pipeline = sequence.filter(|n| *n % 3 != 0).map(|n| n * 2).skip(10).limit(1_000);

    c.bench_function("std-filter-map-sum", |b| {
        b.iter(|| {
            let sum: u64 = items.iter()
                .filter(|n| **n % 3 != 0)
                .map(|n| n * 2)
                .skip(10)
                .take(1_000)
                .sum();
            black_box(sum)
        })
    });

    c.bench_function("sequence-filter-map-sum", |b| {
        b.iter(|| {
            let sum: u64 = pipeline.iter().sum();
            black_box(sum)
        })
    });

    c.bench_function("std-count", |b| {
        b.iter(|| black_box(items.iter().filter(|n| **n % 3 != 0).count()))
    });

    c.bench_function("sequence-count", |b| {
        let filtered = sequence.filter(|n| *n % 3 != 0);
        b.iter(|| black_box(filtered.count()))
    });

    let stored = Sequence::of(items.clone());
    c.bench_function("sequence-stored-at", |b| {
        b.iter(|| black_box(stored.at(black_box(LEN as usize / 2))))
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
