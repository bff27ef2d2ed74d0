use criterion::{criterion_group, criterion_main, Criterion};
use resequence::Sequence;
use core::hint::black_box;

fn benchmark(c: &mut Criterion) {
    let items: Vec<u32> = (0..4_096).collect();
    let sequence = Sequence::from_iterable(&items).map(|n| *n);

    c.bench_function("std-windows-3", |b| {
        b.iter(|| black_box(items.windows(3).map(|w| w.iter().sum::<u32>()).max()))
    });

    c.bench_function("sequence-window-3", |b| {
        let windows = sequence.window(3).map(|w| w.into_iter().sum::<u32>());
        b.iter(|| black_box(windows.max()))
    });

    c.bench_function("std-chunks-64", |b| {
        b.iter(|| black_box(items.chunks(64).map(<[u32]>::len).sum::<usize>()))
    });

    c.bench_function("sequence-batch-64", |b| {
        let batches = sequence.batch(64).map(|batch| batch.len());
        b.iter(|| black_box(batches.fold(0, |acc, len| acc + len)))
    });

    c.bench_function("sequence-split", |b| {
        let groups = sequence.split_by(|n| n % 17 == 0);
        b.iter(|| black_box(groups.count()))
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
