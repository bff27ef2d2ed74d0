use criterion::{criterion_group, criterion_main, Criterion};
use resequence::Sequence;
use core::hint::black_box;

// other benchmarks will be too easy for modern CPUs, here
// we will try and coerce pipeline stalls / bubbles.

#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
struct StallMaker {
    state: u32
}

impl Default for StallMaker {
    fn default() -> Self {
        // xorshift never leaves a zero state
        Self { state: 0x9E37_79B9 }
    }
}

impl Iterator for StallMaker {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let mut x = self.state;
        x ^= x.wrapping_shl(13);
        x ^= x.wrapping_shr(17);
        x ^= x.wrapping_shl(5);
        self.state = x;
        // 0 or 1, so branches on it are unpredictable
        Some(black_box(x & 1))
    }
}

fn benchmark(c: &mut Criterion) {
    let unpredictable = Sequence::from_iterable(StallMaker::default().take(4_096));

    c.bench_function("std-filter-unpredictable", |b| {
        b.iter(|| {
            let kept = StallMaker::default().take(4_096).filter(|bit| *bit == 1).count();
            black_box(kept)
        })
    });

    c.bench_function("sequence-filter-unpredictable", |b| {
        let filtered = unpredictable.filter(|bit| *bit == 1);
        b.iter(|| black_box(filtered.count()))
    });

    c.bench_function("sequence-batch-by-unpredictable", |b| {
        let runs = unpredictable.batch_by(|a, b| a != b);
        b.iter(|| black_box(runs.count()))
    });

    c.bench_function("sequence-until-unpredictable", |b| {
        let prefix = unpredictable.map_back(0, |prev, cur| prev + cur).until(2);
        b.iter(|| black_box(prefix.count()))
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
