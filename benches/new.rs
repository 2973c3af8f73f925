use std::time::Duration;

use bitmap_index::BitmapIndex;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng, StdRng};

const SIZES: [u64; 2] = [1 << 16, 1 << 19];
const PERC: [f64; 3] = [0.01, 0.5, 0.99];

pub fn bench_build(c: &mut Criterion) {
    for n in SIZES {
        for p in PERC {
            let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
            let mut words = vec![0u64; bitmap_index::storage_size(n)];
            for i in 0..n {
                if rng.gen_bool(p) {
                    bitmap_index::set_bit(&mut words, i);
                }
            }

            let mut g = c.benchmark_group("build");
            g.throughput(Throughput::Elements(n));
            g.bench_with_input(
                BenchmarkId::from_parameter(format!("N={}, %={}", n, p * 100.0)),
                &words,
                |b, words| {
                    b.iter_with_large_drop(|| BitmapIndex::new(words, n, true, true))
                },
            );
        }
    }
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs_f64(5.0))
        .sample_size(25);
    targets = bench_build);
criterion_main!(benches);
