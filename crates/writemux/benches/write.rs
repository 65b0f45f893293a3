use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io;
use writemux::{Multiplexer, WriterDestination};

fn bench_write(c: &mut Criterion) {
    let hello = b"Hello World";
    let mut group = c.benchmark_group("write");

    for count in [1usize, 10, 100] {
        let mux = Multiplexer::ignoring();
        for _ in 0..count {
            mux.add(WriterDestination::new(io::sink()));
        }

        group.bench_with_input(BenchmarkId::from_parameter(count), &mux, |b, mux| {
            b.iter(|| mux.write(black_box(hello)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_write);
criterion_main!(benches);
