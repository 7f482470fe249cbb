use criterion::{criterion_group, criterion_main, Criterion};

use exprflow::driver::Driver;

fn run_program(source: &str, threshold: usize) {
    let mut driver = Driver::new(threshold);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    driver.run(source.as_bytes(), &mut stdout, &mut stderr);
}

fn bench_map_sequential_vs_parallel(c: &mut Criterion) {
    let program = "out map({1, 100000}, x -> x * x)";

    let mut group = c.benchmark_group("map");
    group.bench_function("sequential (threshold above input size)", |b| {
        b.iter(|| run_program(program, 1_000_000))
    });
    group.bench_function("parallel (default threshold)", |b| {
        b.iter(|| run_program(program, 32))
    });
    group.finish();
}

fn bench_reduce_sequential_vs_parallel(c: &mut Criterion) {
    let program = "out reduce({1, 100000}, 0, a b -> a + b)";

    let mut group = c.benchmark_group("reduce");
    group.bench_function("sequential (threshold above input size)", |b| {
        b.iter(|| run_program(program, 1_000_000))
    });
    group.bench_function("parallel (default threshold)", |b| {
        b.iter(|| run_program(program, 32))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_map_sequential_vs_parallel,
    bench_reduce_sequential_vs_parallel
);
criterion_main!(benches);
