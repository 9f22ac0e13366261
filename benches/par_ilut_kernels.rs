//! Benchmarks for the ParILUT kernels on every backend
//!
//! Usage:
//!   cargo bench --bench par_ilut_kernels
//!   cargo bench --bench par_ilut_kernels -- spgeam

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parilut::{create_kernels, refine_factor, Backend, ParIlutConfig, SparseMatrixCSR};
use std::hint::black_box;
use std::time::Duration;

/// Deterministic banded matrix with pseudo-random magnitudes
fn generate_matrix(n: usize, half_width: usize, seed: u64) -> SparseMatrixCSR<f64> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    let mut row_ptr = Vec::with_capacity(n + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);

    for i in 0..n {
        let lo = i.saturating_sub(half_width);
        let hi = (i + half_width + 1).min(n);
        for j in lo..hi {
            // skip roughly a third of the band to vary row lengths
            if j != i && next() < 0.33 {
                continue;
            }
            col_idx.push(j);
            values.push(next() * 2.0 - 1.0);
        }
        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR::new(n, n, row_ptr, col_idx, values)
}

fn bench_threshold_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold_select");
    group.measurement_time(Duration::from_secs(3));
    group.sample_size(20);

    for &n in &[10_000usize, 100_000] {
        let matrix = generate_matrix(n, 8, 7);
        let rank = matrix.nnz() / 2;
        group.throughput(Throughput::Elements(matrix.nnz() as u64));

        for backend in Backend::ALL {
            let kernels = create_kernels::<f64>(&ParIlutConfig::for_backend(backend)).unwrap();
            group.bench_with_input(BenchmarkId::new(backend.name(), n), &matrix, |b, m| {
                b.iter(|| kernels.threshold_select(black_box(&m.values), rank).unwrap())
            });
        }
    }

    group.finish();
}

fn bench_threshold_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold_filter");
    group.measurement_time(Duration::from_secs(3));
    group.sample_size(20);

    for &n in &[10_000usize, 100_000] {
        let matrix = generate_matrix(n, 8, 11);
        group.throughput(Throughput::Elements(matrix.nnz() as u64));

        for backend in Backend::ALL {
            let kernels = create_kernels::<f64>(&ParIlutConfig::for_backend(backend)).unwrap();
            group.bench_with_input(BenchmarkId::new(backend.name(), n), &matrix, |b, m| {
                b.iter(|| kernels.threshold_filter(black_box(m), 0.5).unwrap())
            });
        }
    }

    group.finish();
}

fn bench_spgeam(c: &mut Criterion) {
    let mut group = c.benchmark_group("spgeam");
    group.measurement_time(Duration::from_secs(3));
    group.sample_size(20);

    for &n in &[10_000usize, 100_000] {
        let a = generate_matrix(n, 6, 3);
        let b = generate_matrix(n, 10, 5);
        group.throughput(Throughput::Elements((a.nnz() + b.nnz()) as u64));

        for backend in Backend::ALL {
            let kernels = create_kernels::<f64>(&ParIlutConfig::for_backend(backend)).unwrap();
            group.bench_function(BenchmarkId::new(backend.name(), n), |bench| {
                bench.iter(|| kernels.spgeam(1.0, black_box(&a), -0.5, black_box(&b)).unwrap())
            });
        }
    }

    group.finish();
}

fn bench_refinement_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("refinement_step");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    let factor = generate_matrix(50_000, 4, 13);
    let candidates = generate_matrix(50_000, 8, 17);
    let target_nnz = factor.nnz();

    for backend in Backend::ALL {
        let kernels = create_kernels::<f64>(&ParIlutConfig::for_backend(backend)).unwrap();
        group.bench_function(backend.name(), |bench| {
            bench.iter(|| {
                refine_factor(kernels.as_ref(), black_box(&factor), black_box(&candidates), target_nnz)
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_threshold_select,
    bench_threshold_filter,
    bench_spgeam,
    bench_refinement_step
);
criterion_main!(benches);
