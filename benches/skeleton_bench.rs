//! Benchmarks for skeleton construction

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tda_skeleton::*;

// Noisy circle in the plane
fn noisy_circle(n: usize, noise: f64, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, noise).unwrap();
    let mut points = Array2::<f64>::zeros((n, 2));
    for i in 0..n {
        let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
        points[[i, 0]] = theta.cos() + normal.sample(&mut rng);
        points[[i, 1]] = theta.sin() + normal.sample(&mut rng);
    }
    points
}

fn benchmark_combination_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("combination_table");

    for (n, r) in [(200, 2), (60, 3), (30, 4)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("C({},{})", n, r)),
            &(n, r),
            |b, &(n, r)| {
                b.iter(|| black_box(combination_table(n, r, rayon::current_num_threads()).unwrap()))
            },
        );
    }

    group.finish();
}

fn benchmark_candidate_sources(c: &mut Criterion) {
    let points = noisy_circle(24, 0.05, 7);
    let mut group = c.benchmark_group("candidate_source");

    for (name, source) in [
        ("facet_subsets", CandidateSource::FacetSubsets),
        ("vertex_subsets", CandidateSource::VertexSubsets),
    ] {
        let config = SkeletonConfig::builder()
            .max_dimension(2)
            .max_ball_radius(0.8)
            .candidate_source(source)
            .build()
            .unwrap();

        group.bench_function(name, |b| {
            b.iter(|| black_box(BoundarySkeleton::from_points(&points, &config).unwrap()))
        });
    }

    group.finish();
}

fn benchmark_point_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("vertex_subsets_dim3");

    for n in [16, 32, 48] {
        let points = noisy_circle(n, 0.05, 11);
        let config = SkeletonConfig::builder()
            .max_dimension(3)
            .max_ball_radius(1.0)
            .candidate_source(CandidateSource::VertexSubsets)
            // Dense random lengths can sit closer than the default ladder
            .tie_break(TieBreak::DimensionKey)
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| black_box(BoundarySkeleton::from_points(points, &config).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_combination_table,
    benchmark_candidate_sources,
    benchmark_point_count
);
criterion_main!(benches);
