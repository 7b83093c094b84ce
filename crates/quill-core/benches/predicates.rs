//! Benchmarks for the geometric predicates used by the triangulator

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use quill_core::math::Vec2;
use quill_core::predicates::{is_point_in_circumcircle, is_point_in_triangle, segments_intersect};

fn sample_points(count: usize) -> Vec<Vec2> {
    // Cheap deterministic scatter, no need for a real RNG here.
    (0..count)
        .map(|i| {
            let f = i as f32;
            Vec2::new((f * 12.9898).sin() * 100.0, (f * 78.233).cos() * 100.0)
        })
        .collect()
}

fn bench_predicates(c: &mut Criterion) {
    let points = sample_points(1024);
    let v1 = Vec2::new(-50.0, -40.0);
    let v2 = Vec2::new(60.0, -30.0);
    let v3 = Vec2::new(0.0, 70.0);

    let mut group = c.benchmark_group("predicates");
    group.throughput(Throughput::Elements(points.len() as u64));

    group.bench_function("in_circumcircle", |b| {
        b.iter(|| {
            points
                .iter()
                .filter(|p| is_point_in_circumcircle(black_box(**p), v1, v2, v3))
                .count()
        });
    });

    group.bench_function("in_triangle", |b| {
        b.iter(|| {
            points
                .iter()
                .filter(|p| is_point_in_triangle(black_box(**p), v1, v2, v3))
                .count()
        });
    });

    group.bench_function("segments_intersect", |b| {
        b.iter(|| {
            points
                .windows(2)
                .filter(|w| segments_intersect(black_box(w[0]), w[1], v1, v3))
                .count()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_predicates);
criterion_main!(benches);
