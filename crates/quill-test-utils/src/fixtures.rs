use glam::Vec2;
use quill_cdt::{Vertex, super_triangle};
use quill_path::{CubicBezier, Path, PathBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Axis aligned square with its top-left corner at the origin.
pub fn square_path(size: f32) -> Path {
    let mut builder = PathBuilder::new();
    builder.rect(Vec2::ZERO, Vec2::splat(size));
    builder.build()
}

pub fn circle_path(center: Vec2, radius: f32) -> Path {
    let mut builder = PathBuilder::new();
    builder.circle(center, radius);
    builder.build()
}

/// An S-shaped cubic with an inflection point, closed back to its start.
pub fn s_curve_path() -> Path {
    let mut builder = PathBuilder::new();
    builder
        .move_to(Vec2::new(0.0, 0.0))
        .cubic_to(
            Vec2::new(100.0, -80.0),
            Vec2::new(0.0, 180.0),
            Vec2::new(100.0, 100.0),
        )
        .close();
    builder.build()
}

/// Square with a square hole, both wound the same way.
pub fn nested_squares_path() -> Path {
    let mut builder = PathBuilder::new();
    builder
        .rect(Vec2::ZERO, Vec2::splat(100.0))
        .rect(Vec2::splat(25.0), Vec2::splat(50.0));
    builder.build()
}

/// `count` points uniformly distributed in `[0, 100)^2`, reproducible from `seed`.
pub fn random_points(count: usize, seed: u64) -> Vec<Vec2> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Vec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
        .collect()
}

/// Vertices for `points` followed by an enclosing super-triangle.
///
/// # Panics
///
/// Panics if `points` is empty.
pub fn with_super_triangle(points: &[Vec2]) -> Vec<Vertex> {
    let corners = super_triangle(points.iter().copied()).expect("points must not be empty");
    points
        .iter()
        .chain(corners.iter())
        .enumerate()
        .map(|(i, &p)| Vertex::new(p, i as u32))
        .collect()
}

/// Largest distance between sample points of `cubic` and their nearest point on
/// the `quads` chain, sampled at equal parameter steps.
pub fn max_deviation(cubic: &CubicBezier, quads: &[quill_path::QuadraticBezier]) -> f32 {
    const SAMPLES: usize = 64;
    let chain: Vec<Vec2> = quads
        .iter()
        .flat_map(|q| (0..=SAMPLES).map(move |i| q.eval(i as f32 / SAMPLES as f32)))
        .collect();

    (0..=SAMPLES)
        .map(|i| cubic.eval(i as f32 / SAMPLES as f32))
        .map(|p| {
            chain
                .iter()
                .map(|c| c.distance(p))
                .fold(f32::INFINITY, f32::min)
        })
        .fold(0.0, f32::max)
}
