//! Quadrilateral helpers for diagonal swapping.

use crate::types::Triangle;
use glam::Vec2;
use quill_core::math::fuzzy_is_null;

/// The quadrilateral formed by two triangles sharing an edge.
///
/// Returns `[i1, i2, i3, i4]` in the winding of `t1`, where `i1` is the vertex of
/// `t1` not in `t2`, `i3` the vertex of `t2` not in `t1`, and `i2-i4` the shared edge.
pub(crate) fn find_quad(t1: &Triangle, t2: &Triangle) -> Option<[u32; 4]> {
    let k = (0..3).find(|&k| !t2.contains_vertex(t1.vertices[k]))?;
    let i1 = t1.vertices[k];
    let i2 = t1.vertices[(k + 1) % 3];
    let i4 = t1.vertices[(k + 2) % 3];
    let i3 = t2
        .vertices
        .into_iter()
        .find(|&v| !t1.contains_vertex(v))?;
    Some([i1, i2, i3, i4])
}

/// Returns `true` if the quadrilateral is strictly convex.
///
/// A corner whose edges are (nearly) parallel makes it non-convex.
pub(crate) fn is_convex_quad(points: &[Vec2], quad: [u32; 4]) -> bool {
    let mut positive = false;
    let mut negative = false;
    for i in 0..4 {
        let p1 = points[quad[i] as usize];
        let p2 = points[quad[(i + 1) % 4] as usize];
        let p3 = points[quad[(i + 2) % 4] as usize];
        let v1 = p2 - p1;
        let v2 = p3 - p2;

        let lengths = v1.length() * v2.length();
        if lengths == 0.0 {
            return false;
        }
        let sine = v1.perp_dot(v2) / lengths;
        if !sine.is_finite() || fuzzy_is_null(sine) {
            return false;
        }
        if sine > 0.0 {
            positive = true;
        } else {
            negative = true;
        }
    }
    !(positive && negative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_quad() {
        let t1 = Triangle::new(0, 1, 2);
        let t2 = Triangle::new(2, 1, 3);
        assert_eq!(find_quad(&t1, &t2), Some([0, 1, 3, 2]));
        assert_eq!(find_quad(&t2, &t1), Some([3, 2, 0, 1]));
        assert_eq!(find_quad(&t1, &t1), None);
    }

    #[test]
    fn test_convex_quads() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(0.3, 0.3),
            Vec2::new(2.0, 0.0),
        ];
        assert!(is_convex_quad(&points, [0, 1, 2, 3]));
        assert!(is_convex_quad(&points, [0, 3, 2, 1]));
        // Dart: (0.3, 0.3) is a reflex corner.
        assert!(!is_convex_quad(&points, [0, 1, 4, 3]));
        // Collinear corner at (1, 0).
        assert!(!is_convex_quad(&points, [0, 1, 5, 2]));
    }
}
