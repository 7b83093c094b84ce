//! Orientation, in-circle and intersection predicates.
//!
//! All predicates are plain floating point with tolerant comparisons at the
//! places where degeneracies matter. None of them are exact; callers are
//! expected to treat borderline answers as "either is acceptable".

use crate::math::{DVec2, Vec2, fuzzy_compare_f64, fuzzy_is_null, fuzzy_is_null_f64};

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive when the vertices are counter-clockwise in a y-up frame.
#[inline]
pub fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

/// Side test against the directed line `sp -> ep`.
///
/// Positive for points that lie on the left in a y-down (screen) frame,
/// which is the orientation the path code reasons in.
#[inline]
pub fn side_of_line(p: Vec2, sp: Vec2, ep: Vec2) -> f32 {
    (p - sp).perp_dot(ep - sp)
}

/// Returns `true` if `p` is on the left of, or on, the directed line `sp -> ep`.
#[inline]
pub fn is_point_on_left(p: Vec2, sp: Vec2, ep: Vec2) -> bool {
    side_of_line(p, sp, ep) >= 0.0
}

/// Returns `true` if `p` is (fuzzily) on the infinite line through `sp` and `ep`.
#[inline]
pub fn is_point_on_line(p: Vec2, sp: Vec2, ep: Vec2) -> bool {
    fuzzy_is_null(side_of_line(p, sp, ep))
}

/// Returns `true` if the distance from `p` to the line through `sp` and `ep` is
/// less than `epsilon` times the length of `sp -> ep`.
///
/// `sp` and `ep` must differ.
pub fn is_point_near_line(p: Vec2, sp: Vec2, ep: Vec2, epsilon: f32) -> bool {
    let bv = ep - sp;
    let bl2 = bv.dot(bv);
    let t = (p - sp).dot(bv) / bl2;
    let pv = p - (sp + t * bv);
    pv.dot(pv) / bl2 < epsilon * epsilon
}

/// Closest point to `p` on the segment `sp -> ep`.
pub fn closest_point_on_line(p: Vec2, sp: Vec2, ep: Vec2) -> Vec2 {
    let line = ep - sp;
    let t = (p - sp).dot(line) / line.dot(line);
    sp + t.clamp(0.0, 1.0) * line
}

/// Intersection of the infinite lines `(a1, a2)` and `(b1, b2)`, if they are not parallel.
pub fn line_intersection(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> Option<DVec2> {
    let da = a2 - a1;
    let db = b2 - b1;
    let denominator = da.perp_dot(db);
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    let t = (b1 - a1).perp_dot(db) / denominator;
    Some(a1 + da * t)
}

/// Returns `true` if `point` lies strictly inside the circumcircle of `(v1, v2, v3)`.
///
/// The triangle may be given in either winding.
pub fn is_point_in_circumcircle(point: Vec2, v1: Vec2, v2: Vec2, v3: Vec2) -> bool {
    let (v2, v3) = if orient(v1, v2, v3) <= 0.0 {
        (v3, v2)
    } else {
        (v2, v3)
    };

    let x13 = v1.x - v3.x;
    let y13 = v1.y - v3.y;
    let x23 = v2.x - v3.x;
    let y23 = v2.y - v3.y;
    let x1p = v1.x - point.x;
    let y1p = v1.y - point.y;
    let x2p = v2.x - point.x;
    let y2p = v2.y - point.y;

    (x13 * x23 + y13 * y23) * (x2p * y1p - x1p * y2p)
        < (x23 * y13 - x13 * y23) * (x2p * x1p + y1p * y2p)
}

/// Returns `true` if `v` lies inside or on the boundary of the triangle `(v1, v2, v3)`.
///
/// Barycentric coordinates are computed in `f64` and snapped to 0 and 1 when
/// they are within tolerance, so points on an edge are reported as inside.
pub fn is_point_in_triangle(v: Vec2, v1: Vec2, v2: Vec2, v3: Vec2) -> bool {
    if (v1.x > v.x && v2.x > v.x && v3.x > v.x)
        || (v1.x < v.x && v2.x < v.x && v3.x < v.x)
        || (v1.y > v.y && v2.y > v.y && v3.y > v.y)
        || (v1.y < v.y && v2.y < v.y && v3.y < v.y)
    {
        return false;
    }

    let (v, v1, v2, v3) = (v.as_dvec2(), v1.as_dvec2(), v2.as_dvec2(), v3.as_dvec2());
    let denom = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
    if denom == 0.0 {
        return false;
    }
    let a = ((v2.y - v3.y) * (v.x - v3.x) + (v3.x - v2.x) * (v.y - v3.y)) / denom;
    let b = ((v3.y - v1.y) * (v.x - v3.x) + (v1.x - v3.x) * (v.y - v3.y)) / denom;
    let c = 1.0 - a - b;

    let snap = |x: f64| {
        if fuzzy_is_null_f64(x) {
            0.0
        } else if fuzzy_compare_f64(x, 1.0) {
            1.0
        } else {
            x
        }
    };
    let (a, b, c) = (snap(a), snap(b), snap(c));

    (0.0..=1.0).contains(&a) && (0.0..=1.0).contains(&b) && (0.0..=1.0).contains(&c)
}

/// Returns `true` if the segments `(v1, v2)` and `(u1, u2)` cross.
///
/// Touching at a shared endpoint, or an intersection that lands exactly on
/// any of the four endpoints, does not count.
pub fn segments_intersect(v1: Vec2, v2: Vec2, u1: Vec2, u2: Vec2) -> bool {
    if (v1.x < u1.x && v1.x < u2.x && v2.x < u1.x && v2.x < u2.x)
        || (v1.x > u1.x && v1.x > u2.x && v2.x > u1.x && v2.x > u2.x)
        || (v1.y < u1.y && v1.y < u2.y && v2.y < u1.y && v2.y < u2.y)
        || (v1.y > u1.y && v1.y > u2.y && v2.y > u1.y && v2.y > u2.y)
    {
        return false;
    }

    let (v1, v2, u1, u2) = (v1.as_dvec2(), v2.as_dvec2(), u1.as_dvec2(), u2.as_dvec2());
    let a = v2 - v1;
    let b = u1 - u2;
    let c = v1 - u1;

    let denominator = a.y * b.x - a.x * b.y;
    if denominator == 0.0 || !denominator.is_finite() {
        return false;
    }

    let reciprocal = 1.0 / denominator;
    let na = (b.y * c.x - b.x * c.y) * reciprocal;
    if !(0.0..=1.0).contains(&na) {
        return false;
    }
    let nb = (a.x * c.y - a.y * c.x) * reciprocal;
    if !(0.0..=1.0).contains(&nb) {
        return false;
    }

    let hit = v1 + a * na;
    hit != v1 && hit != v2 && hit != u1 && hit != u2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orient_sign() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(0.0, 1.0);
        assert!(orient(a, b, c) > 0.0);
        assert!(orient(a, c, b) < 0.0);
        assert_eq!(orient(a, b, Vec2::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn test_point_on_left() {
        let sp = Vec2::new(0.0, 0.0);
        let ep = Vec2::new(10.0, 0.0);
        // y grows downwards, so "left" of a rightwards line is negative y.
        assert!(is_point_on_left(Vec2::new(5.0, -1.0), sp, ep));
        assert!(!is_point_on_left(Vec2::new(5.0, 1.0), sp, ep));
        assert!(is_point_on_line(Vec2::new(20.0, 0.0), sp, ep));
    }

    #[test]
    fn test_point_near_line() {
        let sp = Vec2::new(0.0, 0.0);
        let ep = Vec2::new(100.0, 0.0);
        assert!(is_point_near_line(Vec2::new(50.0, 0.5), sp, ep, 0.01));
        assert!(!is_point_near_line(Vec2::new(50.0, 2.0), sp, ep, 0.01));
    }

    #[test]
    fn test_closest_point_clamps() {
        let sp = Vec2::new(0.0, 0.0);
        let ep = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_line(Vec2::new(5.0, 3.0), sp, ep), Vec2::new(5.0, 0.0));
        assert_eq!(closest_point_on_line(Vec2::new(-5.0, 3.0), sp, ep), sp);
        assert_eq!(closest_point_on_line(Vec2::new(15.0, 3.0), sp, ep), ep);
    }

    #[test]
    fn test_line_intersection() {
        let p = line_intersection(
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(2.0, 0.0),
        )
        .unwrap();
        assert!((p - DVec2::new(1.0, 1.0)).length() < 1e-12);

        let parallel = line_intersection(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
        );
        assert!(parallel.is_none());
    }

    #[test]
    fn test_circumcircle_either_winding() {
        let v1 = Vec2::new(0.0, 0.0);
        let v2 = Vec2::new(2.0, 0.0);
        let v3 = Vec2::new(0.0, 2.0);
        let inside = Vec2::new(1.5, 1.5);
        let outside = Vec2::new(3.0, 3.0);

        assert!(is_point_in_circumcircle(inside, v1, v2, v3));
        assert!(is_point_in_circumcircle(inside, v1, v3, v2));
        assert!(!is_point_in_circumcircle(outside, v1, v2, v3));
        assert!(!is_point_in_circumcircle(outside, v3, v2, v1));
    }

    #[test]
    fn test_point_in_triangle_boundary() {
        let v1 = Vec2::new(0.0, 0.0);
        let v2 = Vec2::new(4.0, 0.0);
        let v3 = Vec2::new(0.0, 4.0);
        assert!(is_point_in_triangle(Vec2::new(1.0, 1.0), v1, v2, v3));
        assert!(is_point_in_triangle(Vec2::new(2.0, 0.0), v1, v2, v3));
        assert!(is_point_in_triangle(v3, v1, v2, v3));
        assert!(!is_point_in_triangle(Vec2::new(3.0, 3.0), v1, v2, v3));
        assert!(!is_point_in_triangle(Vec2::new(-1.0, 1.0), v1, v2, v3));
    }

    #[test]
    fn test_segments_intersect_excludes_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(2.0, 2.0);
        assert!(segments_intersect(a, b, Vec2::new(0.0, 2.0), Vec2::new(2.0, 0.0)));
        // Shared endpoint.
        assert!(!segments_intersect(a, b, b, Vec2::new(4.0, 0.0)));
        // T-junction onto an endpoint.
        assert!(!segments_intersect(a, b, Vec2::new(1.0, 1.0), Vec2::new(3.0, 0.0)));
        // Disjoint.
        assert!(!segments_intersect(a, b, Vec2::new(3.0, 0.0), Vec2::new(4.0, 0.0)));
        // Parallel.
        assert!(!segments_intersect(a, b, Vec2::new(1.0, 0.0), Vec2::new(3.0, 2.0)));
    }
}
