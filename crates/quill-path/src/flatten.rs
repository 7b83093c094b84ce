//! Conversion of source paths into quadratic paths.
//!
//! Cubic segments are approximated by quadratics: the cubic is first cut at its
//! inflection points, and every piece is then bisected until a single quadratic is
//! close enough, or the split budget runs out.

use crate::{CubicBezier, Path, PathCommand, PathConfig, QuadPath, QuadraticBezier};
use arrayvec::ArrayVec;
use glam::{DVec2, Vec2};
use quill_core::math::{fuzzy_compare, fuzzy_is_null};
use quill_core::predicates::line_intersection;

/// Number of samples used when scoring a candidate quadratic. Must be odd.
const SCORE_STEPS: usize = 21;
const _: () = assert!(SCORE_STEPS % 2 == 1);

/// Bezier factors for the scoring samples, `t` running from 0.2 to 0.8.
struct ScoreFactors {
    /// `t^2`
    t2s: [f64; SCORE_STEPS],
    /// `2t(1 - t)`
    tmts: [f64; SCORE_STEPS],
}

const SCORE_FACTORS: ScoreFactors = {
    let mut t2s = [0.0; SCORE_STEPS];
    let mut tmts = [0.0; SCORE_STEPS];
    let start = 0.2;
    let step = (1.0 - 2.0 * start) / (SCORE_STEPS - 1) as f64;
    let mut i = 0;
    while i < SCORE_STEPS {
        let t = start + step * i as f64;
        t2s[i] = t * t;
        tmts[i] = 2.0 * t * (1.0 - t);
        i += 1;
    }
    ScoreFactors { t2s, tmts }
};

/// Double precision cubic used while flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cubic {
    p1: DVec2,
    p2: DVec2,
    p3: DVec2,
    p4: DVec2,
}

impl Cubic {
    fn from_bezier(b: &CubicBezier) -> Self {
        Self {
            p1: b.from.as_dvec2(),
            p2: b.control1.as_dvec2(),
            p3: b.control2.as_dvec2(),
            p4: b.to.as_dvec2(),
        }
    }

    fn mid_point(&self) -> DVec2 {
        (self.p1 + 3.0 * (self.p2 + self.p3) + self.p4) * 0.125
    }

    fn start_tangent(&self) -> (DVec2, DVec2) {
        let toward = if self.p2 != self.p1 {
            self.p2
        } else if self.p3 != self.p1 {
            self.p3
        } else {
            self.p4
        };
        (self.p1, toward)
    }

    fn end_tangent(&self) -> (DVec2, DVec2) {
        let toward = if self.p3 != self.p4 {
            self.p3
        } else if self.p2 != self.p4 {
            self.p2
        } else {
            self.p1
        };
        (self.p4, toward)
    }

    fn split(&self, t: f64) -> (Self, Self) {
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);
        let p34 = self.p3.lerp(self.p4, t);
        let p123 = p12.lerp(p23, t);
        let p234 = p23.lerp(p34, t);
        let p = p123.lerp(p234, t);
        (
            Self {
                p1: self.p1,
                p2: p12,
                p3: p123,
                p4: p,
            },
            Self {
                p1: p,
                p2: p234,
                p3: p34,
                p4: self.p4,
            },
        )
    }

    /// The part of the curve between `t0` and `t1`.
    fn on_interval(&self, t0: f64, t1: f64) -> Self {
        if t0 == 0.0 && t1 == 1.0 {
            return *self;
        }
        let right = if t0 > 0.0 { self.split(t0).1 } else { *self };
        if t1 >= 1.0 {
            return right;
        }
        let local = (t1 - t0) / (1.0 - t0);
        right.split(local).0
    }

    /// Squared diagonal of the control point bounds.
    fn control_bounds_diagonal_squared(&self) -> f64 {
        let min = self.p1.min(self.p2).min(self.p3).min(self.p4);
        let max = self.p1.max(self.p2).max(self.p3).max(self.p4);
        (max - min).length_squared()
    }

    /// Control point of a quadratic sharing this cubic's end points and tangents.
    ///
    /// Falls back to the cubic's midpoint when the tangents are parallel or meet on
    /// the wrong side of the chord.
    fn quadratic_control_point(&self) -> DVec2 {
        let (s1, s2) = self.start_tangent();
        let (e1, e2) = self.end_tangent();
        let mid = self.mid_point();

        match line_intersection(s1, s2, e1, e2) {
            Some(qcp) => {
                let chord = self.p4 - self.p1;
                let ml = mid - self.p1;
                let ql = qcp - self.p1;
                let cx1 = ml.x * chord.y - ml.y * chord.x;
                let cx2 = ql.x * chord.y - ql.y * chord.x;
                if cx1.is_sign_negative() == cx2.is_sign_negative() {
                    qcp
                } else {
                    mid
                }
            }
            None => mid,
        }
    }

    /// Squared distance between the cubic's midpoint and the closest sampled point of
    /// the quadratic `(p1, qcp, p4)`.
    fn score_quadratic(&self, qcp: DVec2) -> f64 {
        let f = &SCORE_FACTORS;
        let mid = self.mid_point();
        let dist_for_index = |i: usize| {
            let qp = f.t2s[SCORE_STEPS - 1 - i] * self.p1 + f.tmts[i] * qcp + f.t2s[i] * self.p4;
            (mid - qp).length_squared()
        };

        let half = (SCORE_STEPS - 1) / 2;
        let center = dist_for_index(half);

        let mut found = false;
        let mut min_dist = center;
        for i in 0..half {
            let d = dist_for_index(half + 1 + i);
            if d < min_dist {
                min_dist = d;
            } else {
                found = i > 0;
                break;
            }
        }
        if !found {
            min_dist = center;
            for i in 0..half {
                let d = dist_for_index(half - 1 - i);
                if d < min_dist {
                    min_dist = d;
                } else {
                    found = i > 0;
                    break;
                }
            }
        }

        if found { min_dist } else { center }
    }

    /// Parameters of the inflection points strictly inside `(0, 1)`, ascending.
    fn inflection_points(&self) -> ArrayVec<f64, 2> {
        let mut res = ArrayVec::new();

        // Move p1 to the origin and rotate the chord onto the x axis.
        let chord = self.p4 - self.p1;
        let angle = chord.y.atan2(chord.x);
        let rotation = DVec2::from_angle(-angle);
        let normalize = |p: DVec2| rotation.rotate(p - self.p1);
        let (x2, y2) = normalize(self.p2).into();
        let (x3, y3) = normalize(self.p3).into();
        let x4 = normalize(self.p4).x;

        let p = x3 * y2;
        let q = x4 * y2;
        let r = x2 * y3;
        let s = x4 * y3;

        let a = 18.0 * (-3.0 * p + 2.0 * q + 3.0 * r - s);
        if fuzzy_is_null(a as f32) {
            if y2.is_sign_negative() != y3.is_sign_negative()
                && fuzzy_compare((x4 - x3) as f32, x2 as f32)
            {
                // Symmetric S-curve.
                res.push(0.5);
                return res;
            } else if a == 0.0 {
                return res;
            }
        }

        let b = 18.0 * (3.0 * p - q - 3.0 * r);
        let c = 18.0 * (r - p);
        let rad = b * b - 4.0 * a * c;
        if rad < 0.0 {
            return res;
        }
        let sqr = rad.sqrt();
        let root1 = (-b + sqr) / (2.0 * a);
        let root2 = (-b - sqr) / (2.0 * a);

        let is_valid = |r: f64| {
            r.is_finite()
                && r > 0.0
                && !fuzzy_is_null(r as f32)
                && r < 1.0
                && !fuzzy_is_null((r - 1.0) as f32)
        };
        if is_valid(root1) {
            res.push(root1);
        }
        if root2 != root1 && is_valid(root2) {
            res.push(root2);
        }
        if res.len() == 2 && res[0] > res[1] {
            res.swap(0, 1);
        }
        res
    }

    fn add_to_quadratics(&self, out: &mut Vec<(DVec2, DVec2)>, max_splits: u32, max_diff: f64) {
        let qcp = self.quadratic_control_point();
        if max_splits == 0 || self.score_quadratic(qcp) < max_diff {
            out.push((qcp, self.p4));
        } else {
            let (lhs, rhs) = self.split(0.5);
            lhs.add_to_quadratics(out, max_splits - 1, max_diff);
            rhs.add_to_quadratics(out, max_splits - 1, max_diff);
        }
    }

    /// Quadratic `(control, end)` pairs approximating this cubic, starting at `p1`.
    fn to_quadratics(&self, error_limit: f64) -> Vec<(DVec2, DVec2)> {
        // A cubic that is really a degree-elevated quadratic.
        let c1 = self.p1 + 1.5 * (self.p2 - self.p1);
        let c2 = self.p4 + 1.5 * (self.p3 - self.p4);
        if c1 == c2 {
            return vec![(c1, self.p4)];
        }

        let max_diff = self.control_bounds_diagonal_squared() * error_limit * error_limit;
        let inflections = self.inflection_points();
        let max_splits = if inflections.is_empty() { 3 } else { 2 };

        let mut out = Vec::new();
        let mut t0 = 0.0;
        for t1 in inflections.iter().copied().chain(std::iter::once(1.0)) {
            self.on_interval(t0, t1)
                .add_to_quadratics(&mut out, max_splits, max_diff);
            t0 = t1;
        }
        out
    }
}

impl CubicBezier {
    /// Approximate this cubic with a chain of quadratics.
    ///
    /// `error_limit` is relative to the diagonal of the control point bounds. The
    /// first quadratic starts at `from`, the last one ends at `to`.
    pub fn to_quadratics(&self, error_limit: f32) -> Vec<QuadraticBezier> {
        let pairs = Cubic::from_bezier(self).to_quadratics(f64::from(error_limit));
        let mut from = self.from;
        pairs
            .into_iter()
            .map(|(control, to)| {
                let quad = QuadraticBezier::new(from, control.as_vec2(), to.as_vec2());
                from = quad.to;
                quad
            })
            .collect()
    }
}

impl QuadPath {
    /// Convert a source path using the default [`PathConfig`].
    pub fn from_source_path(path: &Path) -> QuadPath {
        Self::from_source_path_with_config(path, PathConfig::default())
    }

    /// Convert a source path. Cubics are flattened to quadratics, and `Close`
    /// becomes a line back to the sub-path start.
    pub fn from_source_path_with_config(path: &Path, config: PathConfig) -> QuadPath {
        puffin::profile_function!();

        let mut res = QuadPath::with_config(config);
        res.reserve(path.len());
        res.set_fill_rule(path.fill_rule());

        let mut subpath_start = Vec2::ZERO;
        for command in path.commands() {
            match *command {
                PathCommand::MoveTo(to) => {
                    res.move_to(to);
                    subpath_start = to;
                }
                PathCommand::LineTo(to) => {
                    res.line_to(to);
                }
                PathCommand::QuadTo { control, to } => {
                    res.quad_to(control, to);
                }
                PathCommand::CubicTo {
                    control1,
                    control2,
                    to,
                } => {
                    let cubic = CubicBezier::new(res.current_point(), control1, control2, to);
                    for quad in cubic.to_quadratics(config.flatten_error_limit) {
                        res.quad_to(quad.control, quad.to);
                    }
                }
                PathCommand::Close => {
                    res.line_to(subpath_start);
                }
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), p4: (f64, f64)) -> Cubic {
        Cubic {
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
            p4: p4.into(),
        }
    }

    #[test]
    fn test_score_factors() {
        let f = &SCORE_FACTORS;
        assert!((f.t2s[0] - 0.04).abs() < 1e-12);
        assert!((f.t2s[SCORE_STEPS - 1] - 0.64).abs() < 1e-12);
        assert!((f.tmts[10] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_elevated_quadratic_shortcut() {
        // Degree elevation of (0,0) (30,60) (60,0).
        let c = cubic((0.0, 0.0), (20.0, 40.0), (40.0, 40.0), (60.0, 0.0));
        let quads = c.to_quadratics(0.01);
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0], (DVec2::new(30.0, 60.0), DVec2::new(60.0, 0.0)));
    }

    #[test]
    fn test_quadratic_control_point_from_tangents() {
        let c = cubic((0.0, 0.0), (0.0, 50.0), (50.0, 100.0), (100.0, 100.0));
        assert_eq!(c.quadratic_control_point(), DVec2::new(0.0, 100.0));
    }

    #[test]
    fn test_quadratic_control_point_parallel_tangents() {
        // Both tangents point up: no intersection, so the midpoint is used.
        let c = cubic((0.0, 0.0), (0.0, 50.0), (100.0, 50.0), (100.0, 0.0));
        assert_eq!(c.quadratic_control_point(), c.mid_point());
    }

    #[test]
    fn test_inflection_points_symmetric_s_curve() {
        let c = cubic((0.0, 0.0), (50.0, -80.0), (50.0, 80.0), (100.0, 0.0));
        let points = c.inflection_points();
        assert_eq!(points.len(), 1);
        assert!((points[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_inflection_points_none_for_arch() {
        let c = cubic((0.0, 0.0), (0.0, 50.0), (100.0, 50.0), (100.0, 0.0));
        assert!(c.inflection_points().is_empty());
    }

    #[test]
    fn test_inflection_points_sorted() {
        let c = cubic((0.0, 0.0), (100.0, 100.0), (0.0, 100.0), (100.0, 0.0));
        let points = c.inflection_points();
        for t in &points {
            assert!(*t > 0.0 && *t < 1.0);
        }
        if points.len() == 2 {
            assert!(points[0] < points[1]);
        }
    }

    #[test]
    fn test_on_interval_matches_evaluation() {
        let c = cubic((0.0, 0.0), (10.0, 40.0), (70.0, -20.0), (100.0, 30.0));
        let piece = c.on_interval(0.25, 0.75);
        assert!((piece.p1 - c.split(0.25).1.p1).length() < 1e-9);
        assert!((piece.p4 - c.split(0.75).0.p4).length() < 1e-9);
        assert!((piece.mid_point() - c.split(0.5).0.p4).length() < 1e-9);
    }

    #[test]
    fn test_to_quadratics_is_continuous() {
        let curve = CubicBezier::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, -80.0),
            Vec2::new(50.0, 80.0),
            Vec2::new(100.0, 0.0),
        );
        let quads = curve.to_quadratics(0.01);
        assert!(quads.len() >= 2);
        assert!(quads.len() <= 8);
        assert_eq!(quads[0].from, curve.from);
        assert_eq!(quads.last().map(|q| q.to), Some(curve.to));
        for pair in quads.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn test_from_source_path_close_adds_line() {
        let path = Path::from_commands(vec![
            PathCommand::MoveTo(Vec2::new(0.0, 0.0)),
            PathCommand::LineTo(Vec2::new(10.0, 0.0)),
            PathCommand::LineTo(Vec2::new(10.0, 10.0)),
            PathCommand::Close,
        ]);
        let quads = QuadPath::from_source_path(&path);
        assert_eq!(quads.element_count(), 3);
        assert_eq!(quads.elements()[2].end_point(), Vec2::ZERO);
    }

    #[test]
    fn test_from_source_path_keeps_fill_rule() {
        let path = Path::from_commands(vec![
            PathCommand::MoveTo(Vec2::ZERO),
            PathCommand::QuadTo {
                control: Vec2::new(5.0, 10.0),
                to: Vec2::new(10.0, 0.0),
            },
        ])
        .with_fill_rule(crate::FillRule::EvenOdd);
        let quads = QuadPath::from_source_path(&path);
        assert_eq!(quads.fill_rule(), crate::FillRule::EvenOdd);
        assert_eq!(quads.element_count(), 1);
        assert!(!quads.elements()[0].is_line());
    }
}
