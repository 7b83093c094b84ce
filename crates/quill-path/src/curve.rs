//! Bezier curve primitives.
//!
//! Quadratic and cubic Bezier curves used by the source path and the
//! quadratic path model.

use glam::Vec2;

/// A quadratic Bezier curve (one control point).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    /// Start point
    pub from: Vec2,
    /// Control point
    pub control: Vec2,
    /// End point
    pub to: Vec2,
}

impl QuadraticBezier {
    /// Create a new quadratic Bezier curve.
    pub fn new(from: Vec2, control: Vec2, to: Vec2) -> Self {
        Self { from, control, to }
    }

    /// Evaluate the curve at parameter t (0.0 to 1.0).
    pub fn eval(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        self.from * (mt * mt) + self.control * (2.0 * mt * t) + self.to * (t * t)
    }

    /// Get the derivative at parameter t.
    pub fn derivative(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        (self.control - self.from) * (2.0 * mt) + (self.to - self.control) * (2.0 * t)
    }

    /// Split the curve at parameter t, returning two curves.
    pub fn split(&self, t: f32) -> (Self, Self) {
        let p01 = self.from.lerp(self.control, t);
        let p12 = self.control.lerp(self.to, t);
        let p012 = p01.lerp(p12, t);

        (
            Self::new(self.from, p01, p012),
            Self::new(p012, p12, self.to),
        )
    }

    /// Exact arc length of the curve.
    pub fn length(&self) -> f32 {
        match ArcLength::new(self) {
            Some(arc) => {
                let length = arc.at(1.0);
                if length.is_finite() {
                    length
                } else {
                    self.polyline_length(1.0, 64)
                }
            }
            None => self.polyline_length(1.0, 64),
        }
    }

    /// Length of the curve from 0 to `t`, approximated by `subdivisions` chords.
    pub fn polyline_length(&self, t: f32, subdivisions: usize) -> f32 {
        let mut length = 0.0;
        let mut prev = self.from;

        for i in 1..=subdivisions {
            let point = self.eval(t * i as f32 / subdivisions as f32);
            length += prev.distance(point);
            prev = point;
        }

        length
    }
}

/// Closed-form arc length of a quadratic Bezier, `s(t) = ∫₀ᵗ |B'(x)| dx`.
///
/// `|B'(t)|²` is the quadratic `A·t² + B·t + C`; completing the square gives an
/// integral with an elementary antiderivative.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArcLength {
    b: f32,
    k: f32,
    l0: f32,
    l2: f32,
    lnom: f32,
}

impl ArcLength {
    /// Returns `None` when the curve is (close to) uniformly parameterized along a line,
    /// where the closed form divides by zero.
    pub(crate) fn new(curve: &QuadraticBezier) -> Option<Self> {
        let ap = curve.from - 2.0 * curve.control + curve.to;
        let bp = 2.0 * curve.control - 2.0 * curve.from;
        let a = 4.0 * ap.dot(ap);
        let bb = 4.0 * ap.dot(bp);
        let c = bp.dot(bp);
        if a.is_nan() || a <= f32::EPSILON * c.max(1.0) {
            return None;
        }

        let b = bb / (2.0 * a);
        let k = c / a - b * b;
        let root = (b * b + k).sqrt();
        Some(Self {
            b,
            k,
            l0: 0.5 * a.sqrt(),
            l2: b * root,
            lnom: b + root,
        })
    }

    /// Length from the start of the curve to parameter `t`. May be non-finite for
    /// curves whose control point lies on the chord's extension.
    pub(crate) fn at(&self, t: f32) -> f32 {
        let u = t + self.b;
        let w = (u * u + self.k).sqrt();
        let l1 = u * w;
        let l3 = self.k * ((u + w) / self.lnom).abs().ln();
        self.l0 * (l1 - self.l2 + l3)
    }
}

/// A cubic Bezier curve (two control points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    /// Start point
    pub from: Vec2,
    /// First control point
    pub control1: Vec2,
    /// Second control point
    pub control2: Vec2,
    /// End point
    pub to: Vec2,
}

impl CubicBezier {
    /// Create a new cubic Bezier curve.
    pub fn new(from: Vec2, control1: Vec2, control2: Vec2, to: Vec2) -> Self {
        Self {
            from,
            control1,
            control2,
            to,
        }
    }

    /// Evaluate the curve at parameter t (0.0 to 1.0).
    pub fn eval(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        self.from * mt3
            + self.control1 * (3.0 * mt2 * t)
            + self.control2 * (3.0 * mt * t2)
            + self.to * t3
    }

    /// Split the curve at parameter t, returning two curves.
    pub fn split(&self, t: f32) -> (Self, Self) {
        let p01 = self.from.lerp(self.control1, t);
        let p12 = self.control1.lerp(self.control2, t);
        let p23 = self.control2.lerp(self.to, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        let p0123 = p012.lerp(p123, t);

        (
            Self::new(self.from, p01, p012, p0123),
            Self::new(p0123, p123, p23, self.to),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_endpoints() {
        let curve = QuadraticBezier::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 100.0),
            Vec2::new(100.0, 0.0),
        );

        assert_eq!(curve.eval(0.0), curve.from);
        assert_eq!(curve.eval(1.0), curve.to);
    }

    #[test]
    fn test_cubic_endpoints() {
        let curve = CubicBezier::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(25.0, 100.0),
            Vec2::new(75.0, 100.0),
            Vec2::new(100.0, 0.0),
        );

        assert_eq!(curve.eval(0.0), curve.from);
        assert_eq!(curve.eval(1.0), curve.to);
    }

    #[test]
    fn test_quadratic_split() {
        let curve = QuadraticBezier::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 100.0),
            Vec2::new(100.0, 0.0),
        );

        let (left, right) = curve.split(0.5);
        let midpoint = curve.eval(0.5);

        assert!((left.to - midpoint).length() < 0.001);
        assert!((right.from - midpoint).length() < 0.001);
    }

    #[test]
    fn test_closed_form_length_matches_polyline() {
        let curve = QuadraticBezier::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 100.0),
            Vec2::new(100.0, 0.0),
        );
        let exact = curve.length();
        let approx = curve.polyline_length(1.0, 1000);
        assert!((exact - approx).abs() < 0.01 * exact, "{exact} vs {approx}");
    }

    #[test]
    fn test_straight_quadratic_length() {
        // Control point at the chord midpoint: the closed form degenerates.
        let curve = QuadraticBezier::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        assert!(ArcLength::new(&curve).is_none());
        assert!((curve.length() - 10.0).abs() < 1e-4);
    }
}
