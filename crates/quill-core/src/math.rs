//! Vector types and tolerant float comparisons.
//!
//! Re-exports the [`glam`] types used across quill and provides the fuzzy
//! comparisons that all of the geometric code relies on. The tolerances are
//! relative: two values compare equal when they agree to about five significant
//! digits for `f32` and twelve for `f64`.
//!
//! # Examples
//!
//! ```
//! use quill_core::math::{fuzzy_compare, fuzzy_is_null, Vec2, fuzzy_eq_vec2};
//!
//! assert!(fuzzy_is_null(1e-6));
//! assert!(fuzzy_compare(100.0, 100.0001));
//! assert!(fuzzy_eq_vec2(Vec2::new(1.0, 0.0), Vec2::new(1.000001, 0.0)));
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::{DVec2, Mat3, Vec2, Vec3};

const F32_NULL: f32 = 0.00001;
const F64_NULL: f64 = 0.000000000001;

/// Returns `true` if `value` is within `1e-5` of zero.
#[inline]
pub fn fuzzy_is_null(value: f32) -> bool {
    value.abs() <= F32_NULL
}

/// Returns `true` if `value` is within `1e-12` of zero.
#[inline]
pub fn fuzzy_is_null_f64(value: f64) -> bool {
    value.abs() <= F64_NULL
}

/// Relative comparison of two `f32` values.
///
/// Like any purely relative test this never matches a zero against a
/// non-zero value; use [`fuzzy_eq`] when either side may be close to zero.
#[inline]
pub fn fuzzy_compare(a: f32, b: f32) -> bool {
    (a - b).abs() * 100000.0 <= a.abs().min(b.abs())
}

/// Relative comparison of two `f64` values.
#[inline]
pub fn fuzzy_compare_f64(a: f64, b: f64) -> bool {
    (a - b).abs() * 1000000000000.0 <= a.abs().min(b.abs())
}

/// Relative comparison that also accepts two values that are both fuzzily zero.
#[inline]
pub fn fuzzy_eq(a: f32, b: f32) -> bool {
    fuzzy_compare(a, b) || (fuzzy_is_null(a) && fuzzy_is_null(b))
}

/// Component-wise [`fuzzy_eq`].
#[inline]
pub fn fuzzy_eq_vec2(a: Vec2, b: Vec2) -> bool {
    fuzzy_eq(a.x, b.x) && fuzzy_eq(a.y, b.y)
}

/// Axis aligned rectangle described by its two corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle containing all `points`, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |rect, p| rect.union_point(p)))
    }

    pub fn union_point(self, p: Vec2) -> Self {
        Self::new(self.min.min(p), self.max.max(p))
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }
}
