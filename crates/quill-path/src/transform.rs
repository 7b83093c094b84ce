//! 2D affine transformations applied to quadratic paths.
//!
//! Quadratic Bezier curves are closed under affine maps, so transforming a
//! [`QuadPath`](crate::QuadPath) only needs its points mapped.

use glam::{Mat3, Vec2};

/// A 2D affine transformation backed by a 3x3 matrix whose last row is `[0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    matrix: Mat3,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        matrix: Mat3::IDENTITY,
    };

    pub fn from_mat3(matrix: Mat3) -> Self {
        Self { matrix }
    }

    pub fn translate(offset: Vec2) -> Self {
        Self {
            matrix: Mat3::from_translation(offset),
        }
    }

    /// Rotation by `angle` radians.
    pub fn rotate(angle: f32) -> Self {
        Self {
            matrix: Mat3::from_angle(angle),
        }
    }

    pub fn scale(factor: f32) -> Self {
        Self::scale_xy(Vec2::splat(factor))
    }

    pub fn scale_xy(scale: Vec2) -> Self {
        Self {
            matrix: Mat3::from_scale(scale),
        }
    }

    /// Combine two transforms (self then other).
    pub fn then(&self, other: &Transform2D) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    pub fn then_translate(&self, offset: Vec2) -> Self {
        self.then(&Transform2D::translate(offset))
    }

    pub fn then_rotate(&self, angle: f32) -> Self {
        self.then(&Transform2D::rotate(angle))
    }

    pub fn then_scale(&self, factor: f32) -> Self {
        self.then(&Transform2D::scale(factor))
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.matrix.transform_point2(point)
    }

    /// Transform a vector (ignores translation).
    pub fn transform_vector(&self, vector: Vec2) -> Vec2 {
        self.matrix.transform_vector2(vector)
    }

    pub fn determinant(&self) -> f32 {
        self.matrix.determinant()
    }

    /// `false` for mirroring transforms, which swap the left and right side of every element.
    pub fn preserves_orientation(&self) -> bool {
        self.determinant() > 0.0
    }

    /// Get the inverse transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON {
            None
        } else {
            Some(Self {
                matrix: self.matrix.inverse(),
            })
        }
    }

    pub fn as_mat3(&self) -> &Mat3 {
        &self.matrix
    }
}

impl std::ops::Mul<Transform2D> for Transform2D {
    type Output = Transform2D;

    fn mul(self, rhs: Transform2D) -> Transform2D {
        self.then(&rhs)
    }
}

impl std::ops::Mul<Vec2> for Transform2D {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        self.transform_point(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_chain_transforms() {
        let t = Transform2D::translate(Vec2::new(10.0, 0.0)).then_scale(2.0);
        // First translate: (15, 5), then scale: (30, 10)
        assert_eq!(t.transform_point(Vec2::new(5.0, 5.0)), Vec2::new(30.0, 10.0));
        assert_eq!(t.transform_vector(Vec2::new(5.0, 5.0)), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_rotate_keeps_orientation() {
        let t = Transform2D::rotate(PI / 2.0);
        let result = t * Vec2::new(1.0, 0.0);
        assert!(result.abs_diff_eq(Vec2::new(0.0, 1.0), 0.001));
        assert!(t.preserves_orientation());
    }

    #[test]
    fn test_mirror_flips_orientation() {
        let t = Transform2D::scale_xy(Vec2::new(-1.0, 1.0));
        assert!(!t.preserves_orientation());
    }

    #[test]
    fn test_inverse() {
        let t = Transform2D::translate(Vec2::new(10.0, 20.0)).then_rotate(0.3);
        let inv = t.inverse().unwrap();
        let point = Vec2::new(5.0, 5.0);
        let restored = inv.transform_point(t.transform_point(point));
        assert!((restored - point).length() < 0.001);
        assert!(Transform2D::scale(0.0).inverse().is_none());
    }
}
