//! Elements of a [`QuadPath`](crate::QuadPath).

use crate::QuadraticBezier;
use arrayvec::ArrayVec;
use bitflags::bitflags;
use glam::Vec2;
use quill_core::predicates;

bitflags! {
    /// Curvature classification of an element.
    ///
    /// The empty set means "fill on the left, concave", which is also the state
    /// before [`QuadPath::add_curvature_data`](crate::QuadPath::add_curvature_data) runs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CurvatureFlags: u8 {
        /// The filled side is to the right of the direction of travel.
        const FILL_ON_RIGHT = 1 << 0;
        /// The curve bulges away from the fill.
        const CONVEX = 1 << 1;
    }
}

/// Handle to an element of a [`QuadPath`](crate::QuadPath).
///
/// Non-negative values address the top-level element list, negative values the
/// child arena that split elements delegate to (`-1` is child 0, `-2` child 1, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(i32);

/// Decoded form of an [`ElementId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementSlot {
    TopLevel(usize),
    Child(usize),
}

impl ElementId {
    pub fn top_level(index: usize) -> Self {
        Self(index as i32)
    }

    pub fn child(index: usize) -> Self {
        Self(-(index as i32) - 1)
    }

    pub fn raw(self) -> i32 {
        self.0
    }

    pub fn is_child(self) -> bool {
        self.0 < 0
    }

    pub fn slot(self) -> ElementSlot {
        if self.0 >= 0 {
            ElementSlot::TopLevel(self.0 as usize)
        } else {
            ElementSlot::Child((-(self.0 + 1)) as usize)
        }
    }
}

impl From<usize> for ElementId {
    fn from(index: usize) -> Self {
        Self::top_level(index)
    }
}

/// A single line or quadratic segment.
///
/// Lines carry a control point too: the chord midpoint while the path is being
/// built, and a point on the filled side once curvature data has been added.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Element {
    pub(crate) sp: Vec2,
    pub(crate) cp: Vec2,
    pub(crate) ep: Vec2,
    pub(crate) is_line: bool,
    pub(crate) is_subpath_start: bool,
    pub(crate) is_subpath_end: bool,
    pub(crate) curvature: CurvatureFlags,
    /// Index of the first of two consecutive children in the child arena.
    pub(crate) first_child: Option<usize>,
}

impl Element {
    /// A detached quadratic element, mostly useful for tests and tools.
    pub fn quad(sp: Vec2, cp: Vec2, ep: Vec2) -> Self {
        Self {
            sp,
            cp,
            ep,
            ..Default::default()
        }
    }

    /// A detached line element.
    pub fn line(sp: Vec2, ep: Vec2) -> Self {
        Self {
            sp,
            cp: (sp + ep) * 0.5,
            ep,
            is_line: true,
            ..Default::default()
        }
    }

    pub fn start_point(&self) -> Vec2 {
        self.sp
    }

    pub fn control_point(&self) -> Vec2 {
        self.cp
    }

    pub fn end_point(&self) -> Vec2 {
        self.ep
    }

    pub fn mid_point(&self) -> Vec2 {
        self.point_at_fraction(0.5)
    }

    pub fn is_line(&self) -> bool {
        self.is_line
    }

    pub fn is_subpath_start(&self) -> bool {
        self.is_subpath_start
    }

    pub fn is_subpath_end(&self) -> bool {
        self.is_subpath_end
    }

    pub fn curvature(&self) -> CurvatureFlags {
        self.curvature
    }

    pub fn is_convex(&self) -> bool {
        self.curvature.contains(CurvatureFlags::CONVEX)
    }

    pub fn is_fill_on_right(&self) -> bool {
        self.curvature.contains(CurvatureFlags::FILL_ON_RIGHT)
    }

    /// 0 for a leaf, 2 for a split element.
    pub fn child_count(&self) -> usize {
        if self.first_child.is_some() { 2 } else { 0 }
    }

    /// Handle of child `n` (0 or 1) of a split element.
    pub fn child(&self, n: usize) -> Option<ElementId> {
        match self.first_child {
            Some(first) if n < 2 => Some(ElementId::child(first + n)),
            _ => None,
        }
    }

    pub fn as_quadratic(&self) -> QuadraticBezier {
        QuadraticBezier::new(self.sp, self.cp, self.ep)
    }

    /// Point at parameter `t`. Lines ignore their control point.
    pub fn point_at_fraction(&self, t: f32) -> Vec2 {
        if self.is_line {
            self.sp + t * (self.ep - self.sp)
        } else {
            self.as_quadratic().eval(t)
        }
    }

    /// Unnormalized derivative at parameter `t`.
    pub fn tangent_at_fraction(&self, t: f32) -> Vec2 {
        if self.is_line {
            self.ep - self.sp
        } else {
            self.as_quadratic().derivative(t)
        }
    }

    /// Unit normal at parameter `t`, pointing to the left of the tangent in a y-up frame.
    pub fn normal_at_fraction(&self, t: f32) -> Vec2 {
        let tangent = self.tangent_at_fraction(t);
        Vec2::new(-tangent.y, tangent.x).normalize_or_zero()
    }

    /// Diagonal length of the element's bounding box (control point included for curves).
    pub fn extent(&self) -> f32 {
        let mut min = self.sp.min(self.ep);
        let mut max = self.sp.max(self.ep);
        if !self.is_line {
            min = min.min(self.cp);
            max = max.max(self.cp);
        }
        (max - min).length()
    }

    /// Parameters in `[0, 1]` where the curve crosses the horizontal line at `y`.
    pub fn intersections_at_y(&self, y: f32) -> ArrayVec<f32, 2> {
        let y0 = self.sp.y - y;
        let y1 = self.cp.y - y;
        let y2 = self.ep.y - y;
        let in_range = |r: f32| r.is_finite() && (0.0..=1.0).contains(&r);

        let mut roots = ArrayVec::new();
        let a = y0 - 2.0 * y1 + y2;
        if a != 0.0 {
            let b = y1 * y1 - y0 * y2;
            if b >= 0.0 {
                let sqr = b.sqrt();
                let root1 = -(-y0 + y1 + sqr) / a;
                if in_range(root1) {
                    roots.push(root1);
                }
                let root2 = (y0 - y1 + sqr) / a;
                if root2 != root1 && in_range(root2) {
                    roots.push(root2);
                }
            }
        } else if y1 != y2 {
            let root = (y2 - 2.0 * y1) / (2.0 * (y2 - y1));
            if in_range(root) {
                roots.push(root);
            }
        }
        roots
    }

    pub fn is_control_point_on_left(&self) -> bool {
        predicates::is_point_on_left(self.cp, self.sp, self.ep)
    }

    pub(crate) fn map_points(&mut self, f: impl Fn(Vec2) -> Vec2) {
        self.sp = f(self.sp);
        self.cp = f(self.cp);
        self.ep = f(self.ep);
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ ({}, {}) ({}, {}) ({}, {}) }} {} {} {}",
            self.sp.x,
            self.sp.y,
            self.cp.x,
            self.cp.y,
            self.ep.x,
            self.ep.y,
            if self.is_line { "L" } else { "C" },
            if self.is_convex() { "X" } else { "O" },
            if self.is_subpath_start {
                "S"
            } else if self.is_subpath_end {
                "E"
            } else {
                ""
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id_encoding() {
        assert_eq!(ElementId::top_level(3).slot(), ElementSlot::TopLevel(3));
        assert_eq!(ElementId::child(0).raw(), -1);
        assert_eq!(ElementId::child(4).slot(), ElementSlot::Child(4));
        assert!(ElementId::child(0).is_child());
        assert!(!ElementId::from(0usize).is_child());
    }

    #[test]
    fn test_line_point_at_fraction_ignores_control() {
        let mut line = Element::line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        line.cp = Vec2::new(0.0, 50.0);
        assert_eq!(line.point_at_fraction(0.25), Vec2::new(2.5, 0.0));
        assert_eq!(line.mid_point(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_extent() {
        let quad = Element::quad(Vec2::ZERO, Vec2::new(3.0, 4.0), Vec2::new(3.0, 0.0));
        assert_eq!(quad.extent(), 5.0);
        let line = Element::line(Vec2::ZERO, Vec2::new(3.0, 0.0));
        assert_eq!(line.extent(), 3.0);
    }

    #[test]
    fn test_intersections_at_y_two_roots() {
        // Arch from (0,0) up to (10,0) with apex at y = 5.
        let quad = Element::quad(Vec2::ZERO, Vec2::new(5.0, 10.0), Vec2::new(10.0, 0.0));
        let roots = quad.intersections_at_y(2.5);
        assert_eq!(roots.len(), 2);
        for t in roots {
            assert!((quad.point_at_fraction(t).y - 2.5).abs() < 1e-4);
        }
        assert!(quad.intersections_at_y(6.0).is_empty());
    }

    #[test]
    fn test_intersections_at_y_monotone() {
        // a == 0: the control point is the y midpoint.
        let quad = Element::quad(Vec2::ZERO, Vec2::new(10.0, 5.0), Vec2::new(0.0, 10.0));
        let roots = quad.intersections_at_y(5.0);
        assert_eq!(roots.as_slice(), &[0.5]);
    }

    #[test]
    fn test_tangent_and_normal() {
        let line = Element::line(Vec2::ZERO, Vec2::new(4.0, 0.0));
        assert_eq!(line.tangent_at_fraction(0.3), Vec2::new(4.0, 0.0));
        assert_eq!(line.normal_at_fraction(0.3), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_display() {
        let mut quad = Element::quad(Vec2::ZERO, Vec2::new(1.0, 2.0), Vec2::new(3.0, 0.0));
        quad.is_subpath_start = true;
        quad.curvature = CurvatureFlags::CONVEX;
        assert_eq!(quad.to_string(), "{ (0, 0) (1, 2) (3, 0) } C X S");
    }
}
