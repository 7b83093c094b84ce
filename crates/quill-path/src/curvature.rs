//! Fill side and convexity classification.
//!
//! The fill of an element is expected on its right. A curve whose control point is
//! on the left of its chord then bulges away from the fill and is convex; on the
//! right it is concave. Paths can come in either orientation, so the fill side is
//! probed once per sub-path and assumed consistent for the rest of it.

use crate::{CurvatureFlags, Element, QuadPath};
use glam::Vec2;

impl QuadPath {
    /// Fill side of `element`, found by probing a point just beside its midpoint.
    pub fn coordinate_order_of_element(&self, element: &Element) -> CurvatureFlags {
        let base_line = element.ep - element.sp;
        // At the midpoint the tangent of a quadratic is parallel to its chord.
        let normal = Vec2::new(-base_line.y, base_line.x).normalize_or_zero();
        let delta = (element.extent() / 100.0).min(self.config().convex_check_margin);
        let probe = element.mid_point() + normal * delta;
        if self.contains(probe) {
            CurvatureFlags::FILL_ON_RIGHT
        } else {
            CurvatureFlags::empty()
        }
    }

    /// Classify every top-level element. Must run before any element is split.
    ///
    /// Line control points are moved to a point on the filled side of the line.
    pub fn add_curvature_data(&mut self) {
        puffin::profile_function!();

        let check_all = self.config().check_all_curvature;
        let mut flags = CurvatureFlags::empty();
        for i in 0..self.element_count() {
            let element = self.elements()[i];
            debug_assert_eq!(element.child_count(), 0);

            if element.is_subpath_start {
                flags = self.coordinate_order_of_element(&element);
            } else if check_all {
                let element_flags = self.coordinate_order_of_element(&element);
                if element_flags != flags {
                    tracing::debug!(
                        "Curvature anomaly in {}: sub-path fill on right: {}, element fill on right: {}",
                        element,
                        flags.contains(CurvatureFlags::FILL_ON_RIGHT),
                        element_flags.contains(CurvatureFlags::FILL_ON_RIGHT)
                    );
                    flags = element_flags;
                }
            }

            let fill_on_right = flags.contains(CurvatureFlags::FILL_ON_RIGHT);
            let e = &mut self.elements_mut()[i];
            if e.is_line {
                e.curvature = flags;
                let v = e.ep - e.sp;
                e.cp = if fill_on_right {
                    e.sp + Vec2::new(-v.y, v.x)
                } else {
                    e.sp + Vec2::new(v.y, -v.x)
                };
            } else if e.is_control_point_on_left() == fill_on_right {
                e.curvature = flags | CurvatureFlags::CONVEX;
            } else {
                e.curvature = flags;
            }
        }
    }
}
