//! The quadratic path model.

use crate::{
    Element, ElementId, ElementSlot, FillRule, Path, PathBuilder, PathConfig, Transform2D,
};
use glam::Vec2;
use quill_core::math::{Rect, fuzzy_eq_vec2};
use quill_core::predicates;

/// A path made only of lines and quadratic Bezier segments.
///
/// Built incrementally with [`move_to`](Self::move_to), [`line_to`](Self::line_to) and
/// [`quad_to`](Self::quad_to), or converted from a source [`Path`] with
/// [`from_source_path`](Self::from_source_path). Elements can be split in two; the
/// halves live in a separate child arena and are reached through [`ElementId`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadPath {
    elements: Vec<Element>,
    child_elements: Vec<Element>,
    fill_rule: FillRule,
    current_point: Vec2,
    subpath_to_start: bool,
    config: PathConfig,
}

impl Default for QuadPath {
    fn default() -> Self {
        Self::with_config(PathConfig::default())
    }
}

impl QuadPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PathConfig) -> Self {
        Self {
            elements: Vec::new(),
            child_elements: Vec::new(),
            fill_rule: FillRule::default(),
            current_point: Vec2::ZERO,
            subpath_to_start: true,
            config,
        }
    }

    /// An empty path sharing this path's fill rule and configuration.
    pub(crate) fn empty_like(&self) -> Self {
        let mut res = Self::with_config(self.config);
        res.fill_rule = self.fill_rule;
        res
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PathConfig) {
        self.config = config;
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.fill_rule = fill_rule;
    }

    pub fn current_point(&self) -> Vec2 {
        self.current_point
    }

    pub fn reserve(&mut self, additional: usize) {
        self.elements.reserve(additional);
    }

    /// Start a new sub-path at `to`.
    pub fn move_to(&mut self, to: Vec2) -> &mut Self {
        self.subpath_to_start = true;
        self.current_point = to;
        self
    }

    pub fn line_to(&mut self, to: Vec2) -> &mut Self {
        self.add_element(Vec2::ZERO, to, true);
        self
    }

    pub fn quad_to(&mut self, control: Vec2, to: Vec2) -> &mut Self {
        self.add_element(control, to, false);
        self
    }

    fn add_element(&mut self, control: Vec2, end: Vec2, is_line: bool) {
        if fuzzy_eq_vec2(self.current_point, end) {
            return;
        }

        let is_line = is_line
            || predicates::is_point_near_line(
                control,
                self.current_point,
                end,
                self.config.near_line_epsilon,
            );

        self.elements.push(Element {
            sp: self.current_point,
            cp: if is_line {
                (self.current_point + end) * 0.5
            } else {
                control
            },
            ep: end,
            is_line,
            is_subpath_start: self.subpath_to_start,
            ..Default::default()
        });
        self.subpath_to_start = false;
        self.current_point = end;
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of top-level elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of leaf elements, counting split elements by their children.
    pub fn element_count_recursive(&self) -> usize {
        self.leaves().count()
    }

    /// Top-level elements, split or not.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        match id.slot() {
            ElementSlot::TopLevel(index) => self.elements.get(index),
            ElementSlot::Child(index) => self.child_elements.get(index),
        }
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        match id.slot() {
            ElementSlot::TopLevel(index) => self.elements.get_mut(index),
            ElementSlot::Child(index) => self.child_elements.get_mut(index),
        }
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Depth-first iterator over leaf elements, in path order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            path: self,
            next_top_level: 0,
            stack: Vec::new(),
        }
    }

    /// Call `f` for every leaf element, in path order.
    pub fn iterate_elements(&self, mut f: impl FnMut(&Element)) {
        for element in self.leaves() {
            f(element);
        }
    }

    /// Winding test of `point` against the top-level elements.
    ///
    /// Sub-paths are assumed to be closed.
    pub fn contains(&self, point: Vec2) -> bool {
        let mut winding_number = 0;
        for e in &self.elements {
            let mut dir = 1;
            let mut y1 = e.sp.y;
            let mut y2 = e.ep.y;
            if y2 < y1 {
                std::mem::swap(&mut y1, &mut y2);
                dir = -1;
            }

            if e.is_line {
                if point.y < y1 || point.y >= y2 || y1 == y2 {
                    continue;
                }
                let t = (point.y - e.sp.y) / (e.ep.y - e.sp.y);
                let x = e.sp.x + t * (e.ep.x - e.sp.x);
                if x <= point.x {
                    winding_number += dir;
                }
            } else {
                y1 = y1.min(e.cp.y);
                y2 = y2.max(e.cp.y);
                if point.y < y1 || point.y >= y2 {
                    continue;
                }

                // Only count when exactly one crossing is left of the point.
                let mut one_hit = false;
                let mut t_for_hit = -1.0;
                for t in e.intersections_at_y(point.y) {
                    if e.point_at_fraction(t).x <= point.x {
                        one_hit = !one_hit;
                        t_for_hit = t;
                    }
                }
                if one_hit {
                    winding_number += if e.tangent_at_fraction(t_for_hit).y < 0.0 {
                        -1
                    } else {
                        1
                    };
                }
            }
        }

        self.fill_rule.is_inside(winding_number)
    }

    /// Copy of this path in which every sub-path ends exactly where it starts.
    ///
    /// Must be called before any element is split. A result with exactly three
    /// elements gets its last element split so that it has four.
    pub fn sub_paths_closed(&self) -> QuadPath {
        debug_assert!(self.child_elements.is_empty());

        let mut res = self.empty_like();
        res.subpath_to_start = false;
        res.elements.reserve(self.elements.len() + 1);

        let mut sub_start: Option<usize> = None;
        let mut prev: Option<usize> = None;
        for (i, element) in self.elements.iter().enumerate() {
            if element.is_subpath_start {
                if let Some(start) = sub_start
                    && self.elements[i - 1].ep != self.elements[start].sp
                {
                    res.close_with_line(self.elements[i - 1].ep, self.elements[start].sp);
                } else if let Some(prev) = prev {
                    res.elements[prev].is_subpath_end = true;
                }
                sub_start = Some(i);
            }
            res.elements.push(Element {
                first_child: None,
                ..*element
            });
            prev = Some(res.elements.len() - 1);
        }

        if let Some(start) = sub_start {
            let start_point = self.elements[start].sp;
            if let Some(last) = self.elements.last()
                && last.ep != start_point
            {
                res.current_point = last.ep;
                res.line_to(start_point);
            }
            if let Some(end) = res.elements.last_mut() {
                end.is_subpath_end = true;
                end.ep = start_point;
            }
        }

        // Three-element paths triangulate poorly; give them a fourth vertex.
        if res.elements.len() == 3 {
            res.split_element_at(ElementId::top_level(2));
            res = res.flattened();
            debug_assert_eq!(res.element_count(), 4);
        }

        res
    }

    fn close_with_line(&mut self, from: Vec2, to: Vec2) {
        self.current_point = from;
        self.line_to(to);
        // line_to skips near-zero segments; then the previous element is retargeted.
        if let Some(end) = self.elements.last_mut() {
            end.is_subpath_end = true;
            end.ep = to;
        }
    }

    /// Copy of this path where the leaf elements become the top-level elements.
    pub fn flattened(&self) -> QuadPath {
        let mut res = self.empty_like();
        res.current_point = self.current_point;
        res.subpath_to_start = self.subpath_to_start;
        res.elements.reserve(self.element_count_recursive());
        res.elements.extend(self.leaves().copied());
        res
    }

    /// Split the element at `id` in half. Its children share its flags; the first one
    /// inherits the sub-path start, the second the sub-path end.
    ///
    /// Elements that are already split, and unknown ids, are left alone.
    pub fn split_element_at(&mut self, id: ElementId) {
        let Some(parent) = self.element(id).copied() else {
            return;
        };
        if parent.first_child.is_some() {
            return;
        }

        let mp = parent.mid_point();
        let first = Element {
            sp: parent.sp,
            cp: (parent.sp + parent.cp) * 0.5,
            ep: mp,
            is_line: parent.is_line,
            is_subpath_start: parent.is_subpath_start,
            is_subpath_end: false,
            curvature: parent.curvature,
            first_child: None,
        };
        let second = Element {
            sp: mp,
            cp: (parent.ep + parent.cp) * 0.5,
            ep: parent.ep,
            is_line: parent.is_line,
            is_subpath_start: false,
            is_subpath_end: parent.is_subpath_end,
            curvature: parent.curvature,
            first_child: None,
        };
        if fuzzy_eq_vec2(first.sp, first.ep) || fuzzy_eq_vec2(second.sp, second.ep) {
            tracing::debug!("Splitting element {} resulted in a near-null quad", parent);
        }

        let first_child = self.child_elements.len();
        self.child_elements.push(first);
        self.child_elements.push(second);
        if let Some(parent) = self.element_mut(id) {
            parent.first_child = Some(first_child);
        }
    }

    /// Bounding rectangle of all top-level start, control and end points.
    pub fn control_point_rect(&self) -> Option<Rect> {
        Rect::from_points(self.elements.iter().flat_map(|e| [e.sp, e.cp, e.ep]))
    }

    /// Convert the top-level elements back into a source path.
    pub fn to_source_path(&self) -> Path {
        let mut builder = PathBuilder::new();
        builder.fill_rule(self.fill_rule);
        for e in &self.elements {
            if e.is_subpath_start {
                builder.move_to(e.sp);
            }
            if e.is_line {
                builder.line_to(e.ep);
            } else {
                builder.quad_to(e.cp, e.ep);
            }
        }
        builder.build()
    }

    /// Copy of this path with every point mapped through `transform`.
    ///
    /// A mirroring transform invalidates the curvature classification, so it is
    /// cleared and [`add_curvature_data`](Self::add_curvature_data) must run again.
    pub fn transformed(&self, transform: &Transform2D) -> QuadPath {
        let mut res = self.clone();
        let keep_curvature = transform.preserves_orientation();
        for e in res.elements.iter_mut().chain(res.child_elements.iter_mut()) {
            e.map_points(|p| transform.transform_point(p));
            if !keep_curvature {
                e.curvature = Default::default();
            }
        }
        res.current_point = transform.transform_point(res.current_point);
        res
    }
}

/// Iterator returned by [`QuadPath::leaves`].
pub struct Leaves<'a> {
    path: &'a QuadPath,
    next_top_level: usize,
    stack: Vec<ElementId>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.stack.pop() {
                let element = self.path.element(id)?;
                match (element.child(0), element.child(1)) {
                    (Some(first), Some(second)) => {
                        self.stack.push(second);
                        self.stack.push(first);
                    }
                    _ => return Some(element),
                }
            } else if self.next_top_level < self.path.elements.len() {
                self.stack.push(ElementId::top_level(self.next_top_level));
                self.next_top_level += 1;
            } else {
                return None;
            }
        }
    }
}

impl std::fmt::Display for QuadPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "QuadPath({} main elements, {} leaf elements, {}",
            self.element_count(),
            self.element_count_recursive(),
            self.fill_rule
        )?;
        for (i, e) in self.leaves().enumerate() {
            writeln!(f, " {}{}{}", i, if e.is_subpath_start { " >" } else { " " }, e)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(origin: Vec2, size: f32) -> QuadPath {
        let mut path = QuadPath::new();
        path.move_to(origin)
            .line_to(origin + Vec2::new(size, 0.0))
            .line_to(origin + Vec2::new(size, size))
            .line_to(origin + Vec2::new(0.0, size))
            .line_to(origin);
        path
    }

    #[test]
    fn test_zero_length_elements_are_skipped() {
        let mut path = QuadPath::new();
        path.move_to(Vec2::new(1.0, 1.0))
            .line_to(Vec2::new(1.0, 1.0))
            .line_to(Vec2::new(1.000001, 1.0))
            .line_to(Vec2::new(5.0, 1.0));
        assert_eq!(path.element_count(), 1);
        assert!(path.elements()[0].is_subpath_start());
    }

    #[test]
    fn test_flat_quad_becomes_line() {
        let mut path = QuadPath::new();
        path.move_to(Vec2::ZERO)
            .quad_to(Vec2::new(50.0, 0.2), Vec2::new(100.0, 0.0))
            .quad_to(Vec2::new(150.0, 40.0), Vec2::new(200.0, 0.0));
        let elements = path.elements();
        assert!(elements[0].is_line());
        assert_eq!(elements[0].control_point(), Vec2::new(50.0, 0.0));
        assert!(!elements[1].is_line());
    }

    #[test]
    fn test_contains_square() {
        let path = square(Vec2::ZERO, 10.0);
        assert!(path.contains(Vec2::new(5.0, 5.0)));
        assert!(!path.contains(Vec2::new(15.0, 5.0)));
        assert!(!path.contains(Vec2::new(5.0, -1.0)));
    }

    #[test]
    fn test_contains_fill_rules_with_nested_squares() {
        let mut path = square(Vec2::ZERO, 30.0);
        let inner = square(Vec2::new(10.0, 10.0), 10.0);
        path.elements.extend_from_slice(inner.elements());

        let hole = Vec2::new(15.0, 15.0);
        path.set_fill_rule(FillRule::NonZero);
        assert!(path.contains(hole));
        path.set_fill_rule(FillRule::EvenOdd);
        assert!(!path.contains(hole));
        assert!(path.contains(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_contains_curve() {
        // Half disc: chord along y = 0 and an arch bulging to y = 50.
        let mut path = QuadPath::new();
        path.move_to(Vec2::ZERO)
            .line_to(Vec2::new(100.0, 0.0))
            .quad_to(Vec2::new(50.0, 100.0), Vec2::ZERO);
        assert!(path.contains(Vec2::new(50.0, 25.0)));
        assert!(!path.contains(Vec2::new(50.0, 60.0)));
        assert!(!path.contains(Vec2::new(5.0, 40.0)));
    }

    #[test]
    fn test_sub_paths_closed_adds_closing_line() {
        let mut path = QuadPath::new();
        path.move_to(Vec2::ZERO)
            .line_to(Vec2::new(10.0, 0.0))
            .line_to(Vec2::new(10.0, 10.0))
            .line_to(Vec2::new(0.0, 10.0));
        path.move_to(Vec2::new(20.0, 0.0))
            .line_to(Vec2::new(30.0, 0.0))
            .line_to(Vec2::new(30.0, 10.0));

        let closed = path.sub_paths_closed();
        assert_eq!(closed.element_count(), 7);

        let elements = closed.elements();
        assert!(elements[3].is_subpath_end());
        assert_eq!(elements[3].end_point(), elements[0].start_point());
        assert!(elements[4].is_subpath_start());
        assert!(elements[6].is_line());
        assert!(elements[6].is_subpath_end());
        assert_eq!(elements[6].end_point(), Vec2::new(20.0, 0.0));
        assert_eq!(elements.iter().filter(|e| e.is_subpath_end()).count(), 2);
    }

    #[test]
    fn test_sub_paths_closed_retargets_near_endpoint() {
        let mut path = QuadPath::new();
        path.move_to(Vec2::new(100.0, 100.0))
            .line_to(Vec2::new(200.0, 100.0))
            .line_to(Vec2::new(200.0, 200.0))
            .line_to(Vec2::new(100.0, 200.0))
            .line_to(Vec2::new(100.0, 100.0001));

        let closed = path.sub_paths_closed();
        assert_eq!(closed.element_count(), 4);
        let last = closed.elements()[3];
        assert!(last.is_subpath_end());
        assert_eq!(last.end_point(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_three_element_path_is_split() {
        let mut path = QuadPath::new();
        path.move_to(Vec2::ZERO)
            .line_to(Vec2::new(10.0, 0.0))
            .line_to(Vec2::new(0.0, 10.0));

        let closed = path.sub_paths_closed();
        assert_eq!(closed.element_count(), 4);
        let elements = closed.elements();
        assert_eq!(elements[2].end_point(), Vec2::new(0.0, 5.0));
        assert!(elements[3].is_subpath_end());
        assert_eq!(elements[3].end_point(), Vec2::ZERO);
    }

    #[test]
    fn test_split_element_and_leaves() {
        let mut path = QuadPath::new();
        path.move_to(Vec2::ZERO)
            .quad_to(Vec2::new(50.0, 100.0), Vec2::new(100.0, 0.0))
            .line_to(Vec2::ZERO);

        path.split_element_at(ElementId::top_level(0));
        assert_eq!(path.element_count(), 2);
        assert_eq!(path.element_count_recursive(), 3);

        let parent = path.elements()[0];
        let first = *path.element(parent.child(0).unwrap()).unwrap();
        let second = *path.element(parent.child(1).unwrap()).unwrap();
        assert!(first.is_subpath_start());
        assert!(!second.is_subpath_start());
        assert_eq!(first.end_point(), parent.mid_point());
        assert_eq!(second.start_point(), parent.mid_point());
        assert!((first.point_at_fraction(0.5) - parent.point_at_fraction(0.25)).length() < 1e-4);

        // Split a child again.
        path.split_element_at(ElementId::child(1));
        assert_eq!(path.element_count_recursive(), 4);

        let mut ends = Vec::new();
        path.iterate_elements(|e| ends.push(e.end_point()));
        assert_eq!(ends.len(), 4);
        assert_eq!(ends[3], Vec2::ZERO);

        let flat = path.flattened();
        assert_eq!(flat.element_count(), 4);
        assert_eq!(flat.element_count_recursive(), 4);
    }

    #[test]
    fn test_control_point_rect() {
        let mut path = QuadPath::new();
        assert!(path.control_point_rect().is_none());
        path.move_to(Vec2::ZERO)
            .quad_to(Vec2::new(50.0, 100.0), Vec2::new(100.0, 0.0));
        let rect = path.control_point_rect().unwrap();
        assert_eq!(rect.min, Vec2::ZERO);
        assert_eq!(rect.max, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_to_source_path() {
        let path = square(Vec2::ZERO, 10.0);
        let source = path.to_source_path();
        assert_eq!(source.len(), 5);
        assert_eq!(QuadPath::from_source_path(&source).elements(), path.elements());
    }

    #[test]
    fn test_transformed() {
        let path = square(Vec2::ZERO, 10.0);
        let moved = path.transformed(&Transform2D::translate(Vec2::new(100.0, 0.0)));
        assert!(moved.contains(Vec2::new(105.0, 5.0)));
        assert!(!moved.contains(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_display_lists_leaves() {
        let path = square(Vec2::ZERO, 1.0);
        let text = path.to_string();
        assert!(text.starts_with("QuadPath(4 main elements, 4 leaf elements, NonZero"));
        assert!(text.contains(" 0 >{ (0, 0) (0.5, 0) (1, 0) } L O S"));
        assert!(text.ends_with(')'));
    }
}
