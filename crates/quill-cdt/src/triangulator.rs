//! Incremental constrained Delaunay triangulation.
//!
//! Vertices are inserted one at a time into a caller supplied super-triangle: the
//! triangle containing the vertex is found with a visibility walk, split in three,
//! and the Delaunay property is restored by swapping diagonals. Constraint edges are
//! then forced into the triangulation by swapping away every edge they cross.

use crate::predicates::{find_quad, is_convex_quad};
use crate::registry::EdgeRegistry;
use crate::types::{NO_INDEX, ordered_edge};
use crate::{
    ConstraintEdge, Edge, Triangle, TriangulationError, TriangulationResult, TriangulatorConfig,
    Vertex,
};
use glam::Vec2;
use quill_core::alloc::HashSet;
use quill_core::math::{Rect, fuzzy_eq_vec2};
use quill_core::predicates::{
    is_point_in_circumcircle, is_point_in_triangle, orient, segments_intersect, side_of_line,
};
use smallvec::SmallVec;
use std::time::Instant;

/// Stage of a triangulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    InsertVertices,
    InsertConstraints,
    Finalize,
}

/// Triangulate `vertices`, whose last three entries form a super-triangle enclosing
/// all others, so that every edge in `edges` appears in the result.
///
/// All triangles are returned; those touching the super-triangle have
/// [`Triangle::is_valid`] cleared. Vertex indices in the result refer to `vertices`.
pub fn triangulate(
    vertices: &[Vertex],
    edges: &[ConstraintEdge],
) -> TriangulationResult<Vec<Triangle>> {
    triangulate_with_config(vertices, edges, &TriangulatorConfig::default())
}

/// [`triangulate`] with explicit debug switches.
pub fn triangulate_with_config(
    vertices: &[Vertex],
    edges: &[ConstraintEdge],
    config: &TriangulatorConfig,
) -> TriangulationResult<Vec<Triangle>> {
    puffin::profile_function!();

    if vertices.is_empty() {
        return Ok(Vec::new());
    }
    if vertices.len() < 3 {
        return Err(TriangulationError::TooFewVertices {
            count: vertices.len(),
        });
    }

    let mut triangulator = Triangulator::new(vertices, *config);
    triangulator.validate_edges(edges)?;

    triangulator.enter(Phase::InsertVertices);
    triangulator.insert_vertices()?;

    triangulator.enter(Phase::InsertConstraints);
    triangulator.insert_constraints(edges)?;

    triangulator.enter(Phase::Finalize);
    Ok(triangulator.finalize())
}

/// Visible neighbors of a triangle, with the edge shared with each.
type Visible = SmallVec<[(u32, Edge); 2]>;

struct Triangulator {
    points: Vec<Vec2>,
    /// Index of the first super-triangle vertex.
    super_start: u32,
    /// Vertex each input vertex ended up as; differs for duplicates.
    alias: Vec<u32>,
    triangles: Vec<Triangle>,
    registry: EdgeRegistry,
    constrained: HashSet<Edge>,
    last_formed: u32,
    config: TriangulatorConfig,
    phase: Phase,
    phase_start: Instant,
}

impl Triangulator {
    fn new(vertices: &[Vertex], config: TriangulatorConfig) -> Self {
        let mut points: Vec<Vec2> = vertices.iter().map(|v| v.point).collect();
        if config.normalize_coordinates {
            normalize(&mut points);
        }

        let count = points.len() as u32;
        let super_start = count - 3;
        let capacity = 2 * points.len() + 1;

        let mut triangulator = Self {
            points,
            super_start,
            alias: (0..count).collect(),
            triangles: Vec::with_capacity(capacity),
            registry: EdgeRegistry::with_capacity(3 * capacity),
            constrained: HashSet::default(),
            last_formed: 0,
            config,
            phase: Phase::Init,
            phase_start: Instant::now(),
        };

        let (s0, s1, s2) = (super_start, super_start + 1, super_start + 2);
        let (p0, p1, p2) = (
            triangulator.point(s0),
            triangulator.point(s1),
            triangulator.point(s2),
        );
        let super_triangle = if orient(p0, p1, p2) < 0.0 {
            Triangle::new(s0, s2, s1)
        } else {
            Triangle::new(s0, s1, s2)
        };
        triangulator.triangles.push(super_triangle);
        triangulator.register_triangle_edges(0);
        triangulator
    }

    fn enter(&mut self, phase: Phase) {
        tracing::debug!(
            "Triangulation phase {:?} took {:?}",
            self.phase,
            self.phase_start.elapsed()
        );
        self.phase = phase;
        self.phase_start = Instant::now();
    }

    #[inline]
    fn point(&self, vertex: u32) -> Vec2 {
        self.points[vertex as usize]
    }

    fn triangle_points(&self, triangle: u32) -> [Vec2; 3] {
        self.triangles[triangle as usize]
            .vertices
            .map(|v| self.points[v as usize])
    }

    fn contains_point(&self, triangle: u32, p: Vec2) -> bool {
        let [v1, v2, v3] = self.triangle_points(triangle);
        is_point_in_triangle(p, v1, v2, v3)
    }

    fn validate_edges(&self, edges: &[ConstraintEdge]) -> TriangulationResult<()> {
        for edge in edges {
            if edge.start >= self.super_start || edge.end >= self.super_start {
                return Err(TriangulationError::InvalidEdge {
                    start: edge.start,
                    end: edge.end,
                });
            }
        }
        Ok(())
    }

    // Edge registry and adjacency

    fn register_adjacency(&mut self, a: u32, b: u32, t1: u32, t2: u32) {
        for (from, to) in [(t1, t2), (t2, t1)] {
            let triangle = &mut self.triangles[from as usize];
            match triangle.slot_of_edge(a, b) {
                Some(slot) => triangle.adjacent[slot] = to,
                None => tracing::warn!("Triangle {} does not own edge {}-{}", from, a, b),
            }
        }
    }

    fn unregister_adjacency(&mut self, t1: u32, t2: u32) {
        for (from, to) in [(t1, t2), (t2, t1)] {
            let triangle = &mut self.triangles[from as usize];
            if let Some(slot) = triangle.adjacent.iter().position(|&n| n == to) {
                triangle.adjacent[slot] = NO_INDEX;
            }
        }
    }

    fn insert_edge(&mut self, a: u32, b: u32, triangle: u32) {
        if let Some((t1, t2)) = self.registry.insert(a, b, triangle) {
            self.register_adjacency(a, b, t1, t2);
        }
    }

    fn remove_edge(&mut self, a: u32, b: u32, triangle: u32) {
        if let Some((t1, t2)) = self.registry.remove(a, b, triangle) {
            self.unregister_adjacency(t1, t2);
        }
    }

    fn register_triangle_edges(&mut self, triangle: u32) {
        let [v0, v1, v2] = self.triangles[triangle as usize].vertices;
        self.insert_edge(v0, v1, triangle);
        self.insert_edge(v1, v2, triangle);
        self.insert_edge(v2, v0, triangle);
    }

    fn unregister_triangle_edges(&mut self, triangle: u32) {
        let [v0, v1, v2] = self.triangles[triangle as usize].vertices;
        self.remove_edge(v0, v1, triangle);
        self.remove_edge(v1, v2, triangle);
        self.remove_edge(v2, v0, triangle);
    }

    /// Replace the shared edge of `t1` and `t2` with the other diagonal of their quad.
    ///
    /// Afterwards `t1 = (i1, i3, i4)` and `t2 = (i3, i1, i2)`, so the new diagonal is the
    /// first edge of both. Returns `false` if the triangles share no edge.
    fn swap_diagonal(&mut self, t1: u32, t2: u32) -> bool {
        let Some([i1, i2, i3, i4]) =
            find_quad(&self.triangles[t1 as usize], &self.triangles[t2 as usize])
        else {
            return false;
        };

        self.unregister_triangle_edges(t1);
        self.unregister_triangle_edges(t2);
        self.triangles[t1 as usize].vertices = [i1, i3, i4];
        self.triangles[t2 as usize].vertices = [i3, i1, i2];
        self.register_triangle_edges(t1);
        self.register_triangle_edges(t2);
        true
    }

    fn is_convex(&self, t1: u32, t2: u32) -> bool {
        find_quad(&self.triangles[t1 as usize], &self.triangles[t2 as usize])
            .is_some_and(|quad| is_convex_quad(&self.points, quad))
    }

    /// Neighbors of `triangle` across edges that have `p` on their outer side.
    fn visible_neighbors(&self, p: Vec2, triangle: u32) -> Visible {
        let t = &self.triangles[triangle as usize];
        let [v1, v2, v3] = self.triangle_points(triangle);
        let d = orient(v1, v2, v3) <= 0.0;

        let mut visible = Visible::new();
        for slot in 0..3 {
            let Some(neighbor) = t.neighbor(slot) else {
                continue;
            };
            let (a, b) = t.edge(slot);
            if (side_of_line(p, self.point(a), self.point(b)) <= 0.0) == d {
                visible.push((neighbor, ordered_edge(a, b)));
            }
        }
        visible
    }

    fn next_toward(&self, p: Vec2, triangle: u32) -> u32 {
        match self.visible_neighbors(p, triangle).first() {
            Some(&(neighbor, _)) => neighbor,
            None => {
                let t = &self.triangles[triangle as usize];
                tracing::warn!(
                    "Point {} is not on the outside of any edge of triangle {:?}",
                    p,
                    t.vertices
                );
                NO_INDEX
            }
        }
    }

    // Vertex insertion

    fn insert_vertices(&mut self) -> TriangulationResult<()> {
        for vertex in 0..self.super_start {
            self.insert_vertex(vertex)?;
        }
        Ok(())
    }

    /// Lawson walk from the last created triangle, falling back to a linear scan.
    fn locate(&mut self, vertex: u32) -> TriangulationResult<u32> {
        let p = self.point(vertex);

        let mut current = self.last_formed;
        let mut walked = None;
        while current != NO_INDEX {
            if self.contains_point(current, p) {
                walked = Some(current);
                break;
            }

            let triangle = &mut self.triangles[current as usize];
            if triangle.last_seen_vertex == vertex {
                tracing::warn!("Revisiting triangle {} while locating vertex {}", current, vertex);
                break;
            }
            triangle.last_seen_vertex = vertex;
            current = self.next_toward(p, current);
        }

        if let Some(found) = walked
            && !self.config.validate_results
        {
            return Ok(found);
        }

        if walked.is_none() {
            tracing::warn!(
                "Can't find triangle for vertex {} by walking. Falling back to linear scan",
                vertex
            );
        }
        let scanned = (0..self.triangles.len() as u32).find(|&t| self.contains_point(t, p));

        if let (Some(walked), Some(scanned)) = (walked, scanned)
            && walked != scanned
        {
            tracing::warn!(
                "Walk matched triangle {} whereas linear scan matched {} for vertex {} at {}",
                walked,
                scanned,
                vertex,
                p
            );
        }

        scanned.ok_or(TriangulationError::PointLocation { vertex })
    }

    fn insert_vertex(&mut self, vertex: u32) -> TriangulationResult<()> {
        let p = self.point(vertex);
        let t1 = self.locate(vertex)?;

        let [v1, v2, v3] = self.triangles[t1 as usize].vertices;
        if let Some(existing) = [v1, v2, v3]
            .into_iter()
            .find(|&v| fuzzy_eq_vec2(self.point(v), p))
        {
            tracing::trace!("Vertex {} coincides with vertex {}", vertex, existing);
            self.alias[vertex as usize] = self.alias[existing as usize];
            return Ok(());
        }

        // Split (v1, v2, v3) into (v1, v2, p), (v2, v3, p) and (v3, v1, p).
        self.remove_edge(v2, v3, t1);
        self.remove_edge(v3, v1, t1);
        self.triangles[t1 as usize].vertices[2] = vertex;

        let t2 = self.triangles.len() as u32;
        self.triangles.push(Triangle::new(v2, v3, vertex));
        let t3 = self.triangles.len() as u32;
        self.triangles.push(Triangle::new(v3, v1, vertex));
        self.last_formed = t3;

        self.insert_edge(v2, vertex, t1);
        self.insert_edge(vertex, v1, t1);
        self.register_triangle_edges(t2);
        self.register_triangle_edges(t3);

        let mut stack: Vec<(u32, u32)> = Vec::new();
        self.push_opposite(vertex, t1, &mut stack);
        self.push_opposite(vertex, t2, &mut stack);
        self.push_opposite(vertex, t3, &mut stack);
        self.legalize(vertex, &mut stack);

        Ok(())
    }

    /// Queue the neighbor across the edge of `triangle` opposite `vertex`.
    fn push_opposite(&self, vertex: u32, triangle: u32, stack: &mut Vec<(u32, u32)>) {
        let t = &self.triangles[triangle as usize];
        for slot in 0..3 {
            let (a, b) = t.edge(slot);
            if a == vertex || b == vertex {
                continue;
            }
            if let Some(neighbor) = self.registry.other_owner(ordered_edge(a, b), triangle) {
                stack.push((neighbor, triangle));
            }
        }
    }

    /// Swap diagonals until no neighbor of the fan around `vertex` has it inside its
    /// circumcircle.
    fn legalize(&mut self, vertex: u32, stack: &mut Vec<(u32, u32)>) {
        let p = self.point(vertex);
        while let Some((neighbor, triangle)) = stack.pop() {
            let t = &self.triangles[triangle as usize];
            if !t.contains_vertex(vertex) || !t.adjacent.contains(&neighbor) {
                continue;
            }

            let [n1, n2, n3] = self.triangle_points(neighbor);
            if is_point_in_circumcircle(p, n1, n2, n3) && self.swap_diagonal(neighbor, triangle)
            {
                self.push_opposite(vertex, neighbor, stack);
                self.push_opposite(vertex, triangle, stack);
            }
        }
    }

    // Constraint insertion

    fn insert_constraints(&mut self, edges: &[ConstraintEdge]) -> TriangulationResult<()> {
        let resolved: Vec<Edge> = edges
            .iter()
            .map(|e| {
                ordered_edge(
                    self.alias[e.start as usize],
                    self.alias[e.end as usize],
                )
            })
            .filter(|(a, b)| a != b)
            .collect();
        self.constrained.extend(resolved.iter().copied());

        for (a, b) in resolved {
            if self.registry.contains((a, b)) {
                continue;
            }
            self.insert_constraint(a, b)?;
        }
        Ok(())
    }

    /// A triangle having `vertex` as a corner.
    fn find_incident(&self, vertex: u32) -> Option<u32> {
        let p = self.point(vertex);
        let mut current = self.last_formed;
        for _ in 0..self.triangles.len() {
            if current == NO_INDEX {
                break;
            }
            if self.triangles[current as usize].contains_vertex(vertex) {
                return Some(current);
            }
            current = self.next_toward(p, current);
        }

        tracing::warn!("Walk toward vertex {} failed. Falling back to linear scan", vertex);
        self.triangles
            .iter()
            .position(|t| t.contains_vertex(vertex))
            .map(|t| t as u32)
    }

    fn check_crossing(&self, edge: Edge, crossed: Edge) -> TriangulationResult<()> {
        if !self.config.permit_self_intersections && self.constrained.contains(&crossed) {
            tracing::warn!(
                "Constraint edge {:?} intersects constraint edge {:?}",
                edge,
                crossed
            );
            return Err(TriangulationError::SelfIntersection { edge, crossed });
        }
        Ok(())
    }

    fn crosses(&self, edge: Edge, other: Edge) -> bool {
        segments_intersect(
            self.point(edge.0),
            self.point(edge.1),
            self.point(other.0),
            self.point(other.1),
        )
    }

    /// Edges of the current triangulation strictly crossed by `a-b`, in order from `a`.
    fn find_crossings(&self, a: u32, b: u32) -> TriangulationResult<Vec<Edge>> {
        let edge = (a, b);
        let mut crossings = Vec::new();
        let Some(start) = self.find_incident(a) else {
            tracing::warn!(
                "Unable to find any triangle containing vertex {}. Constraint edge {:?} will be missing",
                a,
                edge
            );
            return Err(TriangulationError::ConstraintMissing { edge });
        };

        // Circle around `a` until the edge opposite it is crossed.
        let mut current = start;
        let mut previous = NO_INDEX;
        let mut next_in_walk = NO_INDEX;
        for _ in 0..self.triangles.len() {
            let t = &self.triangles[current as usize];
            let Some(k) = t.position_of(a) else {
                break;
            };
            let opposite = t.edge((k + 1) % 3);
            let opposite = ordered_edge(opposite.0, opposite.1);
            if self.crosses(edge, opposite) {
                self.check_crossing(edge, opposite)?;
                crossings.push(opposite);
                next_in_walk = t.adjacent[(k + 1) % 3];
                break;
            }

            let next = if t.adjacent[k] != previous && t.adjacent[k] != NO_INDEX {
                t.adjacent[k]
            } else {
                t.adjacent[(k + 2) % 3]
            };
            previous = current;
            current = next;
            if current == start || current == NO_INDEX {
                break;
            }
        }

        // March toward `b` through the crossed edges.
        let pb = self.point(b);
        let mut current = next_in_walk;
        let mut steps = 0;
        while current != NO_INDEX {
            steps += 1;
            if steps > self.triangles.len() {
                return Err(TriangulationError::Stalled { edge });
            }

            let mut next = NO_INDEX;
            for (neighbor, visible) in self.visible_neighbors(pb, current) {
                if visible.0 != a && visible.1 != a && self.crosses(edge, visible) {
                    self.check_crossing(edge, visible)?;
                    crossings.push(visible);
                    next = neighbor;
                    break;
                }
            }
            current = next;
        }

        if self.config.validate_results {
            self.validate_crossings(edge, &crossings)?;
        }

        Ok(crossings)
    }

    /// Compare walked crossings against every registered edge.
    fn validate_crossings(&self, edge: Edge, found: &[Edge]) -> TriangulationResult<()> {
        let (a, b) = edge;
        let mut brute = Vec::new();
        for other in self.registry.edges() {
            if other.0 == a || other.1 == a || other.0 == b || other.1 == b {
                continue;
            }
            if self.crosses(edge, other) {
                self.check_crossing(edge, other)?;
                brute.push(other);
            }
        }

        let missing = brute.iter().find(|e| !found.contains(e));
        let extra = found.iter().find(|e| !brute.contains(e));
        if let Some(other) = missing.or(extra) {
            tracing::warn!(
                "Crossing edge {:?} of constraint {:?} differs between walk and brute force",
                other,
                edge
            );
            return Err(TriangulationError::InconsistentCrossings { edge });
        }
        Ok(())
    }

    fn insert_constraint(&mut self, a: u32, b: u32) -> TriangulationResult<()> {
        let edge = (a, b);
        let mut crossings = self.find_crossings(a, b)?;
        tracing::trace!("Constraint {:?} crosses {} edges", edge, crossings.len());

        // Swap crossed diagonals away. A new diagonal that still crosses goes back
        // into the list; the others are kept for the Delaunay pass.
        let mut created: Vec<Edge> = Vec::new();
        let mut pos = 0;
        let mut progressed = false;
        let max_iterations = 64 + 16 * crossings.len() * crossings.len();
        let mut iterations = 0;
        while !crossings.is_empty() {
            iterations += 1;
            if iterations > max_iterations {
                tracing::warn!("Gave up swapping diagonals for constraint {:?}", edge);
                return Err(TriangulationError::Stalled { edge });
            }
            if pos >= crossings.len() {
                if !progressed {
                    tracing::warn!(
                        "Looped through {} crossing edges of {:?} with no changes",
                        crossings.len(),
                        edge
                    );
                    return Err(TriangulationError::Stalled { edge });
                }
                pos = 0;
                progressed = false;
            }

            let crossed = crossings[pos];
            let Some((t1, t2)) = self.registry.owners(crossed) else {
                return Err(TriangulationError::Stalled { edge });
            };
            if !self.is_convex(t1, t2) {
                pos += 1;
                continue;
            }

            progressed = true;
            self.swap_diagonal(t1, t2);
            let [d0, d1, _] = self.triangles[t1 as usize].vertices;
            let diagonal = ordered_edge(d0, d1);
            let touches_end = [a, b].contains(&diagonal.0) || [a, b].contains(&diagonal.1);
            if !touches_end && self.crosses(edge, diagonal) {
                crossings[pos] = diagonal;
                pos += 1;
            } else {
                crossings.remove(pos);
                if diagonal != edge && !created.contains(&diagonal) {
                    created.push(diagonal);
                }
            }
        }

        self.restore_delaunay(&created);

        if !self.registry.contains(edge) {
            tracing::warn!("Unable to produce triangulation with edge {:?}", edge);
            return Err(TriangulationError::ConstraintMissing { edge });
        }
        Ok(())
    }

    fn is_locally_delaunay(&self, t1: u32, t2: u32) -> bool {
        let [a1, a2, a3] = self.triangle_points(t1);
        let [b1, b2, b3] = self.triangle_points(t2);
        [a1, a2, a3]
            .into_iter()
            .all(|p| !is_point_in_circumcircle(p, b1, b2, b3))
            && [b1, b2, b3]
                .into_iter()
                .all(|p| !is_point_in_circumcircle(p, a1, a2, a3))
    }

    /// Swap the newly created diagonals that violate the Delaunay property.
    fn restore_delaunay(&mut self, created: &[Edge]) {
        for &diagonal in created {
            if self.constrained.contains(&diagonal) {
                continue;
            }
            let Some((t1, t2)) = self.registry.owners(diagonal) else {
                continue;
            };
            if !self.is_locally_delaunay(t1, t2) && self.is_convex(t1, t2) {
                self.swap_diagonal(t1, t2);
            }
        }
    }

    fn finalize(mut self) -> Vec<Triangle> {
        let super_start = self.super_start;
        for triangle in &mut self.triangles {
            triangle.is_valid = triangle.vertices.iter().all(|&v| v < super_start);
            triangle.last_seen_vertex = NO_INDEX;
        }
        tracing::debug!(
            "Triangulated {} vertices into {} triangles ({} edges)",
            super_start,
            self.triangles.len(),
            self.registry.len()
        );
        self.triangles
    }
}

/// Map the points into the unit square. A zero extent maps to 1.
fn normalize(points: &mut [Vec2]) {
    let Some(bounds) = Rect::from_points(points.iter().copied()) else {
        return;
    };
    let mut extent = bounds.size();
    if extent.x == 0.0 {
        extent.x = 1.0;
    }
    if extent.y == 0.0 {
        extent.y = 1.0;
    }
    for p in points {
        *p = (*p - bounds.min) / extent;
    }
}
