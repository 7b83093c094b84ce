use glam::Vec2;
use quill_cdt::{NO_INDEX, Triangle, Vertex, ordered_edge};
use std::collections::HashMap;

/// Returns `true` if any triangle has `a-b` as an edge.
pub fn has_edge(triangles: &[Triangle], a: u32, b: u32) -> bool {
    triangles.iter().any(|t| t.slot_of_edge(a, b).is_some())
}

/// Checks that every adjacency entry is mirrored by the neighbor and that every
/// edge is owned by at most two triangles.
pub fn assert_adjacency_consistent(triangles: &[Triangle]) {
    let mut owners: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (i, t) in triangles.iter().enumerate() {
        for edge in t.ordered_edges() {
            owners.entry(edge).or_default().push(i);
        }
    }

    for (edge, list) in &owners {
        assert!(list.len() <= 2, "edge {edge:?} owned by {list:?}");
    }

    for (i, t) in triangles.iter().enumerate() {
        for slot in 0..3 {
            let (a, b) = t.edge(slot);
            let shared = &owners[&ordered_edge(a, b)];
            let expected = shared.iter().copied().find(|&o| o != i);
            match expected {
                Some(other) => assert_eq!(
                    t.adjacent[slot], other as u32,
                    "triangle {i} slot {slot} should point at {other}"
                ),
                None => assert_eq!(
                    t.adjacent[slot], NO_INDEX,
                    "triangle {i} slot {slot} has a dangling neighbor"
                ),
            }
        }
    }
}

/// Checks that all triangles are counter-clockwise and non-degenerate.
pub fn assert_counter_clockwise(vertices: &[Vertex], triangles: &[Triangle]) {
    for (i, t) in triangles.iter().enumerate() {
        let [a, b, c] = t.vertices.map(|v| vertices[v as usize].point);
        assert!(
            (b - a).perp_dot(c - a) > 0.0,
            "triangle {i} {:?} is not counter-clockwise",
            t.vertices
        );
    }
}

/// Checks the empty circumcircle property across every unconstrained edge shared by
/// two valid triangles.
///
/// `tolerance` is relative to the squared circumradius.
pub fn assert_delaunay(
    vertices: &[Vertex],
    triangles: &[Triangle],
    constraints: &[(u32, u32)],
    tolerance: f32,
) {
    let constrained: Vec<(u32, u32)> = constraints
        .iter()
        .map(|&(a, b)| ordered_edge(a, b))
        .collect();

    for (i, t) in triangles.iter().enumerate().filter(|(_, t)| t.is_valid) {
        let [a, b, c] = t.vertices.map(|v| vertices[v as usize].point);
        let Some((center, radius_sq)) = circumcircle(a, b, c) else {
            continue;
        };

        for slot in 0..3 {
            let (ea, eb) = t.edge(slot);
            if constrained.contains(&ordered_edge(ea, eb)) {
                continue;
            }
            let Some(neighbor) = t.neighbor(slot) else {
                continue;
            };
            let n = &triangles[neighbor as usize];
            if !n.is_valid {
                continue;
            }
            let Some(opposite) = n.vertices.iter().copied().find(|&v| v != ea && v != eb)
            else {
                continue;
            };
            let p = vertices[opposite as usize].point;
            assert!(
                p.distance_squared(center) >= radius_sq * (1.0 - tolerance),
                "vertex {opposite} lies inside the circumcircle of triangle {i} {:?}",
                t.vertices
            );
        }
    }
}

fn circumcircle(a: Vec2, b: Vec2, c: Vec2) -> Option<(Vec2, f32)> {
    let (a, b, c) = (a.as_dvec2(), b.as_dvec2(), c.as_dvec2());
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return None;
    }
    let (a2, b2, c2) = (a.length_squared(), b.length_squared(), c.length_squared());
    let center = glam::DVec2::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );
    Some((center.as_vec2(), center.distance_squared(a) as f32))
}
