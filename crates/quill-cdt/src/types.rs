use crate::Edge;
use glam::Vec2;

/// Sentinel for "no triangle" and "no vertex".
pub const NO_INDEX: u32 = u32::MAX;

/// Order a vertex pair so the smaller index comes first.
#[inline]
pub fn ordered_edge(a: u32, b: u32) -> Edge {
    if a <= b { (a, b) } else { (b, a) }
}

/// An input point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub point: Vec2,
    /// Caller-defined identifier, carried through untouched.
    pub id: u32,
}

impl Vertex {
    pub fn new(point: Vec2, id: u32) -> Self {
        Self { point, id }
    }
}

/// An edge that must be present in the triangulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintEdge {
    pub start: u32,
    pub end: u32,
}

impl ConstraintEdge {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn ordered(&self) -> Edge {
        ordered_edge(self.start, self.end)
    }
}

/// A triangle of the triangulation.
///
/// Vertices are indices into the input vertex list, in counter-clockwise order.
/// `adjacent[0]` is the triangle across `vertices[0]-vertices[1]`, `adjacent[1]` across
/// `vertices[1]-vertices[2]` and `adjacent[2]` across `vertices[2]-vertices[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub vertices: [u32; 3],
    pub adjacent: [u32; 3],
    /// `false` for triangles touching the super-triangle.
    pub is_valid: bool,
    /// Vertex whose point location last visited this triangle.
    pub(crate) last_seen_vertex: u32,
}

impl Triangle {
    pub fn new(v0: u32, v1: u32, v2: u32) -> Self {
        Self {
            vertices: [v0, v1, v2],
            adjacent: [NO_INDEX; 3],
            is_valid: true,
            last_seen_vertex: NO_INDEX,
        }
    }

    pub fn contains_vertex(&self, vertex: u32) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Position of `vertex` in [`Triangle::vertices`].
    pub fn position_of(&self, vertex: u32) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// The edge opposite `adjacent[slot]`, in triangle order.
    pub fn edge(&self, slot: usize) -> (u32, u32) {
        (self.vertices[slot], self.vertices[(slot + 1) % 3])
    }

    pub fn neighbor(&self, slot: usize) -> Option<u32> {
        let n = self.adjacent[slot];
        (n != NO_INDEX).then_some(n)
    }

    /// Slot of the edge between `a` and `b`, in either direction.
    pub fn slot_of_edge(&self, a: u32, b: u32) -> Option<usize> {
        (0..3).find(|&slot| {
            let (v0, v1) = self.edge(slot);
            (v0 == a && v1 == b) || (v0 == b && v1 == a)
        })
    }

    /// The three edges, each ordered smaller index first.
    pub fn ordered_edges(&self) -> [Edge; 3] {
        [0, 1, 2].map(|slot| {
            let (a, b) = self.edge(slot);
            ordered_edge(a, b)
        })
    }
}
