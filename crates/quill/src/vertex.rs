//! Vertex formats for tessellated fills.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Vertex for filled geometry.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FillVertex {
    /// Position in 2D space
    pub position: [f32; 2],
}

impl FillVertex {
    pub fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }

    pub fn point(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }
}

impl From<Vec2> for FillVertex {
    fn from(p: Vec2) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Output from tessellation: vertices and indices.
#[derive(Debug, Clone, Default)]
pub struct TessellatedMesh<V> {
    /// Vertex data
    pub vertices: Vec<V>,
    /// Index data, three per triangle
    pub indices: Vec<u32>,
}

impl<V> TessellatedMesh<V> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn from_data(vertices: Vec<V>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate the triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Raw vertex bytes for buffer upload.
    pub fn vertex_bytes(&self) -> &[u8]
    where
        V: Pod,
    {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_vertex_size() {
        assert_eq!(std::mem::size_of::<FillVertex>(), 8);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh: TessellatedMesh<FillVertex> = TessellatedMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_mesh_bytes() {
        let mesh = TessellatedMesh::from_data(
            vec![
                FillVertex::new(0.0, 0.0),
                FillVertex::new(1.0, 0.0),
                FillVertex::from(Vec2::new(0.0, 1.0)),
            ],
            vec![0, 1, 2],
        );
        assert_eq!(mesh.vertex_bytes().len(), 24);
        assert_eq!(mesh.index_bytes().len(), 12);
        assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[0, 1, 2]]);
        assert_eq!(mesh.vertices[2].point(), Vec2::new(0.0, 1.0));
    }
}
