//! Fill tessellation.
//!
//! A path is converted to a [`QuadPath`], its outline becomes the constraint set of a
//! Delaunay triangulation, and the triangles inside the fill form the mesh. Convex
//! curves bulge out of that mesh and are returned separately so they can be covered
//! per fragment; concave curves keep their control point in the outline.

use crate::vertex::{FillVertex, TessellatedMesh};
use glam::Vec2;
use quill_cdt::{
    ConstraintEdge, TriangulationResult, TriangulatorConfig, Vertex, super_triangle,
    triangulate_with_config,
};
use quill_core::alloc::HashMap;
use quill_path::{Element, Path, PathConfig, QuadPath};

/// Result of tessellating a fill.
#[derive(Debug, Clone, Default)]
pub struct FillGeometry {
    /// Triangles covering the interior, curve regions excluded.
    pub mesh: TessellatedMesh<FillVertex>,
    /// Curve elements, with curvature data, whose area lies outside the mesh.
    pub curves: Vec<Element>,
}

impl FillGeometry {
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty() && self.curves.is_empty()
    }
}

/// Tessellator for filling paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillTessellator {
    pub path_config: PathConfig,
    pub triangulator_config: TriangulatorConfig,
}

impl FillTessellator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tessellator with debug switches read from the environment.
    pub fn from_env() -> Self {
        Self {
            path_config: PathConfig::from_env(),
            triangulator_config: TriangulatorConfig::from_env(),
        }
    }

    pub fn with_config(path_config: PathConfig, triangulator_config: TriangulatorConfig) -> Self {
        Self {
            path_config,
            triangulator_config,
        }
    }

    /// Tessellate a path for filling. A path that cannot be triangulated, for
    /// example one that intersects itself, is skipped with a warning.
    pub fn tessellate_fill(&self, path: &Path) -> FillGeometry {
        match self.try_tessellate_fill(path) {
            Ok(geometry) => geometry,
            Err(err) => {
                tracing::warn!("Fill tessellation failed: {}", err);
                FillGeometry::default()
            }
        }
    }

    /// Tessellate a path for filling, reporting triangulation failures.
    pub fn try_tessellate_fill(&self, path: &Path) -> TriangulationResult<FillGeometry> {
        puffin::profile_function!();

        let mut quads =
            QuadPath::from_source_path_with_config(path, self.path_config).sub_paths_closed();
        quads.add_curvature_data();
        self.try_tessellate_quad_path(&quads)
    }

    /// Tessellate a closed path that already carries curvature data.
    pub fn try_tessellate_quad_path(&self, quads: &QuadPath) -> TriangulationResult<FillGeometry> {
        let outline = Outline::from_quad_path(quads);
        let curves: Vec<Element> = quads
            .elements()
            .iter()
            .filter(|e| !e.is_line())
            .copied()
            .collect();

        let Some(corners) = super_triangle(outline.points.iter().copied()) else {
            return Ok(FillGeometry {
                mesh: TessellatedMesh::new(),
                curves,
            });
        };

        let vertices: Vec<Vertex> = outline
            .points
            .iter()
            .chain(corners.iter())
            .enumerate()
            .map(|(i, &p)| Vertex::new(p, i as u32))
            .collect();
        let triangles =
            triangulate_with_config(&vertices, &outline.edges, &self.triangulator_config)?;

        let mut indices = Vec::with_capacity(3 * triangles.len());
        for triangle in triangles.iter().filter(|t| t.is_valid) {
            let [a, b, c] = triangle.vertices;
            let centroid = (vertices[a as usize].point
                + vertices[b as usize].point
                + vertices[c as usize].point)
                / 3.0;
            if quads.contains(centroid) {
                indices.extend_from_slice(&triangle.vertices);
            }
        }

        tracing::trace!(
            "Filled {} outline points with {} triangles and {} curves",
            outline.points.len(),
            indices.len() / 3,
            curves.len()
        );

        let vertices = outline.points.into_iter().map(FillVertex::from).collect();
        Ok(FillGeometry {
            mesh: TessellatedMesh::from_data(vertices, indices),
            curves,
        })
    }
}

/// De-duplicated outline points and the boundary edges between them.
struct Outline {
    points: Vec<Vec2>,
    edges: Vec<ConstraintEdge>,
}

impl Outline {
    fn from_quad_path(quads: &QuadPath) -> Self {
        let mut outline = Outline {
            points: Vec::new(),
            edges: Vec::new(),
        };
        let mut lookup: HashMap<[u32; 2], u32> = HashMap::new();
        let mut ring: Vec<u32> = Vec::new();

        for element in quads.elements() {
            if element.is_subpath_start() {
                outline.close_ring(&ring);
                ring.clear();
            }
            ring.push(outline.intern(&mut lookup, element.start_point()));
            if !element.is_line() && !element.is_convex() {
                ring.push(outline.intern(&mut lookup, element.control_point()));
            }
        }
        outline.close_ring(&ring);
        outline
    }

    fn intern(&mut self, lookup: &mut HashMap<[u32; 2], u32>, p: Vec2) -> u32 {
        *lookup.entry([p.x.to_bits(), p.y.to_bits()]).or_insert_with(|| {
            self.points.push(p);
            self.points.len() as u32 - 1
        })
    }

    fn close_ring(&mut self, ring: &[u32]) {
        if ring.len() < 2 {
            return;
        }
        for (i, &start) in ring.iter().enumerate() {
            let end = ring[(i + 1) % ring.len()];
            if start != end {
                self.edges.push(ConstraintEdge::new(start, end));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_path::PathBuilder;

    fn triangle_area(mesh: &TessellatedMesh<FillVertex>) -> f32 {
        mesh.triangles()
            .map(|[a, b, c]| {
                let (a, b, c) = (
                    mesh.vertices[a as usize].point(),
                    mesh.vertices[b as usize].point(),
                    mesh.vertices[c as usize].point(),
                );
                0.5 * (b - a).perp_dot(c - a).abs()
            })
            .sum()
    }

    #[test]
    fn test_empty_path() {
        let fill = FillTessellator::new().tessellate_fill(&Path::new());
        assert!(fill.is_empty());
    }

    #[test]
    fn test_rectangle() {
        let mut builder = PathBuilder::new();
        builder.rect(Vec2::new(10.0, 10.0), Vec2::new(100.0, 50.0));
        let fill = FillTessellator::new().tessellate_fill(&builder.build());

        assert_eq!(fill.mesh.vertex_count(), 4);
        assert_eq!(fill.mesh.triangle_count(), 2);
        assert!(fill.curves.is_empty());
        assert!((triangle_area(&fill.mesh) - 5000.0).abs() < 1e-2);
    }

    #[test]
    fn test_concave_polygon_excludes_notch() {
        // U shape: the notch between the arms must stay empty.
        let mut builder = PathBuilder::new();
        builder.polygon(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(30.0, 0.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(20.0, 30.0),
            Vec2::new(20.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 30.0),
            Vec2::new(0.0, 30.0),
        ]);
        let fill = FillTessellator::new().tessellate_fill(&builder.build());

        assert_eq!(fill.mesh.triangle_count(), 6);
        assert!((triangle_area(&fill.mesh) - 700.0).abs() < 1e-2);
    }

    #[test]
    fn test_circle_curves_are_returned() {
        let mut builder = PathBuilder::new();
        builder.circle(Vec2::new(50.0, 50.0), 40.0);
        let fill = FillTessellator::new().tessellate_fill(&builder.build());

        assert!(!fill.curves.is_empty());
        assert!(fill.curves.iter().all(|e| e.is_convex()));
        // The inner polygon has one corner per curve.
        assert_eq!(fill.mesh.vertex_count(), fill.curves.len());
        assert_eq!(fill.mesh.triangle_count(), fill.curves.len() - 2);
    }

    #[test]
    fn test_self_intersecting_path_is_skipped() {
        let mut builder = PathBuilder::new();
        builder.polygon(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ]);
        let path = builder.build();
        let tessellator = FillTessellator::new();

        assert!(tessellator.try_tessellate_fill(&path).is_err());
        assert!(tessellator.tessellate_fill(&path).mesh.is_empty());
    }
}
