//! Quill - resolution independent 2D path filling
//!
//! Quill turns vector paths into GPU friendly geometry:
//!
//! - **Paths**: [`quill_path`] normalizes lines, quadratics and cubics into a
//!   [`QuadPath`] of lines and quadratic segments
//! - **Triangulation**: [`quill_cdt`] builds a constrained Delaunay triangulation
//!   of the path outline
//! - **Fills**: [`FillTessellator`] combines the two into an indexed mesh plus the
//!   curve elements that need per-fragment coverage
//!
//! # Quick Start
//!
//! ```
//! use glam::Vec2;
//! use quill::{FillTessellator, PathBuilder};
//!
//! let mut builder = PathBuilder::new();
//! builder.rect(Vec2::ZERO, Vec2::new(100.0, 50.0));
//! let path = builder.build();
//!
//! let fill = FillTessellator::new().tessellate_fill(&path);
//! assert_eq!(fill.mesh.triangle_count(), 2);
//! ```

pub mod fill;
pub mod vertex;

pub use fill::{FillGeometry, FillTessellator};
pub use vertex::{FillVertex, TessellatedMesh};

// Re-export sub-crates
pub use quill_cdt as cdt;
pub use quill_core as core;
pub use quill_path as path;

pub use quill_cdt::{TriangulationError, TriangulationResult, TriangulatorConfig};
pub use quill_path::{
    DashPattern, Element, FillRule, Path, PathBuilder, PathConfig, QuadPath, Transform2D,
};
