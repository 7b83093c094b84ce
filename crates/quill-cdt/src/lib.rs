//! Quill CDT - constrained Delaunay triangulation
//!
//! Triangulates a point set enclosed by a super-triangle and forces a set of
//! constraint edges into the result.
//!
//! The last three input vertices must form the super-triangle. Use
//! [`super_triangle`] to compute one for an arbitrary point set:
//!
//! ```
//! use glam::Vec2;
//! use quill_cdt::{ConstraintEdge, Vertex, super_triangle, triangulate};
//!
//! let points = [
//!     Vec2::new(0.0, 0.0),
//!     Vec2::new(1.0, 0.0),
//!     Vec2::new(1.0, 1.0),
//!     Vec2::new(0.0, 1.0),
//! ];
//! let corners = super_triangle(points).unwrap();
//!
//! let vertices: Vec<Vertex> = points
//!     .iter()
//!     .chain(corners.iter())
//!     .enumerate()
//!     .map(|(i, &p)| Vertex::new(p, i as u32))
//!     .collect();
//! let edges = [ConstraintEdge::new(0, 2)];
//!
//! let triangles = triangulate(&vertices, &edges).unwrap();
//! let inner: Vec<_> = triangles.iter().filter(|t| t.is_valid).collect();
//! assert_eq!(inner.len(), 2);
//! ```

mod config;
mod error;
mod predicates;
mod registry;
mod super_triangle;
mod triangulator;
mod types;

pub use config::*;
pub use error::*;
pub use super_triangle::*;
pub use triangulator::{Phase, triangulate, triangulate_with_config};
pub use types::*;
