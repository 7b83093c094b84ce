//! Test utilities for Quill.
//!
//! Shared fixtures (paths, point sets) and invariant checks for triangulations,
//! used by the integration tests and benchmarks of the other crates.
//!
//! # Example
//!
//! ```rust
//! use quill_cdt::triangulate;
//! use quill_test_utils::{assert_adjacency_consistent, random_points, with_super_triangle};
//!
//! let vertices = with_super_triangle(&random_points(32, 7));
//! let triangles = triangulate(&vertices, &[]).unwrap();
//! assert_adjacency_consistent(&triangles);
//! ```

mod fixtures;
mod triangulation;

pub use fixtures::*;
pub use triangulation::*;
