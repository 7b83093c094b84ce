//! Quill Path - quadratic path model
//!
//! This crate provides:
//! - A source path builder with lines, quadratic and cubic curves
//! - [`QuadPath`], a normalized path made only of lines and quadratic segments
//! - Adaptive cubic-to-quadratic flattening
//! - Winding based point containment and per-element curvature classification
//! - Dashing of quadratic paths
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use quill_path::{PathBuilder, QuadPath};
//!
//! let mut builder = PathBuilder::new();
//! builder.circle(Vec2::new(50.0, 50.0), 25.0);
//! let path = builder.build();
//!
//! let mut quads = QuadPath::from_source_path(&path).sub_paths_closed();
//! quads.add_curvature_data();
//!
//! assert!(quads.contains(Vec2::new(50.0, 50.0)));
//! assert!(!quads.contains(Vec2::new(0.0, 0.0)));
//! ```

// Source geometry
mod curve;
mod fill;
mod path;
mod transform;

// Quadratic path model
mod config;
mod curvature;
mod dash;
mod element;
mod flatten;
mod quad_path;

pub use curve::*;
pub use fill::*;
pub use path::*;
pub use transform::*;

pub use config::*;
pub use dash::*;
pub use element::*;
pub use quad_path::*;
