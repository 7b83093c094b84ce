//! Quill Core
//!
//! Shared math, geometric predicates, logging and profiling used by the
//! quill path and triangulation crates.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod math;
pub mod predicates;
pub mod profiling;
