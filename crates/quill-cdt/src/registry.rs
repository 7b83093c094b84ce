//! Edge to triangle bookkeeping.

use crate::Edge;
use crate::types::{NO_INDEX, ordered_edge};
use quill_core::alloc::HashMap;

/// Maps every edge of the triangulation to the one or two triangles that own it.
#[derive(Debug, Default)]
pub(crate) struct EdgeRegistry {
    edges: HashMap<Edge, [u32; 2]>,
}

impl EdgeRegistry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            edges: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn contains(&self, edge: Edge) -> bool {
        self.edges.contains_key(&edge)
    }

    /// Both owners of an interior edge.
    pub(crate) fn owners(&self, edge: Edge) -> Option<(u32, u32)> {
        match self.edges.get(&edge) {
            Some(&[first, second]) if first != NO_INDEX && second != NO_INDEX => {
                Some((first, second))
            }
            _ => None,
        }
    }

    /// The owner of `edge` other than `triangle`.
    pub(crate) fn other_owner(&self, edge: Edge, triangle: u32) -> Option<u32> {
        let (first, second) = self.owners(edge)?;
        if first == triangle {
            Some(second)
        } else if second == triangle {
            Some(first)
        } else {
            None
        }
    }

    /// Record that `triangle` owns the edge `a-b`. Returns the owner pair once the edge
    /// is shared by two triangles.
    pub(crate) fn insert(&mut self, a: u32, b: u32, triangle: u32) -> Option<(u32, u32)> {
        let owners = self
            .edges
            .entry(ordered_edge(a, b))
            .or_insert([NO_INDEX, NO_INDEX]);
        if owners[0] == NO_INDEX {
            debug_assert_ne!(owners[1], triangle);
            owners[0] = triangle;
        } else {
            debug_assert_eq!(owners[1], NO_INDEX, "edge {a}-{b} already has two owners");
            debug_assert_ne!(owners[0], triangle);
            owners[1] = triangle;
        }

        (owners[0] != NO_INDEX && owners[1] != NO_INDEX).then_some((owners[0], owners[1]))
    }

    /// Record that `triangle` no longer owns the edge `a-b`. Returns the owner pair the
    /// edge had before, if it was shared.
    pub(crate) fn remove(&mut self, a: u32, b: u32, triangle: u32) -> Option<(u32, u32)> {
        let edge = ordered_edge(a, b);
        let owners = self.edges.get_mut(&edge)?;
        let shared = (owners[0] != NO_INDEX && owners[1] != NO_INDEX)
            .then_some((owners[0], owners[1]));

        if owners[0] == triangle {
            owners[0] = NO_INDEX;
        } else if owners[1] == triangle {
            owners[1] = NO_INDEX;
        }
        if owners[0] == NO_INDEX && owners[1] == NO_INDEX {
            self.edges.remove(&edge);
        }

        shared
    }

    pub(crate) fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.keys().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.edges.len()
    }
}
