/// An ordered pair of vertex indices, smaller index first.
pub type Edge = (u32, u32);

/// Errors that can occur during triangulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriangulationError {
    /// Fewer vertices than the super-triangle needs.
    TooFewVertices { count: usize },

    /// A constraint edge references a vertex that does not exist or belongs to the
    /// super-triangle.
    InvalidEdge { start: u32, end: u32 },

    /// No triangle contains the vertex, not even by linear scan.
    PointLocation { vertex: u32 },

    /// Two constraint edges cross each other.
    SelfIntersection { edge: Edge, crossed: Edge },

    /// Diagonal flipping stopped making progress while inserting a constraint.
    Stalled { edge: Edge },

    /// The constraint edge is absent after insertion, typically because a vertex lies
    /// exactly on it.
    ConstraintMissing { edge: Edge },

    /// The crossing edges found by walking disagree with a brute force search.
    InconsistentCrossings { edge: Edge },
}

impl std::fmt::Display for TriangulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriangulationError::TooFewVertices { count } => write!(
                f,
                "Too few vertices: got {}, need at least the 3 super-triangle vertices",
                count
            ),
            TriangulationError::InvalidEdge { start, end } => {
                write!(f, "Invalid constraint edge [{}, {}]", start, end)
            }
            TriangulationError::PointLocation { vertex } => {
                write!(f, "Unable to find any triangle containing vertex {}", vertex)
            }
            TriangulationError::SelfIntersection { edge, crossed } => write!(
                f,
                "Constraint edge [{}, {}] intersects constraint edge [{}, {}]",
                edge.0, edge.1, crossed.0, crossed.1
            ),
            TriangulationError::Stalled { edge } => write!(
                f,
                "Diagonal swapping stalled while inserting constraint edge [{}, {}]",
                edge.0, edge.1
            ),
            TriangulationError::ConstraintMissing { edge } => write!(
                f,
                "Unable to produce triangulation with constraint edge [{}, {}]",
                edge.0, edge.1
            ),
            TriangulationError::InconsistentCrossings { edge } => write!(
                f,
                "Crossing edges of constraint [{}, {}] differ from brute force search",
                edge.0, edge.1
            ),
        }
    }
}

impl std::error::Error for TriangulationError {}

/// Result type for triangulation.
pub type TriangulationResult<T> = Result<T, TriangulationError>;
