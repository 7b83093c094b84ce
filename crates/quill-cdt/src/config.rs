use quill_core::config::env_flag;

/// Debug switches for [`triangulate_with_config`](crate::triangulate_with_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriangulatorConfig {
    /// Cross-check the visibility walks against brute force searches.
    pub validate_results: bool,
    /// Let constraint edges cross each other instead of failing.
    pub permit_self_intersections: bool,
    /// Rescale all vertices into the unit square before triangulating.
    pub normalize_coordinates: bool,
}

impl TriangulatorConfig {
    pub const VALIDATE_VAR: &'static str = "QUILL_CDT_VALIDATE";
    pub const PERMIT_SELF_INTERSECTIONS_VAR: &'static str = "QUILL_CDT_PERMIT_SELF_INTERSECTIONS";
    pub const NORMALIZE_COORDINATES_VAR: &'static str = "QUILL_CDT_NORMALIZE_COORDINATES";

    /// Read every switch from its environment variable.
    pub fn from_env() -> Self {
        TriangulatorConfig {
            validate_results: env_flag(Self::VALIDATE_VAR),
            permit_self_intersections: env_flag(Self::PERMIT_SELF_INTERSECTIONS_VAR),
            normalize_coordinates: env_flag(Self::NORMALIZE_COORDINATES_VAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_off() {
        let config = TriangulatorConfig::default();
        assert!(!config.validate_results);
        assert!(!config.permit_self_intersections);
        assert!(!config.normalize_coordinates);
    }
}
