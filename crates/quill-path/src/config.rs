use quill_core::config::env_flag;

/// Numeric tolerances used when building and classifying a [`QuadPath`](crate::QuadPath).
///
/// The defaults are tuned for coordinates in logical pixels. They only affect
/// visual smoothness, not correctness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathConfig {
    /// Allowed flattening error relative to the diagonal of a cubic's control polygon bounds.
    pub flatten_error_limit: f32,
    /// A quadratic whose control point is closer to its chord than this fraction of the
    /// chord length is stored as a line.
    pub near_line_epsilon: f32,
    /// Upper bound for the offset used when probing which side of an element is filled.
    pub convex_check_margin: f32,
    /// Re-test the fill side of every element instead of only the first of each sub-path,
    /// logging elements that disagree with their sub-path.
    pub check_all_curvature: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        PathConfig {
            flatten_error_limit: 0.01,
            near_line_epsilon: 0.01,
            convex_check_margin: 1.0 / 32.0,
            check_all_curvature: false,
        }
    }
}

impl PathConfig {
    /// Environment switch for [`PathConfig::check_all_curvature`].
    pub const CHECK_ALL_CURVATURE_VAR: &'static str = "QUILL_CHECK_ALL_CURVATURE";

    /// Defaults, with debug switches read from the environment.
    pub fn from_env() -> Self {
        PathConfig {
            check_all_curvature: env_flag(Self::CHECK_ALL_CURVATURE_VAR),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PathConfig::default();
        assert_eq!(config.flatten_error_limit, 0.01);
        assert_eq!(config.convex_check_margin, 0.03125);
        assert!(!config.check_all_curvature);
    }
}
