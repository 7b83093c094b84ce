//! Fill rules.
//!
//! Fill rules determine how to decide which areas are "inside" a path.

/// Fill rule for determining interior of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Non-zero winding rule (default).
    ///
    /// A point is inside if the winding number is non-zero.
    #[default]
    NonZero,
    /// Even-odd (parity) rule.
    ///
    /// A point is inside if the number of crossings is odd.
    EvenOdd,
}

impl FillRule {
    /// Apply the rule to an accumulated winding number.
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

impl std::fmt::Display for FillRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FillRule::NonZero => write!(f, "NonZero"),
            FillRule::EvenOdd => write!(f, "EvenOdd"),
        }
    }
}
