//! Helpers for reading debug switches from the environment.

/// Reads an integer environment switch; any non-zero value enables it.
///
/// Unset, empty or non-numeric values count as disabled.
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<i64>().ok())
        .is_some_and(|value| value != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_flag_is_off() {
        assert!(!env_flag("QUILL_TEST_FLAG_THAT_IS_NEVER_SET"));
    }
}
