//! Environment policy resolved once at startup.

/// Debug vs production disclosure policy.
///
/// Resolved from the environment exactly once and passed by value into
/// both handlers; nothing re-reads `APP_DEBUG` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimePolicy {
    pub debug: bool,
}

impl RuntimePolicy {
    /// Resolve from `APP_DEBUG`. Only the literal `"true"` enables debug.
    pub fn from_env() -> Self {
        let debug = std::env::var("APP_DEBUG")
            .map(|v| v == "true")
            .unwrap_or(false);
        Self { debug }
    }

    pub fn debug() -> Self {
        Self { debug: true }
    }

    pub fn production() -> Self {
        Self { debug: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_literal_true_enables_debug() {
        std::env::set_var("APP_DEBUG", "true");
        assert!(RuntimePolicy::from_env().debug);

        std::env::set_var("APP_DEBUG", "TRUE");
        assert!(!RuntimePolicy::from_env().debug);

        std::env::set_var("APP_DEBUG", "1");
        assert!(!RuntimePolicy::from_env().debug);

        std::env::remove_var("APP_DEBUG");
        assert!(!RuntimePolicy::from_env().debug);
    }
}
