//! Dynamic linking — symbol binding mode.
//!
//! The flag word each mode maps to is platform-specific (32-bit bionic defines
//! `RTLD_NOW` as 0), so the translation lives in the sys crate next to the
//! dlopen call.

use std::fmt;

/// Symbol binding mode used for both load tiers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadMode {
    /// Resolve function symbols on first call.
    Lazy,
    /// Resolve every symbol before the load returns.
    #[default]
    Now,
}

impl LoadMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lazy => "lazy",
            Self::Now => "now",
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_eagerly_by_default() {
        assert_eq!(LoadMode::default(), LoadMode::Now);
    }

    #[test]
    fn mode_names() {
        assert_eq!(LoadMode::Lazy.as_str(), "lazy");
        assert_eq!(LoadMode::Now.to_string(), "now");
    }
}
