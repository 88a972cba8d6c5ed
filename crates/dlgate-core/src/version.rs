//! OS API level and the fallback eligibility gate.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Platform API level (Android SDK integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiLevel(pub u32);

/// First API level whose linker namespaces reject direct loads of
/// non-public system libraries (Android 7.0).
///
/// The linker's `__loader_dlopen` entry only exists from API 26, so on 24 and
/// 25 an eligible fallback still ends in
/// [`LoadError::FallbackResolutionFailed`](crate::LoadError::FallbackResolutionFailed).
pub const RESTRICTION_THRESHOLD: ApiLevel = ApiLevel(24);

impl ApiLevel {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn is_restricted(self) -> bool {
        self >= RESTRICTION_THRESHOLD
    }
}

impl FromStr for ApiLevel {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

impl fmt::Display for ApiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of checking whether a failed primary load may use the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackGate {
    /// At or above the threshold; the failure may be policy enforcement.
    Eligible(ApiLevel),
    /// Below the threshold; no restriction exists to route around.
    BelowThreshold(ApiLevel),
    /// The platform reports no API level, so it is not a restricted one.
    Unknown,
}

impl FallbackGate {
    #[must_use]
    pub fn evaluate(level: Option<ApiLevel>) -> Self {
        match level {
            Some(level) if level.is_restricted() => Self::Eligible(level),
            Some(level) => Self::BelowThreshold(level),
            None => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(
            FallbackGate::evaluate(Some(ApiLevel(24))),
            FallbackGate::Eligible(ApiLevel(24))
        );
        assert_eq!(
            FallbackGate::evaluate(Some(ApiLevel(23))),
            FallbackGate::BelowThreshold(ApiLevel(23))
        );
        assert!(matches!(
            FallbackGate::evaluate(Some(ApiLevel(34))),
            FallbackGate::Eligible(_)
        ));
    }

    #[test]
    fn unknown_level_is_never_eligible() {
        assert_eq!(FallbackGate::evaluate(None), FallbackGate::Unknown);
    }

    #[test]
    fn parse_api_level() {
        assert_eq!("28".parse::<ApiLevel>(), Ok(ApiLevel(28)));
        assert_eq!(" 30\n".parse::<ApiLevel>(), Ok(ApiLevel(30)));
        assert!("".parse::<ApiLevel>().is_err());
        assert!("P".parse::<ApiLevel>().is_err());
        assert_eq!(ApiLevel(29).to_string(), "29");
    }
}
