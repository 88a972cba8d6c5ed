//! Load failure taxonomy.
//!
//! Every variant is non-fatal: the boolean entry points on
//! [`Loader`](crate::Loader) collapse them to `false` after logging. The
//! `try_*` entry points hand them back intact for callers that want the
//! structured cause.

use thiserror::Error;

use crate::version::ApiLevel;

/// Failure reported by one invocation of a platform load primitive.
///
/// Carries the dynamic linker's own message (`dlerror()` text) verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PrimitiveError {
    pub message: String,
}

impl PrimitiveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a load attempt did not map the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Empty identifier, or one that cannot cross the C boundary. No
    /// primitive was called.
    #[error("invalid library argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// The standard primitive refused and no restricted platform was
    /// detected, so the refusal is final.
    #[error("load of {target} failed: {primary}")]
    PrimaryLoadFailed {
        target: String,
        primary: PrimitiveError,
    },

    /// The standard primitive refused on a platform below the restriction
    /// threshold; the refusal is trusted as genuine.
    #[error("load of {target} failed on api level {api_level}, below fallback threshold: {primary}")]
    FallbackIneligible {
        target: String,
        api_level: ApiLevel,
        primary: PrimitiveError,
    },

    /// The fallback route could not locate the loader or its load entry.
    #[error("fallback for {target} could not be resolved: {cause} (primary: {primary})")]
    FallbackResolutionFailed {
        target: String,
        primary: PrimitiveError,
        cause: PrimitiveError,
    },

    /// The fallback route resolved but the underlying loader still refused.
    #[error("fallback load of {target} failed: {cause} (primary: {primary})")]
    FallbackInvocationFailed {
        target: String,
        primary: PrimitiveError,
        cause: PrimitiveError,
    },
}

impl LoadError {
    /// Stable short name of the variant, for reports and log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::PrimaryLoadFailed { .. } => "primary_load_failed",
            Self::FallbackIneligible { .. } => "fallback_ineligible",
            Self::FallbackResolutionFailed { .. } => "fallback_resolution_failed",
            Self::FallbackInvocationFailed { .. } => "fallback_invocation_failed",
        }
    }

    /// Whether the fallback route was entered before failing.
    #[must_use]
    pub const fn fallback_attempted(&self) -> bool {
        matches!(
            self,
            Self::FallbackResolutionFailed { .. } | Self::FallbackInvocationFailed { .. }
        )
    }

    /// The standard primitive's failure, when one was attempted.
    #[must_use]
    pub fn primary(&self) -> Option<&PrimitiveError> {
        match self {
            Self::InvalidArgument { .. } => None,
            Self::PrimaryLoadFailed { primary, .. }
            | Self::FallbackIneligible { primary, .. }
            | Self::FallbackResolutionFailed { primary, .. }
            | Self::FallbackInvocationFailed { primary, .. } => Some(primary),
        }
    }
}
