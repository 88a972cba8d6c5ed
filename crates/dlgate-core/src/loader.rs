//! Two-tier library loader.
//!
//! Each request tries the platform's standard load primitive first. When that
//! fails on a platform at or above [`RESTRICTION_THRESHOLD`], the same request
//! is sent once through the linker's unchecked entry point. Below the
//! threshold, or on platforms that report no API level, the primary failure is
//! final.
//!
//! The boolean entry points never fail outward: every [`LoadError`] is logged
//! and collapsed to `false`.
//!
//! [`RESTRICTION_THRESHOLD`]: crate::version::RESTRICTION_THRESHOLD

use std::ffi::CString;

use tracing::{debug, error, warn};

use crate::dlfcn::LoadMode;
use crate::error::LoadError;
use crate::platform::Platform;
use crate::target::{LibraryName, LibraryPath, Target};
use crate::version::FallbackGate;

/// Which tier mapped the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadRoute {
    /// The standard primitive accepted the request.
    Primary,
    /// The standard primitive refused; the fallback entry accepted it.
    Fallback,
}

impl LoadRoute {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
        }
    }
}

/// Stateless loader over a [`Platform`].
#[derive(Debug, Clone)]
pub struct Loader<P> {
    platform: P,
    mode: LoadMode,
}

impl<P: Platform> Loader<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            mode: LoadMode::default(),
        }
    }

    /// Use `mode` for both tiers.
    #[must_use]
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Map the library at `path`. Returns `false` on any failure.
    pub fn load_by_path(&self, path: &str) -> bool {
        settle(self.try_load_by_path(path))
    }

    /// Map the library the OS resolves for `name`. Returns `false` on any
    /// failure.
    pub fn load_by_name(&self, name: &str) -> bool {
        settle(self.try_load_by_name(name))
    }

    pub fn try_load_by_path(&self, path: &str) -> Result<LoadRoute, LoadError> {
        let path = LibraryPath::new(path)?;
        self.load(Target::Path(&path)).map(|(route, _)| route)
    }

    pub fn try_load_by_name(&self, name: &str) -> Result<LoadRoute, LoadError> {
        let name = LibraryName::new(name)?;
        self.load(Target::Name(&name)).map(|(route, _)| route)
    }

    /// Load `target` and report whether it exports `symbol`. Returns `false`
    /// on any failure.
    pub fn probe_symbol(&self, target: Target<'_>, symbol: &str) -> bool {
        match self.try_probe_symbol(target, symbol) {
            Ok(found) => found,
            Err(err) => {
                error!(kind = err.kind(), symbol, "symbol lookup failed: {err}");
                false
            }
        }
    }

    /// Load `target` and look up `symbol` in it.
    ///
    /// `Ok(false)` means the library loaded but does not export the symbol.
    /// The handle taken for the lookup is released before returning.
    pub fn try_probe_symbol(&self, target: Target<'_>, symbol: &str) -> Result<bool, LoadError> {
        let symbol_c = match CString::new(symbol) {
            Ok(s) if !symbol.is_empty() => s,
            _ => {
                return Err(LoadError::InvalidArgument {
                    reason: "empty or NUL symbol name",
                });
            }
        };

        let (_, handle) = self.load(target)?;
        let addr = self.platform.symbol(&handle, &symbol_c);
        self.platform.close(handle);
        match addr {
            Some(addr) => {
                debug!(library = %target, symbol, addr, "symbol found");
                Ok(true)
            }
            None => {
                debug!(library = %target, symbol, "symbol not found");
                Ok(false)
            }
        }
    }

    fn load(&self, target: Target<'_>) -> Result<(LoadRoute, P::Handle), LoadError> {
        let primary = match self.platform.open(target, self.mode) {
            Ok(handle) => {
                debug!(library = %target, mode = %self.mode, "loaded via standard primitive");
                return Ok((LoadRoute::Primary, handle));
            }
            Err(err) => err,
        };

        let api_level = match FallbackGate::evaluate(self.platform.api_level()) {
            FallbackGate::Eligible(level) => level,
            FallbackGate::BelowThreshold(api_level) => {
                return Err(LoadError::FallbackIneligible {
                    target: target.to_string(),
                    api_level,
                    primary,
                });
            }
            FallbackGate::Unknown => {
                return Err(LoadError::PrimaryLoadFailed {
                    target: target.to_string(),
                    primary,
                });
            }
        };

        warn!(
            library = %target,
            api_level = %api_level,
            primary = %primary,
            "standard load refused, trying fallback route"
        );

        let entry = self
            .platform
            .resolve_bypass(target.kind())
            .map_err(|cause| LoadError::FallbackResolutionFailed {
                target: target.to_string(),
                primary: primary.clone(),
                cause,
            })?;

        let handle = self
            .platform
            .invoke_bypass(&entry, target, self.mode)
            .map_err(|cause| LoadError::FallbackInvocationFailed {
                target: target.to_string(),
                primary,
                cause,
            })?;

        debug!(library = %target, mode = %self.mode, "loaded via fallback route");
        Ok((LoadRoute::Fallback, handle))
    }
}

fn settle(result: Result<LoadRoute, LoadError>) -> bool {
    match result {
        Ok(_) => true,
        Err(err) => {
            error!(kind = err.kind(), "load library failed: {err}");
            false
        }
    }
}
