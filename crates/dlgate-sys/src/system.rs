//! `Platform` over the process's own dynamic linker.

use std::ffi::{CStr, c_int, c_void};
use std::ptr::NonNull;

use dlgate_core::{ApiLevel, LoadMode, Platform, PrimitiveError, Target, TargetKind};
use tracing::warn;

use crate::bypass::{self, LinkerEntry};
use crate::property;

/// A `dlopen` handle.
#[derive(Debug)]
pub struct LibraryHandle(NonNull<c_void>);

// SAFETY: dlopen handles are process-wide tokens; every dl* function that
// accepts one is thread-safe.
unsafe impl Send for LibraryHandle {}
unsafe impl Sync for LibraryHandle {}

impl LibraryHandle {
    pub(crate) fn from_raw(raw: *mut c_void) -> Option<Self> {
        NonNull::new(raw).map(Self)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Native flag word for `mode`.
///
/// Uses the target's own constants: 32-bit bionic defines `RTLD_NOW` as 0.
pub(crate) fn native_flags(mode: LoadMode) -> c_int {
    match mode {
        LoadMode::Lazy => libc::RTLD_LAZY,
        LoadMode::Now => libc::RTLD_NOW,
    }
}

/// Clear any pending `dlerror()` state so the next read belongs to our call.
pub(crate) fn clear_dlerror() {
    // SAFETY: dlerror has no preconditions; the returned message is discarded.
    let _ = unsafe { libc::dlerror() };
}

/// Take the pending `dlerror()` message.
pub(crate) fn last_dlerror(fallback: &str) -> PrimitiveError {
    // SAFETY: dlerror has no preconditions.
    let msg = unsafe { libc::dlerror() };
    if msg.is_null() {
        return PrimitiveError::new(fallback);
    }
    // SAFETY: a non-null dlerror result is a NUL-terminated string valid
    // until the next dl* call on this thread; we copy it out immediately.
    let text = unsafe { CStr::from_ptr(msg) };
    PrimitiveError::new(text.to_string_lossy().into_owned())
}

/// The running system's dynamic linker.
#[derive(Debug, Clone, Copy)]
pub struct SystemPlatform {
    api_level: Option<ApiLevel>,
}

impl SystemPlatform {
    /// Platform with the detected API level (see [`property::api_level`]).
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_level: property::api_level(),
        }
    }

    /// Platform that reports `api_level` instead of the detected one.
    #[must_use]
    pub const fn with_api_level(api_level: Option<ApiLevel>) -> Self {
        Self { api_level }
    }
}

impl Default for SystemPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for SystemPlatform {
    type Handle = LibraryHandle;
    type Entry = LinkerEntry;

    fn api_level(&self) -> Option<ApiLevel> {
        self.api_level
    }

    fn open(&self, target: Target<'_>, mode: LoadMode) -> Result<Self::Handle, PrimitiveError> {
        clear_dlerror();
        // SAFETY: `target` is a validated NUL-terminated string and the flags
        // come from `native_flags`. Running the library's initializers is
        // the point of the call.
        let raw = unsafe { libc::dlopen(target.as_c_str().as_ptr(), native_flags(mode)) };
        LibraryHandle::from_raw(raw).ok_or_else(|| last_dlerror("dlopen returned null"))
    }

    fn resolve_bypass(&self, kind: TargetKind) -> Result<Self::Entry, PrimitiveError> {
        bypass::resolve(kind)
    }

    fn invoke_bypass(
        &self,
        entry: &Self::Entry,
        target: Target<'_>,
        mode: LoadMode,
    ) -> Result<Self::Handle, PrimitiveError> {
        bypass::invoke(entry, target, mode)
    }

    fn symbol(&self, handle: &Self::Handle, symbol: &CStr) -> Option<usize> {
        clear_dlerror();
        // SAFETY: `handle` came from a successful dlopen and has not been
        // closed (close consumes it); `symbol` is NUL-terminated.
        let addr = unsafe { libc::dlsym(handle.as_ptr(), symbol.as_ptr()) };
        (!addr.is_null()).then_some(addr as usize)
    }

    fn close(&self, handle: Self::Handle) {
        // SAFETY: `handle` came from a successful dlopen and is consumed here.
        let rc = unsafe { libc::dlclose(handle.as_ptr()) };
        if rc != 0 {
            warn!(error = %last_dlerror("dlclose failed"), "dlclose failed");
        }
    }
}
