//! The seam between loader policy and the dynamic linker.
//!
//! ```text
//! Loader -> Platform::open ------------------------------> linker (policy checked)
//!        -> Platform::resolve_bypass -> invoke_bypass ---> linker (unchecked entry)
//! ```

use std::ffi::CStr;

use crate::dlfcn::LoadMode;
use crate::error::PrimitiveError;
use crate::target::{Target, TargetKind};
use crate::version::ApiLevel;

/// Primitives the loader is built from.
///
/// Implementations hold no per-call state; the process module table is owned
/// by the OS.
pub trait Platform {
    /// Loaded library handle.
    type Handle;
    /// A resolved fallback entry point, ready to invoke.
    type Entry;

    /// The running OS API level, or `None` when this is not a platform with
    /// a versioned load restriction.
    fn api_level(&self) -> Option<ApiLevel>;

    /// The standard, policy-checked load primitive.
    fn open(&self, target: Target<'_>, mode: LoadMode) -> Result<Self::Handle, PrimitiveError>;

    /// Locate the loader construct and its load operation for `kind`
    /// arguments without calling it.
    fn resolve_bypass(&self, kind: TargetKind) -> Result<Self::Entry, PrimitiveError>;

    /// Call a resolved fallback entry with the original argument.
    fn invoke_bypass(
        &self,
        entry: &Self::Entry,
        target: Target<'_>,
        mode: LoadMode,
    ) -> Result<Self::Handle, PrimitiveError>;

    /// Address of `symbol` in a loaded library.
    fn symbol(&self, handle: &Self::Handle, symbol: &CStr) -> Option<usize>;

    /// Drop one reference to a loaded library.
    fn close(&self, handle: Self::Handle);
}

impl<P: Platform + ?Sized> Platform for &P {
    type Handle = P::Handle;
    type Entry = P::Entry;

    fn api_level(&self) -> Option<ApiLevel> {
        (**self).api_level()
    }

    fn open(&self, target: Target<'_>, mode: LoadMode) -> Result<Self::Handle, PrimitiveError> {
        (**self).open(target, mode)
    }

    fn resolve_bypass(&self, kind: TargetKind) -> Result<Self::Entry, PrimitiveError> {
        (**self).resolve_bypass(kind)
    }

    fn invoke_bypass(
        &self,
        entry: &Self::Entry,
        target: Target<'_>,
        mode: LoadMode,
    ) -> Result<Self::Handle, PrimitiveError> {
        (**self).invoke_bypass(entry, target, mode)
    }

    fn symbol(&self, handle: &Self::Handle, symbol: &CStr) -> Option<usize> {
        (**self).symbol(handle, symbol)
    }

    fn close(&self, handle: Self::Handle) {
        (**self).close(handle);
    }
}
