//! Linker-internal load entry.
//!
//! Bionic's public `dlopen` is a thin wrapper: it records the caller's return
//! address and forwards to `__loader_dlopen(filename, flags, caller_addr)`
//! exported by the linker client library. The linker picks the namespace
//! whose rules apply from `caller_addr`. Calling the entry directly with an
//! address inside the linker client library itself lets the request be judged
//! under the default (system) namespace instead of the app's.
//!
//! Resolution is split from invocation so an unresolvable entry is reported
//! separately from a refusal by the linker.

use std::ffi::{CStr, c_char, c_int, c_void};

use dlgate_core::{LoadMode, PrimitiveError, Target, TargetKind};
use tracing::debug;

use crate::system::{LibraryHandle, clear_dlerror, last_dlerror, native_flags};

/// Libraries that may define the linker client API, in probe order.
const LINKER_CLIENTS: [&CStr; 2] = [c"libdl.so", c"libdl.so.2"];

/// The unchecked load entry.
const LOADER_DLOPEN: &CStr = c"__loader_dlopen";

/// A symbol guaranteed to live in the linker client library; its address is
/// passed as the caller.
const CALLER_ANCHOR: &CStr = c"dlerror";

type LoaderDlopenFn =
    unsafe extern "C" fn(filename: *const c_char, flags: c_int, caller: *const c_void) -> *mut c_void;

/// A resolved `__loader_dlopen` plus the caller address to present.
#[derive(Debug, Clone, Copy)]
pub struct LinkerEntry {
    dlopen: LoaderDlopenFn,
    caller: *const c_void,
    /// Argument shape this entry was resolved for.
    kind: TargetKind,
}

/// Look up `name` in the linker client library, or in the global scope when
/// no client library is already resident.
fn lookup(name: &CStr) -> Result<*mut c_void, PrimitiveError> {
    let client = LINKER_CLIENTS.iter().find_map(|lib| {
        // SAFETY: NUL-terminated literal; RTLD_NOLOAD never maps anything
        // new, it only takes a reference on an already resident library.
        let raw = unsafe { libc::dlopen(lib.as_ptr(), libc::RTLD_NOW | libc::RTLD_NOLOAD) };
        LibraryHandle::from_raw(raw)
    });

    clear_dlerror();
    let scope = client
        .as_ref()
        .map_or(libc::RTLD_DEFAULT, LibraryHandle::as_ptr);
    // SAFETY: `scope` is either RTLD_DEFAULT or a live handle from above;
    // `name` is NUL-terminated.
    let addr = unsafe { libc::dlsym(scope, name.as_ptr()) };
    let missing = addr.is_null().then(|| {
        let detail = last_dlerror("undefined symbol");
        PrimitiveError::new(format!(
            "linker symbol {} not resolvable: {detail}",
            name.to_string_lossy()
        ))
    });

    if let Some(client) = client {
        // The client library stays resident: it was already loaded before the
        // RTLD_NOLOAD probe, which only added a reference.
        // SAFETY: live handle from the probe above, released exactly once.
        unsafe { libc::dlclose(client.as_ptr()) };
    }

    match missing {
        Some(err) => Err(err),
        None => Ok(addr),
    }
}

pub(crate) fn resolve(kind: TargetKind) -> Result<LinkerEntry, PrimitiveError> {
    let entry = lookup(LOADER_DLOPEN)?;
    let caller = lookup(CALLER_ANCHOR)?;
    debug!(kind = kind.as_str(), entry = ?entry, caller = ?caller, "resolved linker load entry");

    // SAFETY: `__loader_dlopen` is exported by the linker client library with
    // exactly the `LoaderDlopenFn` signature on every release that defines it.
    let dlopen = unsafe { std::mem::transmute::<*mut c_void, LoaderDlopenFn>(entry) };
    Ok(LinkerEntry {
        dlopen,
        caller: caller.cast_const(),
        kind,
    })
}

pub(crate) fn invoke(
    entry: &LinkerEntry,
    target: Target<'_>,
    mode: LoadMode,
) -> Result<LibraryHandle, PrimitiveError> {
    if entry.kind != target.kind() {
        return Err(PrimitiveError::new(format!(
            "linker entry resolved for {} arguments, called with a {}",
            entry.kind.as_str(),
            target.kind().as_str()
        )));
    }

    clear_dlerror();
    // SAFETY: `entry.dlopen` was resolved from the linker by name with the
    // declared signature; the filename is a validated NUL-terminated string and
    // `caller` points into a resident system library.
    let raw = unsafe { (entry.dlopen)(target.as_c_str().as_ptr(), native_flags(mode), entry.caller) };
    LibraryHandle::from_raw(raw).ok_or_else(|| last_dlerror("__loader_dlopen returned null"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_linker_symbol_is_a_resolution_error() {
        let err = lookup(c"__dlgate_no_such_linker_symbol").unwrap_err();
        assert!(err.message.contains("__dlgate_no_such_linker_symbol"));
    }

    #[test]
    fn caller_anchor_resolves_everywhere() {
        // dlerror is part of every unix dynamic linker client API.
        assert!(lookup(CALLER_ANCHOR).is_ok());
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn loader_entry_is_bionic_only() {
        assert!(resolve(TargetKind::Name).is_err());
    }
}
