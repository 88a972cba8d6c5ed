//! # dlgate-sys
//!
//! The FFI boundary for dlgate: a [`Platform`](dlgate_core::Platform) backed by
//! the process's own dynamic linker.
//!
//! # Architecture
//!
//! ```text
//! Loader (dlgate-core) -> SystemPlatform::open           -> libc::dlopen
//!                      -> SystemPlatform::resolve_bypass -> dlsym("__loader_dlopen")
//!                      -> SystemPlatform::invoke_bypass  -> __loader_dlopen(.., caller)
//! ```
//!
//! Every `unsafe` block carries a `SAFETY:` note. Only unix targets are
//! supported.

#[cfg(unix)]
pub mod bypass;
#[cfg(unix)]
pub mod property;
#[cfg(unix)]
pub mod system;

#[cfg(unix)]
pub use system::{LibraryHandle, SystemPlatform};

/// A loader over the running system's dynamic linker.
#[cfg(unix)]
pub type SystemLoader = dlgate_core::Loader<SystemPlatform>;

/// Loader over [`SystemPlatform::new`] with the default load mode.
#[cfg(unix)]
#[must_use]
pub fn system_loader() -> SystemLoader {
    dlgate_core::Loader::new(SystemPlatform::new())
}
