//! # dlgate-core
//!
//! Policy for mapping shared libraries into the running process when the
//! platform's standard loader may refuse them on policy grounds.
//!
//! The crate holds no `unsafe` code. Everything that touches the dynamic
//! linker sits behind the [`Platform`] trait, implemented for real systems in
//! `dlgate-sys`.
//!
//! ```text
//! caller -> Loader::load_by_{path,name}
//!             -> Platform::open                      ok -> true
//!             -> FallbackGate (api level >= 24?)     no -> false
//!             -> Platform::resolve_bypass/invoke     ok -> true, else false
//! ```

#![deny(unsafe_code)]

pub mod dlfcn;
pub mod error;
pub mod loader;
pub mod platform;
pub mod target;
pub mod verify;
pub mod version;

pub use dlfcn::LoadMode;
pub use error::{LoadError, PrimitiveError};
pub use loader::{LoadRoute, Loader};
pub use platform::Platform;
pub use target::{LibraryName, LibraryPath, Target, TargetKind};
pub use verify::{ProcessMapInspector, Residency, confirm_loaded};
pub use version::{ApiLevel, FallbackGate, RESTRICTION_THRESHOLD};
