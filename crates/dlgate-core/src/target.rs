//! Library identifiers accepted by the loader.
//!
//! Both identifiers are validated once at construction: non-empty and free of
//! interior NUL bytes, so they can be handed to the C loader as-is. A name
//! never contains a path separator; paths go through [`LibraryPath`].

use std::ffi::{CStr, CString};
use std::fmt;

use crate::error::LoadError;

/// Absolute filesystem path to a shared library artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryPath {
    raw: CString,
}

impl LibraryPath {
    pub fn new(path: &str) -> Result<Self, LoadError> {
        if path.is_empty() {
            return Err(LoadError::InvalidArgument {
                reason: "empty library path",
            });
        }
        let raw = CString::new(path).map_err(|_| LoadError::InvalidArgument {
            reason: "library path contains a NUL byte",
        })?;
        Ok(Self { raw })
    }

    #[must_use]
    pub fn as_c_str(&self) -> &CStr {
        &self.raw
    }
}

impl fmt::Display for LibraryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw.to_string_lossy())
    }
}

/// Logical library name resolved through the OS search rules.
///
/// `"z"` names the file `libz.so`. A name that is already a file name
/// (`libz.so`, `libz.so.1`) is used unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryName {
    name: String,
    soname: CString,
}

impl LibraryName {
    pub fn new(name: &str) -> Result<Self, LoadError> {
        if name.is_empty() {
            return Err(LoadError::InvalidArgument {
                reason: "empty library name",
            });
        }
        if name.contains('/') {
            return Err(LoadError::InvalidArgument {
                reason: "library name contains a path separator",
            });
        }
        let soname = CString::new(map_library_name(name)).map_err(|_| {
            LoadError::InvalidArgument {
                reason: "library name contains a NUL byte",
            }
        })?;
        Ok(Self {
            name: name.to_owned(),
            soname,
        })
    }

    /// The name as given by the caller.
    #[must_use]
    pub fn logical(&self) -> &str {
        &self.name
    }

    /// The file name handed to the loader.
    #[must_use]
    pub fn soname(&self) -> &CStr {
        &self.soname
    }
}

impl fmt::Display for LibraryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.soname.to_string_lossy())
    }
}

fn map_library_name(name: &str) -> String {
    if name.starts_with("lib") && (name.ends_with(".so") || name.contains(".so.")) {
        name.to_owned()
    } else {
        format!("lib{name}.so")
    }
}

/// Which primitive a target is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Path,
    Name,
}

impl TargetKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Name => "name",
        }
    }
}

/// A validated load request, by path or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Path(&'a LibraryPath),
    Name(&'a LibraryName),
}

impl Target<'_> {
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Path(_) => TargetKind::Path,
            Self::Name(_) => TargetKind::Name,
        }
    }

    /// The string the platform primitive receives.
    #[must_use]
    pub fn as_c_str(&self) -> &CStr {
        match self {
            Self::Path(path) => path.as_c_str(),
            Self::Name(name) => name.soname(),
        }
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => path.fmt(f),
            Self::Name(name) => name.fmt(f),
        }
    }
}
