//! Residency confirmation for reported loads.
//!
//! A `true` from the loader says the linker accepted the request. Callers
//! that need proof the library is actually mapped ask a
//! [`ProcessMapInspector`]. The loader itself never does.

/// Reports whether a library is currently mapped into this process.
pub trait ProcessMapInspector {
    fn is_mapped(&self, library: &str) -> bool;
}

impl<F> ProcessMapInspector for F
where
    F: Fn(&str) -> bool,
{
    fn is_mapped(&self, library: &str) -> bool {
        self(library)
    }
}

/// Combined verdict of a load report and a map inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residency {
    /// Reported loaded and found in the process maps.
    Confirmed,
    /// Reported loaded but absent from the process maps.
    NotResident,
    /// The load itself reported failure; the maps were not consulted.
    NotLoaded,
}

impl Residency {
    #[must_use]
    pub const fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

pub fn confirm_loaded<I>(reported: bool, inspector: &I, library: &str) -> Residency
where
    I: ProcessMapInspector + ?Sized,
{
    if !reported {
        return Residency::NotLoaded;
    }
    if inspector.is_mapped(library) {
        Residency::Confirmed
    } else {
        Residency::NotResident
    }
}
