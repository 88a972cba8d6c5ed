//! Drives a loader for one CLI request and builds its report.

use dlgate_core::{LibraryName, LibraryPath, Loader, Platform, Target, TargetKind};

use crate::report::{LoadReport, Operation};

/// What to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Path(String),
    Name(String),
}

impl Request {
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Path(_) => TargetKind::Path,
            Self::Name(_) => TargetKind::Name,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Path(s) | Self::Name(s) => s,
        }
    }
}

/// Load `request` and report which tier mapped it.
pub fn run_load<P: Platform>(loader: &Loader<P>, request: &Request) -> LoadReport {
    let (operation, result) = match request {
        Request::Path(path) => (Operation::LoadPath, loader.try_load_by_path(path)),
        Request::Name(name) => (Operation::LoadName, loader.try_load_by_name(name)),
    };
    if let Err(err) = &result {
        tracing::error!(kind = err.kind(), "load library failed: {err}");
    }
    LoadReport::new(operation, request.as_str(), request.kind(), loader.mode())
        .with_api_level(loader.platform().api_level().map(|l| l.get()))
        .with_result(&result)
}

/// Load `request` and report whether it exports `symbol`.
pub fn run_probe<P: Platform>(loader: &Loader<P>, request: &Request, symbol: &str) -> LoadReport {
    let report = LoadReport::new(Operation::Probe, request.as_str(), request.kind(), loader.mode())
        .with_api_level(loader.platform().api_level().map(|l| l.get()))
        .with_symbol(symbol);

    let result = match request {
        Request::Path(path) => LibraryPath::new(path)
            .and_then(|p| loader.try_probe_symbol(Target::Path(&p), symbol)),
        Request::Name(name) => LibraryName::new(name)
            .and_then(|n| loader.try_probe_symbol(Target::Name(&n), symbol)),
    };
    if let Err(err) = &result {
        tracing::error!(kind = err.kind(), symbol, "symbol lookup failed: {err}");
    }
    report.with_lookup(&result)
}
