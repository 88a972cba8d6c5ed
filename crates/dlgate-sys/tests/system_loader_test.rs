//! Integration test: loader over the host dynamic linker
//!
//! Loads real host libraries through `SystemPlatform` and checks how each
//! failure is classified when the api level is pinned.
//!
//! Run: cargo test -p dlgate-sys --test system_loader_test

#![cfg(unix)]

use dlgate_core::{
    ApiLevel, LibraryName, LibraryPath, LoadError, LoadMode, LoadRoute, Loader, Platform, Target,
};
use dlgate_sys::SystemPlatform;

// ---------------------------------------------------------------------------
// Helper: find a host library
// ---------------------------------------------------------------------------

fn find_libm() -> Option<&'static str> {
    [
        "/lib/x86_64-linux-gnu/libm.so.6",
        "/usr/lib/x86_64-linux-gnu/libm.so.6",
        "/lib/aarch64-linux-gnu/libm.so.6",
        "/usr/lib/aarch64-linux-gnu/libm.so.6",
        "/lib64/libm.so.6",
        "/usr/lib64/libm.so.6",
        "/system/lib64/libm.so",
        "/system/lib/libm.so",
    ]
    .into_iter()
    .find(|p| std::path::Path::new(p).exists())
}

fn unrestricted() -> Loader<SystemPlatform> {
    Loader::new(SystemPlatform::with_api_level(None))
}

// ---------------------------------------------------------------------------
// 1. Primary path
// ---------------------------------------------------------------------------

#[test]
fn loads_libm_by_path() {
    let Some(libm) = find_libm() else {
        eprintln!("Skipping: no libm found in standard paths");
        return;
    };

    let loader = unrestricted();
    assert_eq!(loader.try_load_by_path(libm), Ok(LoadRoute::Primary));
    // Already resident: still a success.
    assert!(loader.load_by_path(libm));
}

#[test]
fn lazy_mode_loads_too() {
    let Some(libm) = find_libm() else {
        eprintln!("Skipping: no libm found in standard paths");
        return;
    };
    let loader = unrestricted().with_mode(LoadMode::Lazy);
    assert!(loader.load_by_path(libm));
}

#[test]
fn probe_resolves_real_symbol() {
    let Some(libm) = find_libm() else {
        eprintln!("Skipping: no libm found in standard paths");
        return;
    };

    let loader = unrestricted();
    let path = LibraryPath::new(libm).unwrap();
    assert!(loader.probe_symbol(Target::Path(&path), "cos"));
    assert!(!loader.probe_symbol(Target::Path(&path), "__dlgate_not_exported"));
}

// ---------------------------------------------------------------------------
// 2. Failure classification
// ---------------------------------------------------------------------------

#[test]
fn missing_library_without_api_level_is_primary_failure() {
    let loader = unrestricted();
    let err = loader
        .try_load_by_path("/nonexistent/dlgate/libmissing.so")
        .unwrap_err();
    assert!(matches!(err, LoadError::PrimaryLoadFailed { .. }));
    // dlerror text is carried through.
    assert!(!err.primary().unwrap().message.is_empty());
    assert!(!loader.load_by_name("dlgate_missing"));
}

#[test]
fn missing_library_below_threshold_is_ineligible() {
    let loader = Loader::new(SystemPlatform::with_api_level(Some(ApiLevel(21))));
    let err = loader.try_load_by_name("dlgate_missing").unwrap_err();
    assert!(matches!(
        err,
        LoadError::FallbackIneligible {
            api_level: ApiLevel(21),
            ..
        }
    ));
}

#[cfg(not(target_os = "android"))]
#[test]
fn fallback_has_no_linker_entry_off_android() {
    let loader = Loader::new(SystemPlatform::with_api_level(Some(ApiLevel(30))));
    let name = LibraryName::new("dlgate_missing").unwrap();
    let err = loader.try_load_by_name(name.logical()).unwrap_err();
    match err {
        LoadError::FallbackResolutionFailed { cause, .. } => {
            assert!(cause.message.contains("__loader_dlopen"));
        }
        other => panic!("expected FallbackResolutionFailed, got {other:?}"),
    }
}

#[test]
fn system_loader_uses_detected_level() {
    let loader = dlgate_sys::system_loader();
    assert_eq!(
        loader.platform().api_level(),
        dlgate_sys::property::api_level()
    );
}
