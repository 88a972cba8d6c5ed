//! Running API level detection.
//!
//! Resolution order:
//! - `DLGATE_API_LEVEL` environment variable (ignored when unparsable or
//!   above [`MAX_API_LEVEL`])
//! - `ro.build.version.sdk` system property (Android only)
//! - otherwise `None`: not a platform with a versioned load restriction
//!
//! The result is resolved once per process and cached.

use std::sync::atomic::{AtomicU32, Ordering};

use dlgate_core::ApiLevel;

/// Environment override for the detected API level.
pub const API_LEVEL_ENV: &str = "DLGATE_API_LEVEL";

// 0=unresolved, 1=resolving, 2=no level, n+3=ApiLevel(n).
static CACHED_LEVEL: AtomicU32 = AtomicU32::new(0);

const LEVEL_UNRESOLVED: u32 = 0;
const LEVEL_RESOLVING: u32 = 1;
const LEVEL_NONE: u32 = 2;
const LEVEL_BIAS: u32 = 3;

/// Largest level the cache can hold; anything above is treated as unparsable.
pub const MAX_API_LEVEL: u32 = u32::MAX - LEVEL_BIAS;

// Only levels that passed `bounded` reach the cache, so the add cannot wrap.
fn encode(level: Option<ApiLevel>) -> u32 {
    match level {
        Some(ApiLevel(n)) => n + LEVEL_BIAS,
        None => LEVEL_NONE,
    }
}

fn decode(v: u32) -> Option<ApiLevel> {
    (v >= LEVEL_BIAS).then(|| ApiLevel(v - LEVEL_BIAS))
}

fn bounded(level: ApiLevel) -> Option<ApiLevel> {
    (level.get() <= MAX_API_LEVEL).then_some(level)
}

/// Parse an override value. Empty, non-numeric, or out-of-range input yields
/// `None`.
#[must_use]
pub fn parse_api_level_override(raw: &str) -> Option<ApiLevel> {
    raw.parse::<ApiLevel>().ok().and_then(bounded)
}

/// Combine an override with the system source. The system source is only
/// consulted when the override is absent or unusable.
pub fn resolve_api_level(
    env_override: Option<&str>,
    system: impl FnOnce() -> Option<ApiLevel>,
) -> Option<ApiLevel> {
    env_override
        .and_then(parse_api_level_override)
        .or_else(|| system().and_then(bounded))
}

fn detect() -> Option<ApiLevel> {
    let env = std::env::var(API_LEVEL_ENV).ok();
    resolve_api_level(env.as_deref(), system_sdk_level)
}

/// The running API level (resolved on first call, cached thereafter).
///
/// A caller racing the first resolution computes the value itself instead of
/// waiting; detection is side-effect free.
#[must_use]
pub fn api_level() -> Option<ApiLevel> {
    let cached = CACHED_LEVEL.load(Ordering::Acquire);
    if cached != LEVEL_UNRESOLVED && cached != LEVEL_RESOLVING {
        return decode(cached);
    }

    if CACHED_LEVEL
        .compare_exchange(
            LEVEL_UNRESOLVED,
            LEVEL_RESOLVING,
            Ordering::SeqCst,
            Ordering::Relaxed,
        )
        .is_err()
    {
        let v = CACHED_LEVEL.load(Ordering::Acquire);
        return if v != LEVEL_UNRESOLVED && v != LEVEL_RESOLVING {
            decode(v)
        } else {
            detect()
        };
    }

    let level = detect();
    CACHED_LEVEL.store(encode(level), Ordering::Release);
    tracing::debug!(api_level = ?level, "resolved platform api level");
    level
}

#[cfg(target_os = "android")]
fn system_sdk_level() -> Option<ApiLevel> {
    use std::ffi::{CStr, c_char};

    // Bionic's PROP_VALUE_MAX.
    const PROP_VALUE_MAX: usize = 92;

    let mut value: [c_char; PROP_VALUE_MAX] = [0; PROP_VALUE_MAX];
    // SAFETY: the key is a NUL-terminated literal and `value` has the
    // PROP_VALUE_MAX bytes bionic requires for the output buffer.
    let len =
        unsafe { libc::__system_property_get(c"ro.build.version.sdk".as_ptr(), value.as_mut_ptr()) };
    if len <= 0 {
        return None;
    }
    // SAFETY: bionic NUL-terminates the value within PROP_VALUE_MAX bytes.
    let value = unsafe { CStr::from_ptr(value.as_ptr()) };
    value.to_str().ok().and_then(parse_api_level_override)
}

#[cfg(not(target_os = "android"))]
fn system_sdk_level() -> Option<ApiLevel> {
    None
}
