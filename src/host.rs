//! Host-facing C ABI.
//!
//! Mobile GUI hosts (SwiftUI, Jetpack Compose) own the process and call
//! into the shim over a small C surface:
//!   * initialize the environment (required, before the runtime starts)
//!   * call the demo boundary functions to verify the bridge end to end
//!
//! The adapters are same-signature pass-throughs: arguments are forwarded
//! verbatim to the runtime-side functions and results returned unchanged.
//! Validation beyond null/UTF-8 checks is the callee's concern.

use std::ffi::{c_char, c_int, CStr, CString};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::shim_config::{ShimConfig, ShimConfigReader};
use crate::startup::initialize_environment;
use crate::{demo, workers};

/// Status codes returned by the `sigbridge_init*` entry points.
const INIT_OK: c_int = 0;
const INIT_BAD_STRING: c_int = 2;
const INIT_BAD_CONFIG: c_int = 3;

fn cstr_to_string(ptr: *const c_char) -> Result<String> {
    if ptr.is_null() {
        return Err(anyhow::anyhow!("null string pointer"));
    }
    let s = unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .context("invalid utf-8")?;
    Ok(s.to_string())
}

/// Initialize the shim with defaults plus environment overrides.
///
/// Must be called before the embedded runtime starts; calling it again is
/// harmless. Returns 0.
#[no_mangle]
pub extern "C" fn sigbridge_init() -> c_int {
    initialize_environment(&ShimConfig::default().apply_env_overrides());
    INIT_OK
}

/// Initialize the shim from a JSON configuration string.
///
/// Returns 0 on success, non-zero on a bad pointer or unparseable config.
///
/// # Safety
/// `config_json_utf8` must be a valid NUL-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn sigbridge_init_with_config(config_json_utf8: *const c_char) -> c_int {
    let json = match cstr_to_string(config_json_utf8) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[SIGBRIDGE] sigbridge_init_with_config: bad config string: {e:?}");
            return INIT_BAD_STRING;
        }
    };

    let config: ShimConfig = match serde_json::from_str(&json) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[SIGBRIDGE] sigbridge_init_with_config: bad config: {e:?}");
            return INIT_BAD_CONFIG;
        }
    };

    initialize_environment(&config.apply_env_overrides());
    INIT_OK
}

/// Initialize the shim from a JSON file shipped in the host bundle.
///
/// Returns 0 on success, non-zero on a bad pointer or unreadable file.
///
/// # Safety
/// `path_utf8` must be a valid NUL-terminated UTF-8 path.
#[no_mangle]
pub unsafe extern "C" fn sigbridge_init_from_file(path_utf8: *const c_char) -> c_int {
    let path = match cstr_to_string(path_utf8) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[SIGBRIDGE] sigbridge_init_from_file: bad path string: {e:?}");
            return INIT_BAD_STRING;
        }
    };

    let config = match ShimConfigReader::read_json(Path::new(&path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[SIGBRIDGE] sigbridge_init_from_file: {e:?}");
            return INIT_BAD_CONFIG;
        }
    };

    initialize_environment(&config.apply_env_overrides());
    INIT_OK
}

/// Add two integers.
#[no_mangle]
pub extern "C" fn sigbridge_add(a: c_int, b: c_int) -> c_int {
    demo::add(a, b)
}

/// Build a greeting for `name_utf8`.
///
/// Returns a heap-allocated NUL-terminated string, or null on bad input.
/// The caller must release it with [`sigbridge_string_free`].
///
/// # Safety
/// `name_utf8` must be a valid NUL-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn sigbridge_greeting(name_utf8: *const c_char) -> *mut c_char {
    let name = match cstr_to_string(name_utf8) {
        Ok(s) => s,
        Err(e) => {
            log::error!("sigbridge_greeting: {e:?}");
            return std::ptr::null_mut();
        }
    };

    match CString::new(demo::greeting(&name)) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            log::error!("sigbridge_greeting: interior NUL: {e:?}");
            std::ptr::null_mut()
        }
    }
}

/// Release a string returned by [`sigbridge_greeting`].
///
/// # Safety
/// `ptr` must be null or a pointer previously returned by
/// [`sigbridge_greeting`], and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn sigbridge_string_free(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr) });
}

/// Factorial of `n`; non-positive inputs yield 1.
#[no_mangle]
pub extern "C" fn sigbridge_factorial(n: c_int) -> i64 {
    demo::factorial(n)
}

/// Spawn `count` lightweight workers each doing `workload` units of dummy
/// work, and return the aggregated result. Returns -1 on invalid arguments
/// or spawn failure.
#[no_mangle]
pub extern "C" fn sigbridge_spawn_workers(count: c_int, workload: c_int) -> i64 {
    if count < 0 || workload < 0 {
        log::error!("sigbridge_spawn_workers: negative count or workload");
        return -1;
    }

    match workers::spawn_workers(count as usize, workload as u64) {
        Ok(total) => total,
        Err(e) => {
            log::error!("sigbridge_spawn_workers: {e:?}");
            -1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn init_returns_ok_and_is_repeatable() {
        assert_eq!(sigbridge_init(), INIT_OK);
        assert_eq!(sigbridge_init(), INIT_OK);
    }

    #[test]
    fn init_with_config_rejects_bad_input() {
        assert_eq!(
            unsafe { sigbridge_init_with_config(ptr::null()) },
            INIT_BAD_STRING
        );

        let junk = CString::new("{ not json }").unwrap();
        assert_eq!(
            unsafe { sigbridge_init_with_config(junk.as_ptr()) },
            INIT_BAD_CONFIG
        );
    }

    #[test]
    fn init_with_config_accepts_a_full_document() {
        let json = CString::new(
            serde_json::to_string(&ShimConfig::default()).unwrap(),
        )
        .unwrap();
        assert_eq!(unsafe { sigbridge_init_with_config(json.as_ptr()) }, INIT_OK);
    }

    #[test]
    fn init_from_file_reports_missing_files() {
        let path = CString::new("/nonexistent/sigbridge.json").unwrap();
        assert_eq!(
            unsafe { sigbridge_init_from_file(path.as_ptr()) },
            INIT_BAD_CONFIG
        );
    }

    #[test]
    fn demo_adapters_forward_verbatim() {
        assert_eq!(sigbridge_add(40, 2), 42);
        assert_eq!(sigbridge_factorial(5), 120);

        let name = CString::new("Ada").unwrap();
        let out = unsafe { sigbridge_greeting(name.as_ptr()) };
        assert!(!out.is_null());
        let s = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_string();
        assert_eq!(s, "Hello, Ada from sigbridge!");
        unsafe { sigbridge_string_free(out) };

        assert_eq!(unsafe { sigbridge_greeting(ptr::null()) }, ptr::null_mut());
    }

    #[test]
    fn worker_adapter_validates_arguments() {
        assert_eq!(sigbridge_spawn_workers(-1, 10), -1);
        assert_eq!(sigbridge_spawn_workers(10, -1), -1);
        assert_eq!(sigbridge_spawn_workers(0, 10), 0);
        assert_eq!(sigbridge_spawn_workers(3, 4), 6 * 6);
    }
}
