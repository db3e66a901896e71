//! The intercepted POSIX signal API.
//!
//! These definitions carry the exact POSIX names and signatures so that,
//! when the crate is linked as a `staticlib`/`cdylib` into the host app,
//! they interpose over the system versions the embedded runtime would
//! otherwise reach. Every call succeeds except an out-of-range signal
//! number or an unrecognized mask operation (`EINVAL`); none of them talks
//! to real kernel signal delivery, with the single exception of the
//! fatal-signal suppression in [`sigaction`].
//!
//! Interposition is disabled under `cfg(test)` so the test binary keeps the
//! real libc symbols for its own runtime needs; tests call these functions
//! by path instead.

use std::ffi::c_int;

use crate::signal::mask::MaskOp;
use crate::signal::state::process_state;
use crate::signal::{is_fatal_signal, mask_from_sigset, mask_to_sigset, suppress_at_os};

#[cfg(any(target_os = "macos", target_os = "ios"))]
unsafe fn errno_location() -> *mut c_int {
    unsafe { libc::__error() }
}

#[cfg(target_os = "android")]
unsafe fn errno_location() -> *mut c_int {
    unsafe { libc::__errno() }
}

#[cfg(not(any(target_os = "macos", target_os = "ios", target_os = "android")))]
unsafe fn errno_location() -> *mut c_int {
    unsafe { libc::__errno_location() }
}

fn set_errno(value: c_int) {
    // SAFETY: errno_location returns the calling thread's errno slot.
    unsafe {
        *errno_location() = value;
    }
}

/// Alternate signal stack stand-in.
///
/// Copies the stored record out (if requested and previously set) and the
/// new descriptor in (if provided). No alternate stack is registered with
/// the OS.
///
/// # Safety
/// `ss`, if non-null, must point to a valid `stack_t`; `old_ss`, if
/// non-null, must be valid for writes of `stack_t`.
#[cfg_attr(not(test), no_mangle)]
pub unsafe extern "C" fn sigaltstack(ss: *const libc::stack_t, old_ss: *mut libc::stack_t) -> c_int {
    let new = if ss.is_null() { None } else { Some(unsafe { *ss }) };
    let prev = process_state().swap_altstack(new);
    if !old_ss.is_null() {
        if let Some(prev) = prev {
            unsafe { *old_ss = prev };
        }
    }
    0
}

/// Blocked-mask stand-in.
///
/// Copies the current mask out if `old_set` is given; applies
/// SIG_BLOCK / SIG_UNBLOCK / SIG_SETMASK against the stored mask if `set`
/// is given. Unknown `how` values report `EINVAL`.
///
/// # Safety
/// `set`, if non-null, must point to a valid `sigset_t`; `old_set`, if
/// non-null, must be valid for writes of `sigset_t`.
#[cfg_attr(not(test), no_mangle)]
pub unsafe extern "C" fn pthread_sigmask(
    how: c_int,
    set: *const libc::sigset_t,
    old_set: *mut libc::sigset_t,
) -> c_int {
    let state = process_state();

    if !old_set.is_null() {
        unsafe { mask_to_sigset(state.blocked(), old_set) };
    }

    if set.is_null() {
        return 0;
    }

    let op = match MaskOp::from_how(how) {
        Ok(op) => op,
        Err(e) => {
            log::debug!("pthread_sigmask: {}", e);
            set_errno(e.errno());
            return -1;
        }
    };

    state.apply_mask(op, unsafe { mask_from_sigset(set) });
    0
}

/// Identical to [`pthread_sigmask`]; some runtimes call the process-wide
/// name during startup.
///
/// # Safety
/// Same requirements as [`pthread_sigmask`].
#[cfg_attr(not(test), no_mangle)]
pub unsafe extern "C" fn sigprocmask(
    how: c_int,
    set: *const libc::sigset_t,
    old_set: *mut libc::sigset_t,
) -> c_int {
    unsafe { pthread_sigmask(how, set, old_set) }
}

/// Action-table stand-in.
///
/// Validates the signal number against the table range, copies the stored
/// action out and the new one in, and — for the fatal-signal allow-list —
/// additionally installs an OS-level ignore disposition so a real
/// occurrence does not terminate the process.
///
/// # Safety
/// `act`, if non-null, must point to a valid `sigaction`; `old_act`, if
/// non-null, must be valid for writes of `sigaction`.
#[cfg_attr(not(test), no_mangle)]
pub unsafe extern "C" fn sigaction(
    signo: c_int,
    act: *const libc::sigaction,
    old_act: *mut libc::sigaction,
) -> c_int {
    let state = process_state();

    let prev = match state.action(signo) {
        Ok(prev) => prev,
        Err(e) => {
            log::debug!("sigaction: {}", e);
            set_errno(e.errno());
            return -1;
        }
    };

    if !old_act.is_null() {
        unsafe { *old_act = prev };
    }

    if act.is_null() {
        return 0;
    }

    // Range was validated above; the store cannot fail.
    let _ = state.put_action(signo, unsafe { *act });

    if is_fatal_signal(signo) {
        suppress_at_os(signo);
    }

    0
}

/// `abort` replacement.
///
/// Terminating would raise SIGABRT and produce a crash report, which is
/// exactly what the shim exists to avoid. The calling thread parks forever
/// instead and the platform reclaims the process on its own terms.
#[cfg_attr(not(test), no_mangle)]
pub extern "C" fn abort() -> ! {
    log::error!("abort() intercepted; parking the calling thread instead of raising SIGABRT");
    park_forever()
}

fn park_forever() -> ! {
    loop {
        std::thread::park();
    }
}

/// Exception-port setup stub the embedded runtime links against on Darwin.
/// Intentionally empty: the sandbox forbids mach exception ports.
#[cfg_attr(not(test), no_mangle)]
pub extern "C" fn darwin_arm_init_mach_exception_handler() {}

/// Per-thread variant of the exception-port stub. Intentionally empty.
#[cfg_attr(not(test), no_mangle)]
pub extern "C" fn darwin_arm_init_thread_exception_port() {}
