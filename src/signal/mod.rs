//! Table-backed stand-ins for kernel signal state.
//!
//! Nothing in here interacts with real signal delivery except
//! [`suppress_at_os`]: the records only exist so the embedded runtime's
//! bookkeeping calls observe coherent, always-succeeding semantics.

pub mod actions;
pub mod mask;
pub mod stack;
pub mod state;

use std::ffi::c_int;
use std::mem::MaybeUninit;

use crate::signal::mask::BlockedMask;

/// Number of slots in the action table; valid signal numbers are 1..32.
pub const SIG_TABLE_LEN: usize = 32;

/// Signals whose real occurrence would terminate the process with a crash
/// report. Installing an action for any of these additionally requests an
/// OS-level ignore disposition.
pub const FATAL_SIGNALS: [c_int; 7] = [
    libc::SIGPIPE,
    libc::SIGBUS,
    libc::SIGSEGV,
    libc::SIGABRT,
    libc::SIGILL,
    libc::SIGFPE,
    libc::SIGTRAP,
];

/// True if `sig` is on the fatal-signal allow-list.
pub fn is_fatal_signal(sig: c_int) -> bool {
    FATAL_SIGNALS.contains(&sig)
}

/// Request an OS-level ignore disposition for `sig`.
///
/// This is the one place the shim has an observable effect on real OS
/// behavior: a subsequent occurrence of `sig` no longer terminates the
/// process.
pub fn suppress_at_os(sig: c_int) {
    // SAFETY: SIG_IGN is always a valid disposition for catchable signals.
    unsafe {
        libc::signal(sig, libc::SIG_IGN);
    }
}

/// Read the signal numbers of `set` into a [`BlockedMask`].
///
/// # Safety
/// `set` must point to a valid, initialized `sigset_t`.
pub unsafe fn mask_from_sigset(set: *const libc::sigset_t) -> BlockedMask {
    let mut mask = BlockedMask::empty();
    for sig in 1..SIG_TABLE_LEN as c_int {
        if unsafe { libc::sigismember(set, sig) } == 1 {
            mask.insert(sig);
        }
    }
    mask
}

/// Write `mask` out as a `sigset_t`.
///
/// # Safety
/// `out` must be valid for writes of `sigset_t`.
pub unsafe fn mask_to_sigset(mask: BlockedMask, out: *mut libc::sigset_t) {
    unsafe {
        libc::sigemptyset(out);
        for sig in 1..SIG_TABLE_LEN as c_int {
            if mask.contains(sig) {
                libc::sigaddset(out, sig);
            }
        }
    }
}

/// Build an initialized, empty `sigset_t`. Test helper and host-side utility.
pub fn empty_sigset() -> libc::sigset_t {
    let mut set = MaybeUninit::<libc::sigset_t>::uninit();
    // SAFETY: sigemptyset fully initializes the set.
    unsafe {
        libc::sigemptyset(set.as_mut_ptr());
        set.assume_init()
    }
}
