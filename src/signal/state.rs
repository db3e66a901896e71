//! Process-wide signal state.
//!
//! The embedded runtime may adjust signal state from several worker threads
//! during startup and teardown, so each table sits behind its own mutex.
//! Lock scopes are a handful of loads and stores; there are no suspension
//! points while a lock is held.

use std::ffi::c_int;
use std::sync::{LockResult, Mutex, MutexGuard, OnceLock};

use crate::error::ShimError;
use crate::signal::actions::ActionTable;
use crate::signal::mask::{BlockedMask, MaskOp};
use crate::signal::stack::AltStackRecord;

/// Owned container for the three signal tables.
///
/// The intercepted C ABI functions operate on the process-wide instance from
/// [`process_state`]; tests construct private instances.
pub struct SignalState {
    altstack: Mutex<AltStackRecord>,
    mask: Mutex<BlockedMask>,
    actions: Mutex<ActionTable>,
}

fn relock<'a, T>(guard: LockResult<MutexGuard<'a, T>>) -> MutexGuard<'a, T> {
    // A panic while holding one of these locks cannot leave a table in a
    // half-written state (every mutation is a single struct store), so a
    // poisoned lock is still usable.
    match guard {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl SignalState {
    pub fn new() -> Self {
        Self {
            altstack: Mutex::new(AltStackRecord::new()),
            mask: Mutex::new(BlockedMask::empty()),
            actions: Mutex::new(ActionTable::new()),
        }
    }

    /// Store `new` (if given) as the alternate stack descriptor, returning
    /// the previously stored one (if any was ever installed).
    pub fn swap_altstack(&self, new: Option<libc::stack_t>) -> Option<libc::stack_t> {
        let mut record = relock(self.altstack.lock());
        let prev = record.get();
        if let Some(stack) = new {
            record.install(stack);
        }
        prev
    }

    /// Current blocked-signal mask.
    pub fn blocked(&self) -> BlockedMask {
        *relock(self.mask.lock())
    }

    /// Apply a mask operation, returning the mask after the change.
    pub fn apply_mask(&self, op: MaskOp, set: BlockedMask) -> BlockedMask {
        let mut mask = relock(self.mask.lock());
        *mask = mask.apply(op, set);
        *mask
    }

    /// Stored action for `sig`.
    pub fn action(&self, sig: c_int) -> Result<libc::sigaction, ShimError> {
        relock(self.actions.lock()).get(sig)
    }

    /// Store `act` for `sig`, returning the previous action.
    pub fn put_action(&self, sig: c_int, act: libc::sigaction) -> Result<libc::sigaction, ShimError> {
        relock(self.actions.lock()).put(sig, act)
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide signal state, constructed on first use.
pub fn process_state() -> &'static SignalState {
    static STATE: OnceLock<SignalState> = OnceLock::new();
    STATE.get_or_init(SignalState::new)
}
