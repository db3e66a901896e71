//! Per-signal action table stand-in.

use std::ffi::c_int;

use crate::error::ShimError;
use crate::signal::SIG_TABLE_LEN;

/// Fixed-size table of installed handler descriptors, indexed by signal
/// number in 1..32. Slots start zeroed, matching the kernel's "no handler
/// installed" state.
pub struct ActionTable {
    slots: [libc::sigaction; SIG_TABLE_LEN],
}

impl ActionTable {
    pub fn new() -> Self {
        Self {
            // SAFETY: sigaction is plain old data; all-zero means SIG_DFL,
            // no flags, empty mask.
            slots: [unsafe { std::mem::zeroed() }; SIG_TABLE_LEN],
        }
    }

    fn index(sig: c_int) -> Result<usize, ShimError> {
        if sig < 1 || sig as usize >= SIG_TABLE_LEN {
            return Err(ShimError::InvalidSignal(sig));
        }
        Ok(sig as usize)
    }

    /// Stored action for `sig`, byte-for-byte as last installed.
    pub fn get(&self, sig: c_int) -> Result<libc::sigaction, ShimError> {
        Ok(self.slots[Self::index(sig)?])
    }

    /// Replace the slot for `sig`, returning the previous contents.
    pub fn put(&mut self, sig: c_int, act: libc::sigaction) -> Result<libc::sigaction, ShimError> {
        let idx = Self::index(sig)?;
        let prev = self.slots[idx];
        self.slots[idx] = act;
        Ok(prev)
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn action_bytes(act: &libc::sigaction) -> &[u8] {
        // SAFETY: sigaction is plain old data; reading it as bytes is fine.
        unsafe {
            std::slice::from_raw_parts(
                (act as *const libc::sigaction).cast::<u8>(),
                std::mem::size_of::<libc::sigaction>(),
            )
        }
    }

    fn sample_action(token: usize) -> libc::sigaction {
        let mut act: libc::sigaction = unsafe { std::mem::zeroed() };
        act.sa_sigaction = token as libc::sighandler_t;
        act.sa_flags = libc::SA_ONSTACK;
        act
    }

    #[test]
    fn put_then_get_round_trips_byte_identically() {
        let mut table = ActionTable::new();
        let act = sample_action(0x1234_5678);

        table.put(libc::SIGUSR1, act).unwrap();
        let back = table.get(libc::SIGUSR1).unwrap();

        assert_eq!(action_bytes(&back), action_bytes(&act));
    }

    #[test]
    fn put_returns_the_previously_stored_action() {
        let mut table = ActionTable::new();
        let first = sample_action(0xaaaa);
        let second = sample_action(0xbbbb);

        table.put(libc::SIGUSR2, first).unwrap();
        let prev = table.put(libc::SIGUSR2, second).unwrap();

        assert_eq!(action_bytes(&prev), action_bytes(&first));
    }

    #[test]
    fn out_of_range_signals_are_rejected_and_leave_the_table_unmodified() {
        let mut table = ActionTable::new();
        let act = sample_action(0xcccc);

        assert_eq!(table.put(0, act).err(), Some(ShimError::InvalidSignal(0)));
        assert_eq!(table.put(-5, act).err(), Some(ShimError::InvalidSignal(-5)));
        assert_eq!(table.put(32, act).err(), Some(ShimError::InvalidSignal(32)));
        assert_eq!(table.get(32).err(), Some(ShimError::InvalidSignal(32)));

        // Every valid slot must still be zeroed.
        let zeroed: libc::sigaction = unsafe { std::mem::zeroed() };
        for sig in 1..SIG_TABLE_LEN as c_int {
            let slot = table.get(sig).unwrap();
            assert_eq!(action_bytes(&slot), action_bytes(&zeroed));
        }
    }
}
