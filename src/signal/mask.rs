//! Blocked-signal mask stand-in.
//!
//! The mask is pure bookkeeping: it is never consulted by real delivery,
//! since delivery itself is stubbed out on the target platform.

use std::ffi::c_int;

use crate::error::ShimError;
use crate::signal::SIG_TABLE_LEN;

/// The three mask operations `pthread_sigmask` / `sigprocmask` accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskOp {
    /// SIG_BLOCK: union the given set into the mask.
    Block,
    /// SIG_UNBLOCK: remove the given set from the mask.
    Unblock,
    /// SIG_SETMASK: replace the mask wholesale.
    Replace,
}

impl MaskOp {
    /// Decode the POSIX `how` argument.
    pub fn from_how(how: c_int) -> Result<Self, ShimError> {
        match how {
            libc::SIG_BLOCK => Ok(MaskOp::Block),
            libc::SIG_UNBLOCK => Ok(MaskOp::Unblock),
            libc::SIG_SETMASK => Ok(MaskOp::Replace),
            other => Err(ShimError::InvalidMaskOp(other)),
        }
    }
}

/// Bitset of blocked signal numbers in 1..32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockedMask(u64);

impl BlockedMask {
    pub fn empty() -> Self {
        BlockedMask(0)
    }

    fn bit(sig: c_int) -> u64 {
        debug_assert!(sig >= 1 && (sig as usize) < SIG_TABLE_LEN);
        1u64 << sig
    }

    pub fn contains(&self, sig: c_int) -> bool {
        if sig < 1 || sig as usize >= SIG_TABLE_LEN {
            return false;
        }
        self.0 & Self::bit(sig) != 0
    }

    pub fn insert(&mut self, sig: c_int) {
        if sig >= 1 && (sig as usize) < SIG_TABLE_LEN {
            self.0 |= Self::bit(sig);
        }
    }

    pub fn remove(&mut self, sig: c_int) {
        if sig >= 1 && (sig as usize) < SIG_TABLE_LEN {
            self.0 &= !Self::bit(sig);
        }
    }

    /// Apply one mask operation against `self`, returning the new mask.
    pub fn apply(self, op: MaskOp, set: BlockedMask) -> BlockedMask {
        match op {
            MaskOp::Block => BlockedMask(self.0 | set.0),
            MaskOp::Unblock => BlockedMask(self.0 & !set.0),
            MaskOp::Replace => set,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_of(signals: &[c_int]) -> BlockedMask {
        let mut m = BlockedMask::empty();
        for &sig in signals {
            m.insert(sig);
        }
        m
    }

    #[test]
    fn replace_returns_exactly_the_given_set() {
        let initial = mask_of(&[libc::SIGHUP, libc::SIGTERM]);
        let replacement = mask_of(&[libc::SIGUSR1, libc::SIGUSR2]);

        let result = initial.apply(MaskOp::Replace, replacement);
        assert_eq!(result, replacement);
    }

    #[test]
    fn block_then_unblock_restores_previous_mask() {
        let before = mask_of(&[libc::SIGHUP, libc::SIGINT]);
        let delta = mask_of(&[libc::SIGUSR1]);

        let blocked = before.apply(MaskOp::Block, delta);
        assert!(blocked.contains(libc::SIGUSR1));

        let after = blocked.apply(MaskOp::Unblock, delta);
        assert_eq!(after, before);
    }

    #[test]
    fn unblock_of_unblocked_signal_is_a_no_op() {
        let before = mask_of(&[libc::SIGHUP]);
        let after = before.apply(MaskOp::Unblock, mask_of(&[libc::SIGUSR2]));
        assert_eq!(after, before);
    }

    #[test]
    fn out_of_range_signals_are_ignored_by_the_bitset() {
        let mut m = BlockedMask::empty();
        m.insert(0);
        m.insert(64);
        m.insert(-3);
        assert!(m.is_empty());
        assert!(!m.contains(64));
    }

    #[test]
    fn from_how_rejects_unknown_operations() {
        assert_eq!(MaskOp::from_how(libc::SIG_BLOCK).unwrap(), MaskOp::Block);
        assert_eq!(MaskOp::from_how(libc::SIG_UNBLOCK).unwrap(), MaskOp::Unblock);
        assert_eq!(MaskOp::from_how(libc::SIG_SETMASK).unwrap(), MaskOp::Replace);
        assert!(MaskOp::from_how(0x7fff).is_err());
    }
}
