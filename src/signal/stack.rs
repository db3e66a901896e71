//! Alternate signal stack stand-in.
//!
//! No alternate stack is ever registered with the OS; the record only exists
//! so the embedded runtime's `sigaltstack` bookkeeping does not fail.

/// The most recently installed alternate signal stack descriptor.
#[derive(Debug, Clone, Copy)]
pub struct AltStackRecord {
    stack: libc::stack_t,
    set: bool,
}

impl AltStackRecord {
    pub fn new() -> Self {
        Self {
            // SAFETY: stack_t is plain old data; all-zero is a valid value.
            stack: unsafe { std::mem::zeroed() },
            set: false,
        }
    }

    /// The stored descriptor, or `None` if nothing was ever installed.
    pub fn get(&self) -> Option<libc::stack_t> {
        self.set.then_some(self.stack)
    }

    pub fn install(&mut self, stack: libc::stack_t) {
        self.stack = stack;
        self.set = true;
    }
}

// SAFETY: the record only stores the descriptor for bookkeeping; the ss_sp
// pointer inside is never dereferenced by this crate.
unsafe impl Send for AltStackRecord {}

impl Default for AltStackRecord {
    fn default() -> Self {
        Self::new()
    }
}
