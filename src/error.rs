use std::ffi::c_int;
use std::fmt;

/// Errors the intercepted POSIX calls can report.
///
/// The taxonomy is deliberately tiny: everything succeeds except an
/// out-of-range signal number or an unrecognized mask operation, both of
/// which surface as `EINVAL` at the C ABI edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimError {
    /// Signal number outside the table range [1, 32).
    InvalidSignal(c_int),
    /// `how` argument that is none of SIG_BLOCK / SIG_UNBLOCK / SIG_SETMASK.
    InvalidMaskOp(c_int),
}

impl ShimError {
    /// errno value reported at the C ABI boundary.
    pub fn errno(&self) -> c_int {
        match self {
            ShimError::InvalidSignal(_) => libc::EINVAL,
            ShimError::InvalidMaskOp(_) => libc::EINVAL,
        }
    }
}

impl fmt::Display for ShimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShimError::InvalidSignal(sig) => write!(f, "invalid signal number {}", sig),
            ShimError::InvalidMaskOp(how) => write!(f, "invalid sigmask operation {}", how),
        }
    }
}

impl std::error::Error for ShimError {}
