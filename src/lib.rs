//! In-process POSIX signal shims for embedding managed runtimes inside
//! mobile OS sandboxes.
//!
//! Sandboxed mobile platforms (iOS being the usual offender) forbid or
//! silently break the syscalls a managed runtime relies on for signal-based
//! preemption and alternate signal stacks. This crate interposes the small
//! set of signal APIs such runtimes call during startup — `sigaltstack`,
//! `sigaction`, `pthread_sigmask`, `sigprocmask`, `abort` — with in-process,
//! table-backed stand-ins that always report success, while suppressing the
//! fatal signals that would otherwise produce a crash report.
//!
//! The host application must call [`host::sigbridge_init`] (or one of its
//! config-taking variants) before the embedded runtime initializes; there is
//! no implicit load-time constructor.

pub mod config;
pub mod demo;
pub mod error;
pub mod host;
pub mod posix;
pub mod signal;
pub mod startup;
pub mod utils;
pub mod workers;

pub use config::shim_config::{ShimConfig, ShimConfigBuilder};
pub use error::ShimError;
pub use signal::state::{process_state, SignalState};

/// Crate version, exposed for host-side diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
