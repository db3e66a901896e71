//! Environment initialization, run before the embedded runtime starts.
//!
//! There is intentionally no load-time constructor here: the host is
//! contractually required to call one of the `sigbridge_init*` entry points
//! (which funnel into [`initialize_environment`]) before the runtime does
//! anything else. Relying on loader ordering was the original sin this
//! module replaces.

use std::ffi::CString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use anyhow::{bail, Context, Result};

use crate::config::shim_config::{ShimConfig, DEFAULT_MAX_PARALLELISM, DEFAULT_WORKER_STACK_SIZE};
use crate::signal::{suppress_at_os, FATAL_SIGNALS};
use crate::utils::logger::Logger;

static ENV_INIT: Once = Once::new();

static WORKER_STACK_SIZE: AtomicUsize = AtomicUsize::new(DEFAULT_WORKER_STACK_SIZE);
static MAX_PARALLELISM: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_PARALLELISM);

/// Stack size in bytes applied to subsequently spawned worker threads.
pub fn worker_stack_size() -> usize {
    WORKER_STACK_SIZE.load(Ordering::Relaxed)
}

/// Cap on concurrently running worker threads.
pub fn max_parallelism() -> usize {
    MAX_PARALLELISM.load(Ordering::Relaxed)
}

/// One-time environment setup: logging, fatal-signal suppression, worker
/// thread sizing, optional stdio silencing.
///
/// Idempotent: only the first call takes effect; later calls (with any
/// configuration) leave the environment unchanged.
pub fn initialize_environment(config: &ShimConfig) {
    ENV_INIT.call_once(|| apply_environment(config));
}

fn apply_environment(config: &ShimConfig) {
    Logger::init_logging(config.logger_config.clone());

    for sig in FATAL_SIGNALS {
        suppress_at_os(sig);
        log::debug!("suppressed signal {} at OS level", sig);
    }

    let (stack_size, parallelism) = resolve_worker_sizing(config);
    WORKER_STACK_SIZE.store(stack_size, Ordering::Relaxed);
    MAX_PARALLELISM.store(parallelism, Ordering::Relaxed);

    if config.redirect_stdio {
        if let Err(e) = redirect_stdio_to_null() {
            log::warn!("failed to silence stdio: {e:?}");
        }
    }

    log::info!(
        "sigbridge {} environment ready: {} fatal signals suppressed, worker stack {} bytes, parallelism {}",
        crate::VERSION,
        FATAL_SIGNALS.len(),
        worker_stack_size(),
        max_parallelism()
    );
}

/// Worker sizing is best-effort: a bad value falls back to the default,
/// but unlike the original behavior the fallback is logged rather than
/// silently swallowed.
fn resolve_worker_sizing(config: &ShimConfig) -> (usize, usize) {
    let stack_size = if config.worker_stack_size == 0 {
        log::warn!(
            "worker stack size of 0 requested, keeping default of {} bytes",
            DEFAULT_WORKER_STACK_SIZE
        );
        DEFAULT_WORKER_STACK_SIZE
    } else {
        config.worker_stack_size
    };

    let parallelism = if config.max_parallelism == 0 {
        log::warn!(
            "max parallelism of 0 requested, keeping default of {}",
            DEFAULT_MAX_PARALLELISM
        );
        DEFAULT_MAX_PARALLELISM
    } else {
        config.max_parallelism
    };

    (stack_size, parallelism)
}

/// Point stdout and stderr at /dev/null.
///
/// Inside the sandbox, the embedded runtime writing panic output to a
/// closed or restricted stderr can itself be fatal.
fn redirect_stdio_to_null() -> Result<()> {
    let dev_null = CString::new("/dev/null").context("building /dev/null path")?;

    // SAFETY: dev_null is a valid NUL-terminated path.
    let fd = unsafe { libc::open(dev_null.as_ptr(), libc::O_WRONLY) };
    if fd < 0 {
        bail!("open /dev/null: {}", std::io::Error::last_os_error());
    }

    for target in [libc::STDOUT_FILENO, libc::STDERR_FILENO] {
        // SAFETY: both descriptors are valid for the life of this call.
        if unsafe { libc::dup2(fd, target) } < 0 {
            let err = std::io::Error::last_os_error();
            unsafe { libc::close(fd) };
            bail!("dup2 onto fd {}: {}", target, err);
        }
    }

    // SAFETY: fd was opened above and is no longer needed.
    unsafe { libc::close(fd) };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::shim_config::ShimConfigBuilder;

    #[test]
    fn zero_values_fall_back_to_defaults() {
        let config = ShimConfigBuilder::new()
            .with_worker_stack_size(0)
            .with_max_parallelism(0)
            .get();

        let (stack_size, parallelism) = resolve_worker_sizing(&config);
        assert_eq!(stack_size, DEFAULT_WORKER_STACK_SIZE);
        assert_eq!(parallelism, DEFAULT_MAX_PARALLELISM);
    }

    #[test]
    fn explicit_sizing_is_honored() {
        let config = ShimConfigBuilder::new()
            .with_worker_stack_size(8 * 1024 * 1024)
            .with_max_parallelism(3)
            .get();

        assert_eq!(resolve_worker_sizing(&config), (8 * 1024 * 1024, 3));
    }

    #[test]
    fn initialize_environment_is_idempotent() {
        let config = ShimConfig::default();
        initialize_environment(&config);
        initialize_environment(&config);

        assert!(worker_stack_size() > 0);
        assert!(max_parallelism() > 0);

        // Repeated application converges on ignored dispositions for the
        // whole fatal allow-list.
        apply_environment(&config);
        for sig in [libc::SIGPIPE, libc::SIGTRAP] {
            let prev = unsafe { libc::signal(sig, libc::SIG_IGN) };
            assert_eq!(prev, libc::SIG_IGN);
        }
    }
}
