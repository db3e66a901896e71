use std::{
    env,
    fs::File,
    io::{Error, ErrorKind, Read},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::config::logger_config::LoggerConfig;

/// Default stack size for worker threads spawned on behalf of the embedded
/// runtime. Sandboxed platforms default to small thread stacks; 16 MiB keeps
/// the runtime's deep call chains from overflowing.
pub const DEFAULT_WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Default cap on concurrently running worker threads. Mobile targets get
/// little out of wide parallelism and the sandbox penalizes thread churn.
pub const DEFAULT_MAX_PARALLELISM: usize = 2;

/// Main configuration for the shim.
/// Use [`ShimConfigBuilder`] to build one from code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShimConfig {
    /// Stack size in bytes for worker threads.
    pub(crate) worker_stack_size: usize,
    /// Maximum number of worker threads running at once.
    pub(crate) max_parallelism: usize,
    /// Redirect stdout/stderr to /dev/null during startup. The embedded
    /// runtime's attempts to write diagnostics can themselves crash inside
    /// the sandbox.
    pub(crate) redirect_stdio: bool,
    /// Logger configuration to use.
    pub(crate) logger_config: Option<LoggerConfig>,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            worker_stack_size: DEFAULT_WORKER_STACK_SIZE,
            max_parallelism: DEFAULT_MAX_PARALLELISM,
            redirect_stdio: false,
            logger_config: Some(Default::default()),
        }
    }
}

impl ShimConfig {
    /// Profile for iOS hosts: same defaults, but stdio is silenced because
    /// writes to a closed stderr can take down the process there.
    pub fn ios_defaults() -> Self {
        Self { redirect_stdio: true, ..Default::default() }
    }

    pub fn worker_stack_size(&self) -> usize {
        self.worker_stack_size
    }

    pub fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    pub fn redirect_stdio(&self) -> bool {
        self.redirect_stdio
    }

    /// Fold environment overrides into the configuration.
    ///
    /// Supported:
    /// - SIGBRIDGE_WORKER_STACK_MB (usize, MiB)
    /// - SIGBRIDGE_MAX_PARALLELISM (usize)
    /// - SIGBRIDGE_QUIET_STDIO (bool-ish: 1/true/yes/on)
    pub fn apply_env_overrides(mut self) -> Self {
        if let Some(mb) = parse_usize_env("SIGBRIDGE_WORKER_STACK_MB") {
            self.worker_stack_size = mb * 1024 * 1024;
        }
        if let Some(n) = parse_usize_env("SIGBRIDGE_MAX_PARALLELISM") {
            self.max_parallelism = n;
        }
        if parse_bool_env("SIGBRIDGE_QUIET_STDIO") {
            self.redirect_stdio = true;
        }
        self
    }
}

fn parse_bool_env(name: &str) -> bool {
    match env::var(name) {
        Ok(v) => {
            let s = v.trim().to_ascii_lowercase();
            !(s.is_empty() || s == "0" || s == "false" || s == "no" || s == "off")
        }
        Err(_) => false,
    }
}

fn parse_usize_env(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|v| v.trim().parse::<usize>().ok())
}

/// `ShimConfigBuilder` is a convenience builder to create a [`ShimConfig`]
/// from code.
pub struct ShimConfigBuilder {
    config: ShimConfig,
}

impl ShimConfigBuilder {
    pub fn new() -> Self {
        Self { config: Default::default() }
    }

    /// Sets the stack size in bytes for worker threads.
    pub fn with_worker_stack_size(mut self, bytes: usize) -> Self {
        self.config.worker_stack_size = bytes;
        self
    }

    /// Sets the cap on concurrently running worker threads.
    pub fn with_max_parallelism(mut self, n: usize) -> Self {
        self.config.max_parallelism = n;
        self
    }

    /// Silence stdout/stderr during startup.
    pub fn with_redirect_stdio(mut self, redirect: bool) -> Self {
        self.config.redirect_stdio = redirect;
        self
    }

    /// Sets the logger configuration.
    pub fn with_logger_config(mut self, logger_config: LoggerConfig) -> Self {
        self.config.logger_config = Some(logger_config);
        self
    }

    /// Retrieves the configuration built.
    pub fn get(self) -> ShimConfig {
        self.config
    }
}

impl Default for ShimConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct ShimConfigReader;

impl ShimConfigReader {
    /// Read a `ShimConfig` from a JSON file shipped in the host app bundle.
    pub(crate) fn read_json(path: &Path) -> Result<ShimConfig, Error> {
        if !path.exists() {
            return Err(Error::new(ErrorKind::NotFound, "File not found"));
        }
        let mut file = File::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let config = serde_json::from_slice(bytes.as_slice())?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = ShimConfigBuilder::new()
            .with_worker_stack_size(4 * 1024 * 1024)
            .with_max_parallelism(4)
            .with_redirect_stdio(true)
            .get();

        assert_eq!(config.worker_stack_size(), 4 * 1024 * 1024);
        assert_eq!(config.max_parallelism(), 4);
        assert!(config.redirect_stdio());
    }

    #[test]
    fn ios_defaults_silence_stdio() {
        let config = ShimConfig::ios_defaults();
        assert!(config.redirect_stdio());
        assert_eq!(config.worker_stack_size(), DEFAULT_WORKER_STACK_SIZE);
    }

    #[test]
    fn json_round_trip() {
        let config = ShimConfigBuilder::new().with_max_parallelism(3).get();
        let json = serde_json::to_string(&config).unwrap();
        let back: ShimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_parallelism(), 3);
        assert_eq!(back.worker_stack_size(), config.worker_stack_size());
    }

    #[test]
    fn reader_reports_missing_files() {
        let err = ShimConfigReader::read_json(Path::new("/nonexistent/sigbridge.json"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
