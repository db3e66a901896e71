use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Logger configuration used by the shim.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoggerConfig {
    /// Level filter for the shim's own log targets.
    pub shim_level_filter: LevelFilter,
    /// Level filter for everything else.
    pub level_filter: LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { shim_level_filter: LevelFilter::Info, level_filter: LevelFilter::Info }
    }
}
