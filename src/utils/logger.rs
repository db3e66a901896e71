use fern::colors::{Color, ColoredLevelConfig};

use crate::config::logger_config::LoggerConfig;

pub struct Logger;

impl Logger {
    /// Install the global logger from an optional [`LoggerConfig`].
    ///
    /// Safe to call more than once: if a logger is already installed the
    /// existing dispatch is kept.
    pub fn init_logging(config: Option<LoggerConfig>) {
        let config = config.unwrap_or_default();

        let colors = ColoredLevelConfig::new()
            .trace(Color::Magenta)
            .debug(Color::BrightBlack)
            .info(Color::Green)
            .warn(Color::Yellow)
            .error(Color::Red);

        let result = fern::Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "{}[{}][{}] {}",
                    chrono::Local::now().format("[%H:%M:%S]"),
                    record.target(),
                    colors.color(record.level()),
                    message
                ))
            })
            .level(config.level_filter)
            .level_for("sigbridge", config.shim_level_filter)
            .chain(std::io::stdout())
            .apply();

        if result.is_err() {
            log::debug!("logger already initialized, keeping the existing dispatch");
        }
    }
}
