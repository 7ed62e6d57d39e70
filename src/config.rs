//! Logging configuration and process-start initialization.

use env_logger::{Builder, WriteStyle};
use log::{debug, LevelFilter};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static USE_FATAL_FOR_ENFORCE: AtomicBool = AtomicBool::new(false);

/// Runtime logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Runtime severity threshold.
    pub level: LevelFilter,
    /// Abort the process on a failed enforcement instead of returning an error.
    pub use_fatal_for_enforce: bool,
    /// Colorize stderr output.
    pub colors: bool,
}

impl LoggingConfig {
    /// Read `VIGIL_LOG`, `VIGIL_FATAL_ENFORCE` and `VIGIL_LOG_COLORS`.
    pub fn from_env() -> Self {
        let level = std::env::var("VIGIL_LOG")
            .ok()
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Warn);
        let use_fatal_for_enforce = std::env::var("VIGIL_FATAL_ENFORCE")
            .ok()
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        let colors = std::env::var("VIGIL_LOG_COLORS")
            .ok()
            .map(|v| v != "0")
            .unwrap_or(true);

        Self {
            level,
            use_fatal_for_enforce,
            colors,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Install a stderr backend and apply `config`.
///
/// Returns `false` when another logger was already installed; the levels
/// are applied either way.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let mut builder = Builder::new();
    builder.filter_level(config.level);
    builder.write_style(if config.colors {
        WriteStyle::Auto
    } else {
        WriteStyle::Never
    });
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{:<5}] {:<25} {}",
            record.level(),
            record.target(),
            record.args()
        )
    });

    let installed = builder.try_init().is_ok();
    update_logging_levels_from_config(config);
    installed
}

/// Apply the runtime threshold and the fatal-enforce switch.
///
/// Records below the compile-time floor stay compiled out whatever the
/// threshold says.
pub fn update_logging_levels_from_config(config: &LoggingConfig) {
    log::set_max_level(config.level);
    set_use_fatal_for_enforce(config.use_fatal_for_enforce);
    debug!(
        "logging levels updated: level={} fatal_enforce={}",
        config.level, config.use_fatal_for_enforce
    );
}

/// Lower the runtime threshold so `info` records reach stderr.
pub fn show_log_info_to_stderr() {
    if log::max_level() < LevelFilter::Info {
        log::set_max_level(LevelFilter::Info);
    }
}

/// Build-time minimum severity; records below it never exist at runtime.
pub const fn compile_time_floor() -> LevelFilter {
    log::STATIC_MAX_LEVEL
}

/// Toggle process abort on failed enforcement.
pub fn set_use_fatal_for_enforce(enabled: bool) {
    USE_FATAL_FOR_ENFORCE.store(enabled, Ordering::Relaxed);
}

/// Whether failed enforcement aborts the process.
#[inline]
pub fn use_fatal_for_enforce() -> bool {
    USE_FATAL_FOR_ENFORCE.load(Ordering::Relaxed)
}
