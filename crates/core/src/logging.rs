//! Structured logging setup for both buildpack phases
//!
//! Output goes to stderr so the platform's staging log picks it up. The level
//! comes from the command line or the environment; `RUST_LOG`, when set,
//! overrides both.

use std::env;
use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

const QUIET_DEPENDENCIES: [&str; 3] = ["h2=warn", "hyper=warn", "reqwest=warn"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target in logs
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::with_level(Level::INFO)
    }
}

impl LoggingConfig {
    /// Text output; debug and trace output also name the emitting module.
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            use_json: false,
            include_target: level >= Level::DEBUG,
        }
    }

    pub fn json(mut self, use_json: bool) -> Self {
        self.use_json = use_json;
        self
    }
}

/// Parses a log level, falling back to INFO (with a warning) on unknown input.
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    QUIET_DEPENDENCIES.iter().fold(
        EnvFilter::new(LevelFilter::from_level(level).to_string()),
        |filter, directive| match directive.parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    )
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.without_time())
                .init();
        }
    });
}
