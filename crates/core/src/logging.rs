//! Logging infrastructure for Pravah.
//!
//! All logs go to stderr so stdout stays clean for flow results.
//! A bare level such as `debug` applies to the workspace crates only;
//! HTTP and runtime dependencies stay at `warn` unless a full directive
//! list names them.

use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::{AppError, AppResult};

/// Crates whose events a bare level applies to.
const PRAVAH_TARGETS: [&str; 5] = [
    "pravah",
    "pravah_core",
    "pravah_llm",
    "pravah_prompt",
    "pravah_flows",
];

/// Level used for dependencies (reqwest, hyper) under a bare level.
const DEPENDENCY_LEVEL: &str = "warn";

/// Expand a log setting into `EnvFilter` directives.
///
/// `None` means `info` for the workspace crates. A value that parses as a
/// single level is scoped to [`PRAVAH_TARGETS`]; anything else is passed
/// through as a directive list.
pub fn filter_directives(log_level: Option<&str>) -> String {
    let level = log_level.map(str::trim).unwrap_or("info");

    match level.parse::<LevelFilter>() {
        Ok(level) => {
            let level = level.to_string().to_lowercase();
            let mut directives = vec![DEPENDENCY_LEVEL.to_string()];
            directives.extend(PRAVAH_TARGETS.iter().map(|t| format!("{}={}", t, level)));
            directives.join(",")
        }
        Err(_) => level.to_string(),
    }
}

/// Initialize the tracing subscriber with stderr output.
///
/// # Arguments
/// * `log_level` - Optional level or filter (e.g., "debug", "pravah_flows=trace")
/// * `no_color` - Disable colored output
///
/// # Example
/// ```no_run
/// use pravah_core::logging::init_logging;
///
/// init_logging(Some("debug"), false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let env_filter = EnvFilter::try_new(filter_directives(log_level))
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && std::env::var_os("NO_COLOR").is_none());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}
